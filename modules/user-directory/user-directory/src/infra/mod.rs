//! Outbound adapters.

pub mod cache;
pub mod github;
