//! GitHub user directory.
//!
//! Implements [`user_directory_sdk::UserDirectoryClient`] on top of the GitHub
//! REST API: one search call per page, then a bounded concurrent fan-out of
//! profile lookups joined back in relevance order.

pub mod config;
pub mod domain;
pub mod infra;


pub use config::{DetailCacheConfig, GithubDirectoryConfig};
pub use infra::github::{ClientBuildError, GithubDirectoryClient};
