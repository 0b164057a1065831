#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Small shared helpers: humantime durations in config files and a redacting
//! secret wrapper for API tokens.

pub mod humantime_serde;
mod secret_string;

pub use secret_string::SecretString;
