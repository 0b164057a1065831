//! GitHub REST API adapter.

mod client;
mod dto;
mod errors;

pub use client::{ClientBuildError, GithubDirectoryClient};
pub use errors::map_http_error;
