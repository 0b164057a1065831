//! User Directory SDK
//!
//! Public surface of the remote user directory:
//! - `UserDirectoryClient` trait
//! - Model types (`SearchQuery`, `SearchHit`, `UserSummary`, `SearchResult`)
//! - Error type (`DirectoryError`) and its `ErrorCategory`
//! - Page bounds and pagination math shared by client and controller
//! - Display helpers for counts and dates
//!
//! ## Usage
//!
//! ```ignore
//! use user_directory_sdk::UserDirectoryClient;
//!
//! let result = client.search_users("octocat", 1, 10).await?;
//! for user in &result.items {
//!     println!("{} ({} followers)", user.login, user.follower_count);
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod errors;
pub mod format;
pub mod models;
pub mod pagination;

pub use api::UserDirectoryClient;
pub use errors::{DirectoryError, ErrorCategory};
pub use models::{SearchHit, SearchQuery, SearchResult, UserSummary};
pub use pagination::{MAX_PAGE, MAX_PAGE_SIZE, PaginationInfo};
