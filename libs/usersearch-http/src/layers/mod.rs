//! Tower layers composed into the client stack.
//!
//! - [`DefaultHeadersLayer`] - Adds `User-Agent` and other fixed headers when absent

mod default_headers;

pub use default_headers::{DefaultHeadersLayer, DefaultHeadersService};
