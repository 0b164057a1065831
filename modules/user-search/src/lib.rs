//! User Search
//!
//! The [`SearchController`] is the single owner of [`SearchState`]. It turns
//! keystrokes into debounced searches, clamps page requests, and applies a
//! directory response only while it still answers the latest user intent.
//!
//! ```ignore
//! let controller = SearchController::new(directory, &SearchConfig::default());
//! let mut updates = controller.subscribe();
//! controller.set_query("octo");
//! updates.changed().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod config;
pub mod controller;
pub mod debounce;
pub mod intent;
pub mod state;

#[cfg(test)]
mod config_tests;

pub use config::SearchConfig;
pub use controller::{SearchController, SearchOutcome};
pub use debounce::Debouncer;
pub use intent::IntentClock;
pub use state::{SearchError, SearchState};
