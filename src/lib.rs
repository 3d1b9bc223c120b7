//! todos-rs: a small todo service with concurrent tag search
//!
//! Todos are stored in memory or in SQLite and served as JSON over HTTP.
//! Searching by several tags fans out one lookup per tag and merges the
//! results into a set keyed by todo id.

pub mod config;
pub mod search;
pub mod service;
pub mod storage;
pub mod todos;
pub mod web;

pub use config::Settings;
pub use search::{TagQuery, TagSearch};
pub use service::TodoService;
pub use storage::Repository;
pub use todos::{Todo, TodoError};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
