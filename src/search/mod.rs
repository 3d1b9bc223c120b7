//! Tag fan-out search
//!
//! Resolves todos for several tags at once: one concurrent lookup per tag,
//! merged by a single consumer into a set keyed by todo id.

mod dedup;
mod executor;
mod models;

pub use dedup::{Delivery, FanIn};
pub use executor::{TagSearch, DEFAULT_CHANNEL_CAPACITY};
pub use models::TagQuery;
