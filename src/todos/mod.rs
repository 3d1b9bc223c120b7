//! Todo domain types
//!
//! The record itself, tag normalization and the shared error type.

mod error;
mod model;
mod tags;

pub use error::{Result, TodoError};
pub use model::Todo;
pub use tags::{check_tags, clean_tags, normalize_tag, TAG_SEPARATOR};
