//! Web server module
//!
//! Provides the JSON HTTP API over the todo service.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ErrorBody};
pub use routes::{create_router, ROUTES};
pub use state::AppState;
