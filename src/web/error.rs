//! Mapping of service errors onto HTTP responses

use crate::todos::TodoError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON error body: `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error returned by handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Map a service error, hiding store details behind `context`
    pub fn from_todo_error(err: TodoError, context: &str) -> Self {
        let status = match &err {
            TodoError::Validation(_) => StatusCode::BAD_REQUEST,
            TodoError::NotFound(_) => StatusCode::NOT_FOUND,
            TodoError::Conflict(_) => StatusCode::CONFLICT,
            TodoError::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
            TodoError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if err.is_client_error() {
            let message = match err {
                TodoError::Validation(msg) => msg,
                other => other.to_string(),
            };
            return Self::new(status, message);
        }

        match err {
            TodoError::Cancelled(_) => tracing::warn!("{}: {}", context, err),
            _ => tracing::error!("{}: {}", context, err),
        }
        Self::new(status, context)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (TodoError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (TodoError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (TodoError::Conflict("x".into()), StatusCode::CONFLICT),
            (TodoError::Cancelled("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (TodoError::Store("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from_todo_error(err, "ctx").status(), status);
        }
    }

    #[test]
    fn test_store_details_are_hidden() {
        let err = ApiError::from_todo_error(
            TodoError::Store("SQLITE_BUSY at /var/lib/todos.db".into()),
            "todo not saved",
        );
        assert_eq!(err.message, "todo not saved");
    }
}
