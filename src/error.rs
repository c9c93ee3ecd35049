//! Error types for normalization and the demo ledger
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Error Enum ==
/// Unified error type for the crate.
///
/// Errors raised by cached operations are never translated into this type by
/// the cache facility; they surface exactly as the operation returned them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The normalized top-level value did not have the shape the caller asked for
    #[error("Expected a normalized {expected} at the top level, got {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },

    /// A plain tuple was found inside the value graph
    #[error("Query results should not contain plain tuples (found one with {len} elements)")]
    AmbiguousContainer { len: usize },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::Shape { .. } | Error::AmbiguousContainer { .. } | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;
