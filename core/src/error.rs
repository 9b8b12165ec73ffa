//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` and `Validation` get dedicated variants because callers
//! routinely branch on them; both carry the server's `detail` message. All
//! other unexpected statuses land in `HttpError` with the raw status code and
//! body for debugging.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404; the requested todo does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server returned 422; the request was rejected before any write.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The server returned some other unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
