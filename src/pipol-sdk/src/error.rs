use pipol_api::ValidationErrors;

use crate::session::SessionError;

/// Errors from the PIPOL client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Login or registration was rejected
    #[error("authentication failed: {0}")]
    Auth(String),
    /// The server rejected the submitted fields
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    /// The requested record does not exist
    #[error("not found: {0}")]
    NotFound(String),
    /// API returned an error response
    #[error("request failed ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },
    /// Session storage could not be read or written
    #[error(transparent)]
    Session(#[from] SessionError),
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// JSON deserialization error
    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}
