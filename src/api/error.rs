//! Error taxonomy for the flow inspection endpoint.
//!
//! Every failure of a snapshot fetch is uniform from the caller's point of
//! view: it becomes the displayed error state, with `status_text()` as the
//! panel text. No retry is attempted; the next advance signal is the retry.

use thiserror::Error;

/// Errors that can occur fetching a flow inspection snapshot
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// 401 - not signed in, or the session expired
    #[error("Unauthorized")]
    Unauthorized,

    /// 403 - inspector access denied for this flow
    #[error("Forbidden")]
    Forbidden,

    /// 404 - unknown flow slug
    #[error("Not Found")]
    NotFound,

    /// Any other non-2xx response
    #[error("HTTP {status} - {status_text}")]
    Http { status: u16, status_text: String },

    /// Transport-level failure (connect, TLS, reset)
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not a valid inspection snapshot
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-success HTTP status onto an error variant.
    pub fn from_status(status: u16, status_text: impl Into<String>) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            _ => ApiError::Http {
                status,
                status_text: status_text.into(),
            },
        }
    }

    /// The text shown in the error panel for this failure.
    pub fn status_text(&self) -> String {
        match self {
            ApiError::Unauthorized => "Unauthorized".to_string(),
            ApiError::Forbidden => "Forbidden".to_string(),
            ApiError::NotFound => "Not Found".to_string(),
            ApiError::Http { status_text, .. } => status_text.clone(),
            ApiError::Network(message) => format!("Network error: {}", message),
            ApiError::Decode(message) => format!("Invalid response: {}", message),
        }
    }

    /// Check if this is an access error (401 or 403)
    pub fn is_access_denied(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::Forbidden)
    }
}
