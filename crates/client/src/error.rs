//! Client-side error types.

use thiserror::Error;

use fintools_shared::ErrorMessage;

/// Errors returned by [`crate::ApiClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// 401: missing, invalid or expired token, or bad credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 403: the role or ownership check failed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 400: validation messages or a business-rule violation.
    #[error("Rejected: {}", .0.join(", "))]
    Rejected(Vec<String>),

    /// Any other non-success status.
    #[error("Server returned {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message from the envelope, if any.
        message: String,
    },

    /// A success envelope without the expected payload.
    #[error("Response carried no data")]
    MissingData,

    /// Transport or body decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Builds the error for a failed response.
    #[must_use]
    pub fn from_status(status: u16, error: Option<ErrorMessage>) -> Self {
        let messages = error.map(|e| e.messages()).unwrap_or_default();
        let joined = messages.join(", ");
        match status {
            400 => Self::Rejected(messages),
            401 => Self::Unauthorized(joined),
            403 => Self::Forbidden(joined),
            404 => Self::NotFound(joined),
            _ => Self::Server {
                status,
                message: joined,
            },
        }
    }

    /// True when re-authenticating might help.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}
