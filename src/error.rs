// Method and binding error types
use axum::http::StatusCode;
use thiserror::Error;

/// Failure returned by a collection method.
///
/// `Classified` failures are expected, user-facing outcomes that carry their
/// own HTTP status. Anything else bubbles up as `Unexpected` and is answered
/// with a 500.
#[derive(Debug, Error)]
pub enum MethodError {
    #[error("{message} ({status})")]
    Classified { status: u16, message: String },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl MethodError {
    /// Classified failure with an explicit status code
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        MethodError::Classified {
            status,
            message: message.into(),
        }
    }

    /// Wrap any error as an unexpected failure
    pub fn unexpected<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        MethodError::Unexpected(err.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(401, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(403, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(409, message)
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, MethodError::Classified { .. })
    }

    /// HTTP status this failure is answered with.
    ///
    /// A classified status outside the valid range falls back to 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            MethodError::Classified { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            MethodError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors raised while binding collections into a dispatch table
#[derive(Debug, Error)]
pub enum BindError {
    #[error("collection url must be non-empty, start with '/' and contain no '?' or '#': {0:?}")]
    InvalidUrl(String),

    #[error("collection url bound more than once: {0}")]
    DuplicateUrl(String),

    #[error("allowed origin for {url} is not a valid header value: {origin:?}")]
    InvalidOrigin { url: String, origin: String },

    #[error("registered methods for {0} do not form a valid header value")]
    InvalidMethods(String),
}
