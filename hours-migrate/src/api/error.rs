//! Error type for Smartsheet API calls

use std::fmt;

/// Failure of a single API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The service answered with a non-success status code
    Status {
        method: String,
        path: String,
        status: u16,
        body: String,
    },
    /// The request never produced a response (connect, timeout, TLS, ...)
    Transport {
        method: String,
        path: String,
        message: String,
        retryable: bool,
    },
    /// The request body could not be serialized
    Encode {
        method: String,
        path: String,
        message: String,
    },
    /// The response body could not be decoded into the expected shape
    Decode {
        method: String,
        path: String,
        message: String,
    },
}

impl ApiError {
    pub fn status(
        method: impl Into<String>,
        path: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self::Status {
            method: method.into(),
            path: path.into(),
            status,
            body: body.into(),
        }
    }

    /// Whether repeating the same request may succeed.
    ///
    /// Rate limiting (429), gateway and server-side failures are transient;
    /// authentication, validation and not-found responses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            ApiError::Transport { retryable, .. } => *retryable,
            ApiError::Encode { .. } | ApiError::Decode { .. } => false,
        }
    }

    /// HTTP status code, when the service answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status {
                method,
                path,
                status,
                body,
            } => write!(f, "API call failed {} {}: {}: {}", method, path, status, body),
            ApiError::Transport {
                method,
                path,
                message,
                ..
            } => write!(f, "API call failed {} {}: {}", method, path, message),
            ApiError::Encode {
                method,
                path,
                message,
            } => write!(
                f,
                "could not encode request body for {} {}: {}",
                method, path, message
            ),
            ApiError::Decode {
                method,
                path,
                message,
            } => write!(
                f,
                "API call {} {} returned an unexpected body: {}",
                method, path, message
            ),
        }
    }
}

impl std::error::Error for ApiError {}
