//! Client error types.

use http::StatusCode;
use rustoss_auth::AuthError;
use rustoss_xml::XmlError;

/// Errors returned by the OSS client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Signing failed, typically because credentials are missing.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A response body could not be parsed.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// A request could not be assembled (bad URI or header).
    #[error("HTTP error: {0}")]
    Http(#[from] http::Error),

    /// The transport failed to deliver the request or read the response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service error: {status} {code}: {message}")]
    Service {
        /// HTTP status.
        status: StatusCode,
        /// Service error code, or the status reason when the body carried none.
        code: String,
        /// Human-readable message.
        message: String,
        /// Service request ID, if reported.
        request_id: Option<String>,
    },

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The response was missing something the operation needs.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl ClientError {
    /// The HTTP status of a service error.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The service error code, e.g. `NoSuchKey`.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether this is a 404 from the service.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Convenience result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
