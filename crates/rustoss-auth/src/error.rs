//! Error types for OSS request signing and verification.
//!
//! All signing and verification failures are represented by [`AuthError`].

/// Errors that can occur while signing or verifying an OSS request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The secret access key is missing or empty; requests must never be sent unsigned.
    #[error("configuration error: secret access key is missing or empty")]
    MissingSecretKey,

    /// The access key ID is missing or empty.
    #[error("configuration error: access key id is missing or empty")]
    MissingAccessKeyId,

    /// The secret key was rejected by the HMAC implementation.
    #[error("invalid signing key")]
    InvalidKey,

    /// The `Authorization` header is missing from the request.
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    /// The `Authorization` header could not be parsed as `OSS <id>:<signature>`.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// The access key ID was not found in the credential store.
    #[error("Access key not found: {0}")]
    AccessKeyNotFound(String),

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,

    /// The pre-signed URL is past its `Expires` timestamp.
    #[error("Request has expired")]
    RequestExpired,

    /// A required query parameter for pre-signed URL authentication is missing.
    #[error("Missing required query parameter: {0}")]
    MissingQueryParam(String),
}
