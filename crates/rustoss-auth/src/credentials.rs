//! Credentials and credential providers.
//!
//! [`Credentials`] is the key pair a client signs with. The [`CredentialProvider`]
//! trait resolves secret keys by access key ID on the verifying side, with
//! [`StaticCredentialProvider`] as an in-memory implementation.

use std::collections::HashMap;
use std::fmt;

use crate::error::AuthError;

/// Environment variable holding the access key ID.
pub const ACCESS_KEY_ID_ENV: &str = "OSS_ACCESS_KEY_ID";

/// Environment variable holding the secret access key.
pub const SECRET_ACCESS_KEY_ENV: &str = "OSS_SECRET_ACCESS_KEY";

/// An access key pair used to sign requests.
///
/// The pair is immutable once created. `Debug` output never includes the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
}

impl Credentials {
    /// Create credentials from an access key ID and a secret access key.
    ///
    /// No validation happens here; signing rejects empty keys.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Load credentials from `OSS_ACCESS_KEY_ID` and `OSS_SECRET_ACCESS_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingAccessKeyId`] or [`AuthError::MissingSecretKey`]
    /// if either variable is unset or empty.
    pub fn from_env() -> Result<Self, AuthError> {
        let access_key_id = std::env::var(ACCESS_KEY_ID_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(AuthError::MissingAccessKeyId)?;
        let secret_access_key = std::env::var(SECRET_ACCESS_KEY_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(AuthError::MissingSecretKey)?;
        Ok(Self::new(access_key_id, secret_access_key))
    }

    /// The public access key ID.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The secret access key.
    #[must_use]
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Fail fast if either half of the key pair is empty.
    pub(crate) fn ensure_usable(&self) -> Result<(), AuthError> {
        if self.secret_access_key.is_empty() {
            return Err(AuthError::MissingSecretKey);
        }
        if self.access_key_id.is_empty() {
            return Err(AuthError::MissingAccessKeyId);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Trait for looking up secret access keys by access key ID.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the secret access key for the given access key ID.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccessKeyNotFound`] if the access key ID is not recognized.
    fn get_secret_key(&self, access_key_id: &str) -> Result<String, AuthError>;
}

/// A simple in-memory credential provider backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use rustoss_auth::credentials::{CredentialProvider, StaticCredentialProvider};
///
/// let provider = StaticCredentialProvider::new(vec![
///     ("44CF9590006BF252F707".to_owned(), "OtxrzxIsfpFjA7SwPzILwy8Bw21TLhquhboDYROV".to_owned()),
/// ]);
///
/// let secret = provider.get_secret_key("44CF9590006BF252F707").unwrap();
/// assert_eq!(secret, "OtxrzxIsfpFjA7SwPzILwy8Bw21TLhquhboDYROV");
/// ```
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: HashMap<String, String>,
}

impl StaticCredentialProvider {
    /// Create a new provider from an iterable of (access_key_id, secret_key) pairs.
    pub fn new(credentials: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            credentials: credentials.into_iter().collect(),
        }
    }
}

impl From<&Credentials> for StaticCredentialProvider {
    fn from(credentials: &Credentials) -> Self {
        Self::new([(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
        )])
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_secret_key(&self, access_key_id: &str) -> Result<String, AuthError> {
        self.credentials
            .get(access_key_id)
            .cloned()
            .ok_or_else(|| AuthError::AccessKeyNotFound(access_key_id.to_owned()))
    }
}
