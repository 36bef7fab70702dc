//! OSS header-based request signing and verification.
//!
//! The `Authorization` header has the format:
//!
//! ```text
//! OSS <AccessKeyId>:<Signature>
//! ```
//!
//! Where `Signature = Base64(HMAC-SHA1(SecretKey, CanonicalString))`. See
//! [`crate::canonical`] for how the canonical string is built.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{SignableRequest, canonical_string};
use crate::credentials::{CredentialProvider, Credentials};
use crate::error::AuthError;

type HmacSha1 = Hmac<Sha1>;

/// Scheme token that starts every OSS `Authorization` header.
pub const AUTH_SCHEME: &str = "OSS";

/// The outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    /// The access key ID that signed the request.
    pub access_key_id: String,
}

/// Compute `Base64(HMAC-SHA1(secret_key, string_to_sign))`.
///
/// # Errors
///
/// Returns [`AuthError::MissingSecretKey`] if `secret_key` is empty.
pub fn compute_signature(secret_key: &str, string_to_sign: &str) -> Result<String, AuthError> {
    if secret_key.is_empty() {
        return Err(AuthError::MissingSecretKey);
    }
    let mut mac =
        HmacSha1::new_from_slice(secret_key.as_bytes()).map_err(|_| AuthError::InvalidKey)?;
    mac.update(string_to_sign.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Sign a request for header-based authentication and return the signature.
///
/// # Errors
///
/// Returns [`AuthError::MissingSecretKey`] or [`AuthError::MissingAccessKeyId`]
/// when the credentials are incomplete.
///
/// # Examples
///
/// ```
/// use http::Method;
/// use rustoss_auth::{Credentials, SignableRequest, sign};
///
/// let creds = Credentials::new("44CF9590006BF252F707", "OtxrzxIsfpFjA7SwPzILwy8Bw21TLhquhboDYROV");
/// let request = SignableRequest::new(Method::PUT, "/quotes/nelson")
///     .content_md5("c8fdb181845a4ca6b8fec737b3581d76")
///     .content_type("text/html")
///     .date("Thu, 17 Nov 2005 18:49:58 GMT")
///     .header("x-oss-meta-author", "foo@bar.com")
///     .header("x-oss-magic", "abracadabra");
///
/// assert_eq!(sign(&request, &creds).unwrap(), "63mwfl+zYIOG6k95yxbgMruQ6QI=");
/// ```
pub fn sign(request: &SignableRequest, credentials: &Credentials) -> Result<String, AuthError> {
    credentials.ensure_usable()?;

    let string_to_sign = canonical_string(request);
    debug!(
        access_key_id = %credentials.access_key_id(),
        string_to_sign = ?string_to_sign,
        "Built OSS canonical string"
    );

    compute_signature(credentials.secret_access_key(), &string_to_sign)
}

/// Sign a request and format the `Authorization` header value `OSS <id>:<signature>`.
///
/// # Errors
///
/// Same as [`sign`].
pub fn authorization_header(
    request: &SignableRequest,
    credentials: &Credentials,
) -> Result<String, AuthError> {
    let signature = sign(request, credentials)?;
    Ok(format!(
        "{AUTH_SCHEME} {}:{signature}",
        credentials.access_key_id()
    ))
}

/// Check whether an `Authorization` header uses the OSS scheme.
#[must_use]
pub fn is_oss_authorization(auth_header: &str) -> bool {
    auth_header
        .strip_prefix(AUTH_SCHEME)
        .is_some_and(|rest| rest.starts_with(' '))
}

/// Verify an OSS header-signed HTTP request.
///
/// # Errors
///
/// Returns an [`AuthError`] if the header is missing or malformed, the access
/// key is not found, or the signature does not match.
pub fn verify_authorization(
    parts: &http::request::Parts,
    credential_provider: &dyn CredentialProvider,
) -> Result<AuthResult, AuthError> {
    let auth_header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    if !is_oss_authorization(auth_header) {
        debug!(auth_header, "Authorization header does not use the OSS scheme");
        return Err(AuthError::InvalidAuthHeader);
    }
    let (access_key_id, provided_signature) = parse_authorization_header(auth_header)?;

    debug!(access_key_id = %access_key_id, "Verifying OSS signature");

    let secret_key = credential_provider.get_secret_key(&access_key_id)?;
    let string_to_sign = canonical_string(&SignableRequest::from_parts(parts));
    let expected_signature = compute_signature(&secret_key, &string_to_sign)?;

    if provided_signature
        .as_bytes()
        .ct_eq(expected_signature.as_bytes())
        .into()
    {
        debug!(access_key_id = %access_key_id, "OSS verification succeeded");
        Ok(AuthResult { access_key_id })
    } else {
        debug!(
            expected = %expected_signature,
            provided = %provided_signature,
            string_to_sign = ?string_to_sign,
            "OSS signature mismatch"
        );
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// Parse an `Authorization` header: `OSS AccessKeyId:Signature`.
fn parse_authorization_header(header: &str) -> Result<(String, String), AuthError> {
    let rest = header
        .strip_prefix(AUTH_SCHEME)
        .and_then(|rest| rest.strip_prefix(' '))
        .ok_or(AuthError::InvalidAuthHeader)?;

    let (access_key_id, signature) = rest.split_once(':').ok_or(AuthError::InvalidAuthHeader)?;

    if access_key_id.is_empty() || signature.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok((access_key_id.to_owned(), signature.to_owned()))
}
