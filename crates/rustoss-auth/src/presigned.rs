//! Pre-signed URL signing and verification.
//!
//! Pre-signed URLs carry authentication in three query parameters instead of
//! an `Authorization` header:
//!
//! - `OSSAccessKeyId` - the access key ID
//! - `Expires` - unix timestamp after which the URL is rejected
//! - `Signature` - the percent-encoded base64 signature
//!
//! The signature covers the same canonical string as header signing, with the
//! `Expires` timestamp in place of the `Date` line.

use std::collections::HashMap;
use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{SignableRequest, presigned_canonical_string};
use crate::credentials::{CredentialProvider, Credentials};
use crate::error::AuthError;
use crate::signer::{AuthResult, compute_signature};

/// Query parameter carrying the access key ID.
pub const ACCESS_KEY_ID_PARAM: &str = "OSSAccessKeyId";

/// Query parameter carrying the expiration timestamp.
pub const EXPIRES_PARAM: &str = "Expires";

/// Query parameter carrying the signature.
pub const SIGNATURE_PARAM: &str = "Signature";

/// Characters escaped in query parameter values: everything except RFC 3986 unreserved.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The three query parameters of a pre-signed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedQuery {
    /// The access key ID.
    pub access_key_id: String,
    /// Unix timestamp after which the URL is invalid.
    pub expires: i64,
    /// The raw (not percent-encoded) base64 signature.
    pub signature: String,
}

impl PresignedQuery {
    /// Render as `OSSAccessKeyId=..&Expires=..&Signature=..` with values percent-encoded.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        format!(
            "{ACCESS_KEY_ID_PARAM}={}&{EXPIRES_PARAM}={}&{SIGNATURE_PARAM}={}",
            utf8_percent_encode(&self.access_key_id, QUERY_ENCODE_SET),
            self.expires,
            utf8_percent_encode(&self.signature, QUERY_ENCODE_SET),
        )
    }
}

impl fmt::Display for PresignedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Sign a request for pre-signed URL access, valid until `expires` (unix seconds).
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
/// use rustoss_auth::{Credentials, SignableRequest, presign};
///
/// let creds = Credentials::new("44CF9590006BF252F707", "OtxrzxIsfpFjA7SwPzILwy8Bw21TLhquhboDYROV");
/// let request = SignableRequest::new(Method::GET, "/quotes/nelson");
/// let query = presign(&request, &creds, 1_141_889_120).unwrap();
/// assert_eq!(
///     query.to_query_string(),
///     "OSSAccessKeyId=44CF9590006BF252F707&Expires=1141889120&Signature=vjbyPxybdZaNmGa%2ByT272YEAiv4%3D"
/// );
/// ```
pub fn presign(
    request: &SignableRequest,
    credentials: &Credentials,
    expires: i64,
) -> Result<PresignedQuery, AuthError> {
    credentials.ensure_usable()?;

    let string_to_sign = presigned_canonical_string(request, expires);
    debug!(
        access_key_id = %credentials.access_key_id(),
        expires,
        string_to_sign = ?string_to_sign,
        "Built OSS pre-signed canonical string"
    );

    let signature = compute_signature(credentials.secret_access_key(), &string_to_sign)?;
    Ok(PresignedQuery {
        access_key_id: credentials.access_key_id().to_owned(),
        expires,
        signature,
    })
}

/// Build a full pre-signed URL: `base_url` + resource + pre-signed query.
///
/// `base_url` is the scheme and authority (e.g. `http://oss.aliyuncs.com`)
/// without a trailing slash.
///
/// # Errors
///
/// Same as [`presign`].
pub fn presigned_url(
    base_url: &str,
    request: &SignableRequest,
    credentials: &Credentials,
    expires: i64,
) -> Result<String, AuthError> {
    let query = presign(request, credentials, expires)?;
    let resource = request.resource();
    let separator = if resource.contains('?') { '&' } else { '?' };
    Ok(format!("{base_url}{resource}{separator}{query}"))
}

/// Parse pre-signed URL query parameters.
///
/// # Errors
///
/// Returns [`AuthError::MissingQueryParam`] if any of the three parameters is
/// absent or `Expires` is not an integer.
pub fn parse_presigned_params(query: &str) -> Result<PresignedQuery, AuthError> {
    let params: HashMap<&str, String> = query
        .split('&')
        .filter(|s| !s.is_empty())
        .filter_map(|param| {
            let (key, value) = param.split_once('=')?;
            Some((
                key,
                percent_decode_str(value).decode_utf8_lossy().into_owned(),
            ))
        })
        .collect();

    let access_key_id = get_required_param(&params, ACCESS_KEY_ID_PARAM)?;
    let expires = get_required_param(&params, EXPIRES_PARAM)?
        .parse()
        .map_err(|_| AuthError::MissingQueryParam(format!("{EXPIRES_PARAM} (invalid integer)")))?;
    let signature = get_required_param(&params, SIGNATURE_PARAM)?;

    Ok(PresignedQuery {
        access_key_id,
        expires,
        signature,
    })
}

/// Verify a pre-signed URL request at time `now` (unix seconds).
///
/// # Errors
///
/// Returns an [`AuthError`] if parameters are missing, the URL has expired,
/// the access key is unknown, or the signature does not match.
pub fn verify_presigned(
    parts: &http::request::Parts,
    credential_provider: &dyn CredentialProvider,
    now: i64,
) -> Result<AuthResult, AuthError> {
    let parsed = parse_presigned_params(parts.uri.query().unwrap_or(""))?;

    debug!(
        access_key_id = %parsed.access_key_id,
        expires = parsed.expires,
        "Verifying pre-signed URL"
    );

    if now > parsed.expires {
        return Err(AuthError::RequestExpired);
    }

    let secret_key = credential_provider.get_secret_key(&parsed.access_key_id)?;
    let string_to_sign =
        presigned_canonical_string(&SignableRequest::from_parts(parts), parsed.expires);
    let expected_signature = compute_signature(&secret_key, &string_to_sign)?;

    if parsed
        .signature
        .as_bytes()
        .ct_eq(expected_signature.as_bytes())
        .into()
    {
        debug!(access_key_id = %parsed.access_key_id, "Pre-signed URL verification succeeded");
        Ok(AuthResult {
            access_key_id: parsed.access_key_id,
        })
    } else {
        debug!(
            expected = %expected_signature,
            provided = %parsed.signature,
            "Pre-signed URL signature mismatch"
        );
        Err(AuthError::SignatureDoesNotMatch)
    }
}

fn get_required_param(params: &HashMap<&str, String>, name: &str) -> Result<String, AuthError> {
    params
        .get(name)
        .cloned()
        .ok_or_else(|| AuthError::MissingQueryParam(name.to_owned()))
}
