//! Canonical string construction for OSS request signing.
//!
//! The canonical string is the exact input to the HMAC:
//!
//! ```text
//! HTTP-Verb + "\n" +
//! Content-MD5 + "\n" +
//! Content-Type + "\n" +
//! (Date | Expires) + "\n" +
//! CanonicalizedOssHeaders +
//! CanonicalizedResource
//! ```
//!
//! `CanonicalizedOssHeaders` is one `name:value\n` line per `x-oss-*` header,
//! lowercased and sorted by name. `CanonicalizedResource` is the request path
//! without any query string.

use std::collections::BTreeMap;

use http::Method;

/// Prefix that marks a header as part of the signed vendor block (matched case-insensitively).
pub const VENDOR_HEADER_PREFIX: &str = "x-oss-";

/// Vendor date header; when present the `Date` line of the canonical string is left empty.
pub const VENDOR_DATE_HEADER: &str = "x-oss-date";

/// The parts of an HTTP request that participate in signing.
///
/// # Examples
///
/// ```
/// use http::Method;
/// use rustoss_auth::canonical::{SignableRequest, canonical_string};
///
/// let request = SignableRequest::new(Method::GET, "/bucket/key")
///     .date("Thu, 17 Nov 2005 18:49:58 GMT");
/// assert_eq!(
///     canonical_string(&request),
///     "GET\n\n\nThu, 17 Nov 2005 18:49:58 GMT\n/bucket/key"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableRequest {
    method: Method,
    resource: String,
    content_md5: Option<String>,
    content_type: Option<String>,
    date: Option<String>,
    headers: Vec<(String, String)>,
}

impl SignableRequest {
    /// Create a request descriptor for `method` on `resource` (e.g. `/bucket/object`).
    pub fn new(method: Method, resource: impl Into<String>) -> Self {
        Self {
            method,
            resource: resource.into(),
            content_md5: None,
            content_type: None,
            date: None,
            headers: Vec::new(),
        }
    }

    /// Build a descriptor from the head of an `http` request.
    ///
    /// The resource is the URI path. Header values that are not valid UTF-8 are
    /// converted lossily.
    #[must_use]
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        parts.headers.iter().fold(
            Self::new(parts.method.clone(), parts.uri.path()),
            |request, (name, value)| {
                request.header(
                    name.as_str(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            },
        )
    }

    /// Set the `Content-MD5` value.
    #[must_use]
    pub fn content_md5(mut self, value: impl Into<String>) -> Self {
        self.content_md5 = Some(value.into());
        self
    }

    /// Set the `Content-Type` value.
    #[must_use]
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.content_type = Some(value.into());
        self
    }

    /// Set the `Date` value (RFC 1123).
    #[must_use]
    pub fn date(mut self, value: impl Into<String>) -> Self {
        self.date = Some(value.into());
        self
    }

    /// Add a header.
    ///
    /// `Content-MD5`, `Content-Type` and `Date` (any case) populate their dedicated
    /// fields; every other header is kept in insertion order.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if name.eq_ignore_ascii_case("content-md5") {
            self.content_md5 = Some(value);
        } else if name.eq_ignore_ascii_case("content-type") {
            self.content_type = Some(value);
        } else if name.eq_ignore_ascii_case("date") {
            self.date = Some(value);
        } else {
            self.headers.push((name, value));
        }
        self
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The resource path as given.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The non-dedicated headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

/// Build the canonical string for header-based (`Authorization`) signing.
///
/// The fourth line is the `Date` value, or empty when absent or when an
/// `x-oss-date` header is present.
#[must_use]
pub fn canonical_string(request: &SignableRequest) -> String {
    let date = if request.has_header(VENDOR_DATE_HEADER) {
        ""
    } else {
        request.date.as_deref().unwrap_or("")
    };
    build_canonical_string(request, date)
}

/// Build the canonical string for pre-signed URL signing.
///
/// The expiration timestamp takes the place of the date; any `Date` value is ignored.
///
/// ```
/// use http::Method;
/// use rustoss_auth::canonical::{SignableRequest, presigned_canonical_string};
///
/// let request = SignableRequest::new(Method::GET, "/quotes/nelson");
/// assert_eq!(
///     presigned_canonical_string(&request, 1_141_889_120),
///     "GET\n\n\n1141889120\n/quotes/nelson"
/// );
/// ```
#[must_use]
pub fn presigned_canonical_string(request: &SignableRequest, expires: i64) -> String {
    build_canonical_string(request, &expires.to_string())
}

fn build_canonical_string(request: &SignableRequest, date_or_expires: &str) -> String {
    let method = request.method.as_str().to_ascii_uppercase();
    let content_md5 = request.content_md5.as_deref().unwrap_or("");
    let content_type = request.content_type.as_deref().unwrap_or("");
    let vendor_headers = build_canonicalized_vendor_headers(&request.headers);
    let resource = build_canonicalized_resource(&request.resource);

    format!("{method}\n{content_md5}\n{content_type}\n{date_or_expires}\n{vendor_headers}{resource}")
}

/// Build the `CanonicalizedOssHeaders` block.
///
/// Names are lowercased and sorted; values are used verbatim. Repeated names
/// collapse into one line with values joined by `,` in insertion order. Every
/// line, including the last, ends with `\n`.
#[must_use]
pub fn build_canonicalized_vendor_headers(headers: &[(String, String)]) -> String {
    let mut vendor: BTreeMap<String, Vec<&str>> = BTreeMap::new();

    for (name, value) in headers {
        let lower = name.to_ascii_lowercase();
        if lower.starts_with(VENDOR_HEADER_PREFIX) {
            vendor.entry(lower).or_default().push(value);
        }
    }

    let mut result = String::new();
    for (name, values) in &vendor {
        result.push_str(name);
        result.push(':');
        result.push_str(&values.join(","));
        result.push('\n');
    }
    result
}

/// Build the `CanonicalizedResource`: the path with any query string removed.
#[must_use]
pub fn build_canonicalized_resource(resource: &str) -> &str {
    resource
        .split_once('?')
        .map_or(resource, |(path, _query)| path)
}
