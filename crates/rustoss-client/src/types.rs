//! Request options and response types for object operations.

use std::collections::BTreeMap;

use bytes::Bytes;
use typed_builder::TypedBuilder;

/// Prefix of user metadata headers.
pub const META_HEADER_PREFIX: &str = "x-oss-meta-";

/// Content type used when a put does not specify one.
pub const DEFAULT_CONTENT_TYPE: &str = "binary/octet-stream";

/// Filters and paging for [`OssClient::list_objects`](crate::OssClient::list_objects).
#[derive(Debug, Clone, Default, PartialEq, Eq, TypedBuilder)]
pub struct ListObjectsOptions {
    /// Only keys starting with this prefix.
    #[builder(default, setter(strip_option, into))]
    pub prefix: Option<String>,
    /// Start listing after this key.
    #[builder(default, setter(strip_option, into))]
    pub marker: Option<String>,
    /// Roll keys up to the first occurrence of this delimiter.
    #[builder(default, setter(strip_option, into))]
    pub delimiter: Option<String>,
    /// Page size.
    #[builder(default, setter(strip_option))]
    pub max_keys: Option<u32>,
}

/// Options for [`OssClient::put_object`](crate::OssClient::put_object).
#[derive(Debug, Clone, Default, PartialEq, Eq, TypedBuilder)]
pub struct PutObjectOptions {
    /// Content type; `binary/octet-stream` when absent.
    #[builder(default, setter(strip_option, into))]
    pub content_type: Option<String>,
    /// User metadata, sent as `x-oss-meta-<name>` headers.
    #[builder(default)]
    pub metadata: BTreeMap<String, String>,
}

/// An object as returned by GET or HEAD.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectOutput {
    /// Object data; empty for HEAD.
    pub body: Bytes,
    /// `Content-Type` response header.
    pub content_type: Option<String>,
    /// `Content-Length` response header.
    pub content_length: Option<u64>,
    /// `ETag` response header.
    pub etag: Option<String>,
    /// `Last-Modified` response header.
    pub last_modified: Option<String>,
    /// User metadata with the `x-oss-meta-` prefix stripped.
    pub metadata: BTreeMap<String, String>,
}

impl ObjectOutput {
    /// Extract object attributes from response headers.
    #[must_use]
    pub fn from_response(response: http::Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        let header = |name: http::header::HeaderName| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned)
        };

        let metadata = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                let key = name.as_str().strip_prefix(META_HEADER_PREFIX)?;
                Some((key.to_owned(), value.to_str().ok()?.to_owned()))
            })
            .collect();

        Self {
            content_type: header(http::header::CONTENT_TYPE),
            content_length: header(http::header::CONTENT_LENGTH).and_then(|v| v.parse().ok()),
            etag: header(http::header::ETAG),
            last_modified: header(http::header::LAST_MODIFIED),
            metadata,
            body,
        }
    }
}
