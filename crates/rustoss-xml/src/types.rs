//! Response models for the OSS REST API.

use chrono::{DateTime, Utc};

/// The owner of a bucket or object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owner {
    /// Canonical owner ID.
    pub id: String,
    /// Human-readable owner name.
    pub display_name: String,
}

/// A bucket entry in a `ListAllMyBucketsResult`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    /// Bucket name.
    pub name: String,
    /// When the bucket was created.
    pub creation_date: Option<DateTime<Utc>>,
}

/// Response body of `GET /` (list all buckets).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAllMyBucketsResult {
    /// The account owning the buckets.
    pub owner: Option<Owner>,
    /// The buckets, in service order.
    pub buckets: Vec<Bucket>,
}

/// An object entry (`Contents`) in a `ListBucketResult`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Object key.
    pub key: String,
    /// Last modification time.
    pub last_modified: Option<DateTime<Utc>>,
    /// Entity tag, including the surrounding quotes the service returns.
    pub etag: String,
    /// Object size in bytes.
    pub size: i64,
    /// Storage class, if reported.
    pub storage_class: Option<String>,
    /// Object owner, if reported.
    pub owner: Option<Owner>,
}

/// Response body of `GET /{bucket}` (list objects).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBucketResult {
    /// Bucket name.
    pub name: String,
    /// Prefix filter echoed back.
    pub prefix: String,
    /// Marker echoed back.
    pub marker: String,
    /// Marker to continue a truncated listing.
    pub next_marker: Option<String>,
    /// Page size echoed back.
    pub max_keys: i32,
    /// Delimiter echoed back.
    pub delimiter: Option<String>,
    /// Whether more results are available.
    pub is_truncated: bool,
    /// Objects in this page.
    pub contents: Vec<ObjectSummary>,
    /// Rolled-up key prefixes when a delimiter was given.
    pub common_prefixes: Vec<String>,
}

/// A service error body (`<Error>...</Error>`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code, e.g. `NoSuchBucket`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// The resource the error refers to.
    pub resource: Option<String>,
    /// Service request ID.
    pub request_id: Option<String>,
    /// Service host ID.
    pub host_id: Option<String>,
}
