//! Bucket and object operations.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use chrono::Utc;
use http::header::{CONTENT_TYPE, ETAG};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use md5::{Digest, Md5};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rustoss_auth::Credentials;
use rustoss_xml::{ListAllMyBucketsResult, ListBucketResult, from_xml};
use tracing::debug;

use crate::config::ClientConfig;
use crate::connection::Connection;
use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;
use crate::types::{
    DEFAULT_CONTENT_TYPE, ListObjectsOptions, META_HEADER_PREFIX, ObjectOutput, PutObjectOptions,
};

/// `Content-MD5` has no constant in `http::header`.
const CONTENT_MD5: HeaderName = HeaderName::from_static("content-md5");

/// Characters escaped in object keys: everything except unreserved characters and `/`.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Characters escaped in query parameter values.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// High-level OSS client.
///
/// Clone is cheap; clones share one [`Connection`].
///
/// # Examples
///
/// ```no_run
/// use rustoss_auth::Credentials;
/// use rustoss_client::{ClientConfig, OssClient, PutObjectOptions};
///
/// # async fn run() -> Result<(), rustoss_client::ClientError> {
/// let client = OssClient::new(ClientConfig::default(), Credentials::new("AKID", "secret"))?;
/// client
///     .put_object("quotes", "nelson", "hello".into(), &PutObjectOptions::default())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OssClient {
    connection: Arc<Connection>,
}

impl OssClient {
    /// Create a client over the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the transport cannot be built.
    pub fn new(config: ClientConfig, credentials: Credentials) -> ClientResult<Self> {
        Ok(Self {
            connection: Arc::new(Connection::with_reqwest(config, credentials)?),
        })
    }

    /// Create a client over an explicit transport.
    pub fn with_transport(
        config: ClientConfig,
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            connection: Arc::new(Connection::new(config, credentials, transport)),
        }
    }

    /// Create a client from `OSS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] if credentials are not set.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env(), Credentials::from_env()?)
    }

    /// The underlying connection.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// List all buckets owned by the caller.
    pub async fn list_buckets(&self) -> ClientResult<ListAllMyBucketsResult> {
        let response = self
            .connection
            .request(Method::GET, "/", None, HeaderMap::new(), Bytes::new())
            .await?;
        Ok(from_xml(response.body())?)
    }

    /// Create a bucket.
    pub async fn create_bucket(&self, bucket: &str) -> ClientResult<()> {
        debug!(bucket, "Creating bucket");
        self.connection
            .request(
                Method::PUT,
                &bucket_path(bucket),
                None,
                HeaderMap::new(),
                Bytes::new(),
            )
            .await?;
        Ok(())
    }

    /// Delete an empty bucket.
    pub async fn delete_bucket(&self, bucket: &str) -> ClientResult<()> {
        debug!(bucket, "Deleting bucket");
        self.connection
            .request(
                Method::DELETE,
                &bucket_path(bucket),
                None,
                HeaderMap::new(),
                Bytes::new(),
            )
            .await?;
        Ok(())
    }

    /// List one page of objects in a bucket.
    pub async fn list_objects(
        &self,
        bucket: &str,
        options: &ListObjectsOptions,
    ) -> ClientResult<ListBucketResult> {
        let query = list_objects_query(options);
        let response = self
            .connection
            .request(
                Method::GET,
                &bucket_path(bucket),
                Some(&query),
                HeaderMap::new(),
                Bytes::new(),
            )
            .await?;
        Ok(from_xml(response.body())?)
    }

    /// Upload an object and return its ETag.
    ///
    /// `Content-MD5` is computed from `body` so the service can reject corrupted uploads.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        options: &PutObjectOptions,
    ) -> ClientResult<Option<String>> {
        let mut headers = HeaderMap::new();
        let content_type = options.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(content_type).map_err(http::Error::from)?,
        );
        headers.insert(
            CONTENT_MD5,
            HeaderValue::from_str(&content_md5(&body)).map_err(http::Error::from)?,
        );
        // Names differing only in case land on one header; the signer joins their values.
        for (name, value) in &options.metadata {
            let header = format!("{META_HEADER_PREFIX}{}", name.to_ascii_lowercase());
            headers.append(
                HeaderName::from_bytes(header.as_bytes()).map_err(http::Error::from)?,
                HeaderValue::from_str(value).map_err(http::Error::from)?,
            );
        }

        debug!(bucket, key, size = body.len(), "Uploading object");
        let response = self
            .connection
            .request(
                Method::PUT,
                &object_path(bucket, key),
                None,
                headers,
                body,
            )
            .await?;

        Ok(response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned))
    }

    /// Download an object.
    pub async fn get_object(&self, bucket: &str, key: &str) -> ClientResult<ObjectOutput> {
        let response = self
            .connection
            .request(
                Method::GET,
                &object_path(bucket, key),
                None,
                HeaderMap::new(),
                Bytes::new(),
            )
            .await?;
        Ok(ObjectOutput::from_response(response))
    }

    /// Fetch object attributes without the body.
    pub async fn head_object(&self, bucket: &str, key: &str) -> ClientResult<ObjectOutput> {
        let response = self
            .connection
            .request(
                Method::HEAD,
                &object_path(bucket, key),
                None,
                HeaderMap::new(),
                Bytes::new(),
            )
            .await?;
        Ok(ObjectOutput::from_response(response))
    }

    /// Delete an object.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> ClientResult<()> {
        debug!(bucket, key, "Deleting object");
        self.connection
            .request(
                Method::DELETE,
                &object_path(bucket, key),
                None,
                HeaderMap::new(),
                Bytes::new(),
            )
            .await?;
        Ok(())
    }

    /// Whether an object exists. A 404 answers `false`; other failures are errors.
    pub async fn object_exists(&self, bucket: &str, key: &str) -> ClientResult<bool> {
        match self.head_object(bucket, key).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Build a pre-signed GET URL for an object.
    ///
    /// The URL expires `expires_in` from now, or after the configured default.
    pub fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Option<Duration>,
    ) -> ClientResult<String> {
        let expires_in =
            expires_in.unwrap_or_else(|| self.connection.config().presign_expires_in());
        let secs = i64::try_from(expires_in.as_secs())
            .map_err(|_| ClientError::Config(format!("expiry too large: {expires_in:?}")))?;
        let expires = Utc::now().timestamp().saturating_add(secs);
        self.connection
            .presigned_url(Method::GET, &object_path(bucket, key), expires)
    }
}

/// `/bucket`
fn bucket_path(bucket: &str) -> String {
    format!("/{bucket}")
}

/// `/bucket/key`, with the key percent-encoded except for `/`.
fn object_path(bucket: &str, key: &str) -> String {
    format!("/{bucket}/{}", utf8_percent_encode(key, KEY_ENCODE_SET))
}

/// Base64 MD5 digest of `body`, as sent in `Content-MD5`.
fn content_md5(body: &[u8]) -> String {
    BASE64.encode(Md5::digest(body).as_slice())
}

fn list_objects_query(options: &ListObjectsOptions) -> String {
    let mut params: Vec<String> = Vec::new();
    let mut push = |name: &str, value: &str| {
        params.push(format!("{name}={}", utf8_percent_encode(value, QUERY_ENCODE_SET)));
    };

    if let Some(prefix) = &options.prefix {
        push("prefix", prefix);
    }
    if let Some(marker) = &options.marker {
        push("marker", marker);
    }
    if let Some(delimiter) = &options.delimiter {
        push("delimiter", delimiter);
    }
    if let Some(max_keys) = options.max_keys {
        push("max-keys", &max_keys.to_string());
    }

    params.join("&")
}
