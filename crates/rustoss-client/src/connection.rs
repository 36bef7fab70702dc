//! Signed request dispatch.
//!
//! A [`Connection`] turns `(method, path, query, headers, body)` into a dated,
//! signed `http::Request`, passes it to its [`Transport`], and maps non-2xx
//! responses to [`ClientError::Service`].

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{AUTHORIZATION, DATE};
use http::{HeaderMap, HeaderValue, Method};
use rustoss_auth::{Credentials, SignableRequest, authorization_header, presigned_url};
use rustoss_xml::{ErrorResponse, from_xml};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::{ReqwestTransport, Transport};

/// Format a timestamp as an RFC 1123 HTTP date, e.g. `Thu, 17 Nov 2005 18:49:58 GMT`.
#[must_use]
pub fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Signs and dispatches requests against one endpoint with one key pair.
#[derive(Debug)]
pub struct Connection {
    config: ClientConfig,
    credentials: Credentials,
    transport: Arc<dyn Transport>,
}

impl Connection {
    /// Create a connection over an explicit transport.
    pub fn new(
        config: ClientConfig,
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            credentials,
            transport,
        }
    }

    /// Create a connection over a [`ReqwestTransport`] built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the transport cannot be built.
    pub fn with_reqwest(config: ClientConfig, credentials: Credentials) -> ClientResult<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(config, credentials, Arc::new(transport)))
    }

    /// The connection configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The access key ID requests are signed with.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        self.credentials.access_key_id()
    }

    /// Sign and send a request.
    ///
    /// `path` must already be percent-encoded; it is both the request path and
    /// the signed resource. A `Date` header is added unless `headers` has one.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] when credentials are incomplete (nothing is
    /// sent), [`ClientError::Transport`] on delivery failure, and
    /// [`ClientError::Service`] for non-2xx responses.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        headers: HeaderMap,
        body: Bytes,
    ) -> ClientResult<http::Response<Bytes>> {
        let url = match query {
            Some(q) if !q.is_empty() => format!("{}{path}?{q}", self.config.base_url()),
            _ => format!("{}{path}", self.config.base_url()),
        };

        let mut builder = http::Request::builder().method(method.clone()).uri(&url);
        if let Some(map) = builder.headers_mut() {
            *map = headers;
        }
        let (mut parts, body) = builder.body(body)?.into_parts();

        if !parts.headers.contains_key(DATE) {
            let date = HeaderValue::from_str(&http_date(Utc::now())).map_err(http::Error::from)?;
            parts.headers.insert(DATE, date);
        }

        let authorization =
            authorization_header(&SignableRequest::from_parts(&parts), &self.credentials)?;
        parts.headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&authorization).map_err(http::Error::from)?,
        );

        debug!(method = %method, path, query = ?query, "Dispatching OSS request");
        let response = self
            .transport
            .send(http::Request::from_parts(parts, body))
            .await?;

        let status = response.status();
        debug!(method = %method, path, status = %status, "Received OSS response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(service_error(&response))
        }
    }

    /// Build a pre-signed URL for `method` on `path`, valid until `expires` (unix seconds).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] when credentials are incomplete.
    pub fn presigned_url(&self, method: Method, path: &str, expires: i64) -> ClientResult<String> {
        Ok(presigned_url(
            &self.config.base_url(),
            &SignableRequest::new(method, path),
            &self.credentials,
            expires,
        )?)
    }
}

/// Map a non-success response to [`ClientError::Service`].
///
/// HEAD responses and some proxies return no body; the status reason stands in
/// for the code and message then.
fn service_error(response: &http::Response<Bytes>) -> ClientError {
    let status = response.status();
    let reason = status
        .canonical_reason()
        .unwrap_or("Unknown")
        .to_owned();

    let parsed = if response.body().is_empty() {
        None
    } else {
        from_xml::<ErrorResponse>(response.body())
            .inspect_err(|e| warn!(error = %e, "Failed to parse OSS error body"))
            .ok()
    };

    let (code, message, request_id) = match parsed {
        Some(err) if !err.code.is_empty() => (err.code, err.message, err.request_id),
        _ => (reason.clone(), reason, None),
    };

    warn!(status = %status, code = %code, message = %message, "OSS request failed");

    ClientError::Service {
        status,
        code,
        message,
        request_id,
    }
}
