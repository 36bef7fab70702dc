//! The network seam of the client.
//!
//! [`Connection`](crate::connection::Connection) hands fully signed requests to
//! a [`Transport`] and gets raw responses back. [`ReqwestTransport`] is the
//! production implementation; tests plug in their own.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Sends one HTTP request and returns the complete response.
///
/// Implementations must not alter signed headers. Non-success statuses are
/// returned as responses, not errors; `Err` is for delivery failures only.
#[async_trait]
pub trait Transport: fmt::Debug + Send + Sync {
    /// Send `request` and buffer the whole response body.
    async fn send(&self, request: http::Request<Bytes>) -> ClientResult<http::Response<Bytes>>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport honouring the timeout and proxy settings of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the proxy URL is invalid or the
    /// underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout());

        if let Some(settings) = &config.proxy {
            let mut proxy = reqwest::Proxy::all(settings.url())
                .map_err(|e| ClientError::Config(format!("invalid proxy: {e}")))?;
            if let Some(user) = &settings.user {
                proxy = proxy.basic_auth(user, settings.password.as_deref().unwrap_or(""));
            }
            debug!(proxy = %settings.url(), "Using HTTP proxy");
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: http::Request<Bytes>) -> ClientResult<http::Response<Bytes>> {
        let (parts, body) = request.into_parts();

        let response = self
            .client
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        let mut out = http::Response::new(body);
        *out.status_mut() = status;
        *out.headers_mut() = headers;
        Ok(out)
    }
}
