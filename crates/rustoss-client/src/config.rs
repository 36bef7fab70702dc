//! Client configuration.
//!
//! Provides [`ClientConfig`] and [`ProxySettings`]. Values can be built with the
//! typed builder or loaded from `OSS_*` environment variables. Credentials are
//! deliberately not part of the config; see [`rustoss_auth::Credentials`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default service endpoint.
pub const DEFAULT_ENDPOINT: &str = "oss.aliyuncs.com";

/// Default proxy port when `OSS_PROXY_PORT` is unset or invalid.
pub const DEFAULT_PROXY_PORT: u16 = 8080;

/// HTTP proxy used to reach the service.
///
/// `host` may carry a scheme (`http://proxy.local`); `http://` is assumed otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ProxySettings {
    /// Proxy host name, optionally with scheme.
    #[builder(setter(into))]
    pub host: String,

    /// Proxy port.
    #[builder(default = DEFAULT_PROXY_PORT)]
    pub port: u16,

    /// User for proxy basic authentication.
    #[builder(default, setter(strip_option, into))]
    pub user: Option<String>,

    /// Password for proxy basic authentication.
    #[builder(default, setter(strip_option, into))]
    pub password: Option<String>,
}

impl ProxySettings {
    /// The proxy URL, e.g. `http://google.com:8080`.
    #[must_use]
    pub fn url(&self) -> String {
        if self.host.contains("://") {
            format!("{}:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

/// OSS client configuration.
///
/// # Examples
///
/// ```
/// use rustoss_client::config::ClientConfig;
///
/// let config = ClientConfig::builder().endpoint("oss.example.com".into()).use_ssl(true).build();
/// assert_eq!(config.base_url(), "https://oss.example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Service host name (no scheme, no port).
    #[builder(default = String::from(DEFAULT_ENDPOINT))]
    pub endpoint: String,

    /// Whether to use HTTPS.
    #[builder(default = false)]
    pub use_ssl: bool,

    /// Explicit port; the scheme default is used when absent.
    #[builder(default, setter(strip_option))]
    pub port: Option<u16>,

    /// Per-request timeout in seconds.
    #[builder(default = 60)]
    pub timeout_secs: u64,

    /// Default lifetime of pre-signed URLs in seconds.
    #[builder(default = 300)]
    pub presign_expires_in_secs: u64,

    /// Optional HTTP proxy.
    #[builder(default, setter(strip_option))]
    pub proxy: Option<ProxySettings>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `OSS_ENDPOINT` | `oss.aliyuncs.com` |
    /// | `OSS_USE_SSL` | `false` |
    /// | `OSS_PORT` | none |
    /// | `OSS_TIMEOUT_SECS` | `60` |
    /// | `OSS_PRESIGN_EXPIRES_IN` | `300` |
    /// | `OSS_PROXY_HOST` | none (no proxy) |
    /// | `OSS_PROXY_PORT` | `8080` |
    /// | `OSS_PROXY_USER` | none |
    /// | `OSS_PROXY_PASSWORD` | none |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("OSS_ENDPOINT") {
            config.endpoint = v;
        }
        if let Some(v) = lookup("OSS_USE_SSL") {
            config.use_ssl = parse_bool(&v);
        }
        if let Some(v) = lookup("OSS_PORT") {
            config.port = v.parse().ok();
        }
        if let Some(v) = lookup("OSS_TIMEOUT_SECS") {
            if let Ok(n) = v.parse() {
                config.timeout_secs = n;
            }
        }
        if let Some(v) = lookup("OSS_PRESIGN_EXPIRES_IN") {
            if let Ok(n) = v.parse() {
                config.presign_expires_in_secs = n;
            }
        }
        if let Some(host) = lookup("OSS_PROXY_HOST").filter(|h| !h.is_empty()) {
            config.proxy = Some(ProxySettings {
                host,
                port: lookup("OSS_PROXY_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_PROXY_PORT),
                user: lookup("OSS_PROXY_USER"),
                password: lookup("OSS_PROXY_PASSWORD"),
            });
        }

        config
    }

    /// Scheme, host and optional port, e.g. `http://oss.aliyuncs.com:8080`.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        match self.port {
            Some(port) => format!("{scheme}://{}:{port}", self.endpoint),
            None => format!("{scheme}://{}", self.endpoint),
        }
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Default pre-signed URL lifetime.
    #[must_use]
    pub fn presign_expires_in(&self) -> Duration {
        Duration::from_secs(self.presign_expires_in_secs)
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
