//! Integration tests for the RustOSS client.
//!
//! The client runs against [`MockTransport`], which verifies the signature of
//! every request it receives and replays queued [`FakeResponse`]s, so these
//! tests need no network. Run them with:
//!
//! ```text
//! cargo test -p rustoss-integration
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Once};

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use parking_lot::Mutex;
use rustoss_auth::{Credentials, StaticCredentialProvider, verify_authorization};
use rustoss_client::{ClientConfig, ClientError, ClientResult, OssClient, Transport};
use tracing::debug;

pub mod fixtures;

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A canned service response.
#[derive(Debug, Clone)]
pub struct FakeResponse {
    status: StatusCode,
    headers: Vec<(&'static str, String)>,
    body: Bytes,
}

impl FakeResponse {
    /// An empty `200 OK`.
    #[must_use]
    pub fn ok() -> Self {
        Self::with_status(StatusCode::OK)
    }

    /// An empty response with the given status.
    #[must_use]
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// A service error with an XML `<Error>` body.
    #[must_use]
    pub fn error(status: StatusCode, code: &str, message: &str) -> Self {
        Self::with_status(status).body(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Error><Code>{code}</Code><Message>{message}</Message>\
             <RequestId>4442587FB7D0A2F9</RequestId></Error>"
        ))
    }

    /// Add a response header.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Set the response body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    fn into_response(self) -> http::Response<Bytes> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }
        builder
            .body(self.body)
            .expect("fake response headers are valid")
    }
}

/// A request as seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Method, URI and headers.
    pub parts: http::request::Parts,
    /// Request body.
    pub body: Bytes,
}

impl RecordedRequest {
    /// A header value as a string, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// In-memory [`Transport`] that plays the role of the service.
///
/// Requests whose signature does not verify against the known key pair are
/// answered with `403 SignatureDoesNotMatch`, like the real service would.
#[derive(Debug)]
pub struct MockTransport {
    provider: StaticCredentialProvider,
    responses: Mutex<VecDeque<FakeResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// A transport that accepts requests signed by `credentials` and replays `responses` in order.
    #[must_use]
    pub fn new(
        credentials: &Credentials,
        responses: impl IntoIterator<Item = FakeResponse>,
    ) -> Self {
        Self {
            provider: StaticCredentialProvider::from(credentials),
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// The single request received; panics otherwise.
    #[must_use]
    pub fn only_request(&self) -> RecordedRequest {
        let requests = self.requests.lock();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests[0].clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: http::Request<Bytes>) -> ClientResult<http::Response<Bytes>> {
        let (parts, body) = request.into_parts();
        let verified = verify_authorization(&parts, &self.provider);
        debug!(
            method = %parts.method,
            uri = %parts.uri,
            ok = verified.is_ok(),
            "Mock transport received request"
        );
        self.requests.lock().push(RecordedRequest { parts, body });

        if verified.is_err() {
            return Ok(FakeResponse::error(
                StatusCode::FORBIDDEN,
                "SignatureDoesNotMatch",
                "The request signature we calculated does not match the signature you provided.",
            )
            .into_response());
        }

        self.responses
            .lock()
            .pop_front()
            .map(FakeResponse::into_response)
            .ok_or_else(|| ClientError::Transport("no canned response left".to_owned()))
    }
}

/// The key pair every test signs with.
#[must_use]
pub fn credentials() -> Credentials {
    Credentials::new(
        fixtures::example1::access_key_id(),
        fixtures::example1::secret_access_key(),
    )
}

/// A client signing with `client_credentials`, talking to a mock that trusts [`credentials`].
#[must_use]
pub fn mock_client_with(
    client_credentials: Credentials,
    responses: impl IntoIterator<Item = FakeResponse>,
) -> (OssClient, Arc<MockTransport>) {
    init_tracing();
    let transport = Arc::new(MockTransport::new(&credentials(), responses));
    let client = OssClient::with_transport(
        ClientConfig::default(),
        client_credentials,
        Arc::clone(&transport) as Arc<dyn Transport>,
    );
    (client, transport)
}

/// A correctly configured client over a mock that replays `responses`.
#[must_use]
pub fn mock_client(
    responses: impl IntoIterator<Item = FakeResponse>,
) -> (OssClient, Arc<MockTransport>) {
    mock_client_with(credentials(), responses)
}

mod test_bucket;
mod test_signing;
