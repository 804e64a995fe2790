// Shared transport configuration and the single-GET transport seam.
//
// The bridge is Bluetooth-backed and may be slow or asleep, so both the
// connect and the total timeout are bounded. Retries never happen here;
// every call is exactly one round trip.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace};
use url::Url;

use crate::error::Error;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .user_agent(concat!("nukictl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}

/// One bridge response, whatever its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A single HTTP GET against the bridge.
///
/// Implementations must perform exactly one round trip and must return
/// non-2xx responses as `Ok`. Only failures that prevent a response from
/// arriving at all are `Err`.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> impl Future<Output = Result<RawResponse, Error>> + Send;
}

/// `reqwest`-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport from a `TransportConfig`.
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
            timeout: config.timeout,
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        // reqwest embeds the request URL (and so the token) in its message.
        let err = err.without_url();
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, Error> {
        // The query string carries the token, so only the path is logged.
        debug!(path = url.path(), "GET");

        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| self.map_send_error(e))?;
        trace!(status, len = body.len(), "bridge responded");

        Ok(RawResponse { status, body })
    }
}
