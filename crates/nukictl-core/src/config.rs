// ── Runtime bridge context ──
//
// Describes *which* bridge to talk to and how hard to try. Built once by
// the CLI (or any other adapter) and threaded immutably through every
// dispatch; core never touches disk or environment.

use secrecy::{ExposeSecret, SecretString};

use nukictl_api::{BridgeEndpoints, DeviceId};

use crate::error::CoreError;
use crate::retry::RetryPolicy;

/// How the target lock of a single-device intent is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSelector {
    /// Bridge-assigned `nukiId`.
    Id(DeviceId),
    /// Human label; resolved through a fresh `list` on every dispatch.
    Name(String),
}

/// Everything a dispatch needs, resolved up front.
#[derive(Debug, Clone)]
pub struct BridgeContext {
    endpoints: BridgeEndpoints,
    retry: RetryPolicy,
    device: Option<DeviceSelector>,
}

impl BridgeContext {
    /// Validate host and token, then build the bridge base URL.
    ///
    /// Fails before any network activity if either is blank.
    pub fn new(
        host: &str,
        port: u16,
        token: SecretString,
        retry: RetryPolicy,
    ) -> Result<Self, CoreError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(CoreError::config("bridge IP address is required"));
        }
        if token.expose_secret().trim().is_empty() {
            return Err(CoreError::config("bridge API token is required"));
        }
        let endpoints = BridgeEndpoints::from_host(host, port, token)?;
        Ok(Self::with_endpoints(endpoints, retry))
    }

    /// Use pre-built endpoints (e.g. a mock server URL in tests).
    pub fn with_endpoints(endpoints: BridgeEndpoints, retry: RetryPolicy) -> Self {
        Self {
            endpoints,
            retry,
            device: None,
        }
    }

    /// Attach the device a single-device intent operates on.
    pub fn with_device(mut self, device: DeviceSelector) -> Self {
        self.device = Some(device);
        self
    }

    pub fn endpoints(&self) -> &BridgeEndpoints {
        &self.endpoints
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn device(&self) -> Option<&DeviceSelector> {
        self.device.as_ref()
    }
}
