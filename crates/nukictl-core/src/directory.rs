// ── Device directory ──
//
// Always a fresh `GET /list`: names are resolved against current bridge
// state, never a cached copy.

use tracing::debug;

use nukictl_api::{Device, DeviceId, Endpoint, Transport};

use crate::config::BridgeContext;
use crate::error::CoreError;
use crate::request::ActionRequest;
use crate::retry::{FailureKind, RetryExecutor, RetryOutcome, RetryPolicy};

/// Lists paired devices and resolves names to ids.
pub struct DeviceDirectory<'a, T> {
    executor: &'a RetryExecutor<T>,
    ctx: &'a BridgeContext,
}

impl<'a, T: Transport> DeviceDirectory<'a, T> {
    pub fn new(executor: &'a RetryExecutor<T>, ctx: &'a BridgeContext) -> Self {
        Self { executor, ctx }
    }

    /// Fetch every paired device, in the order the bridge reports them.
    ///
    /// Single attempt; any failure is returned as an error.
    pub async fn fetch_all(&self) -> Result<Vec<Device>, CoreError> {
        let outcome = self
            .executor
            .execute(
                self.ctx.endpoints(),
                &ActionRequest::list(),
                &RetryPolicy::single_attempt(),
            )
            .await;
        let payload = read_outcome(Endpoint::List, outcome)?;

        let devices: Vec<Device> =
            serde_json::from_value(payload).map_err(|e| CoreError::MalformedResponse {
                endpoint: Endpoint::List,
                message: e.to_string(),
            })?;
        debug!(count = devices.len(), "fetched device list");
        Ok(devices)
    }

    /// Id of the first device whose name equals `name` exactly.
    pub async fn resolve_by_name(&self, name: &str) -> Result<DeviceId, CoreError> {
        let devices = self.fetch_all().await?;
        devices
            .into_iter()
            .find(|d| d.name.as_deref() == Some(name))
            .map(|d| {
                debug!(name, id = %d.id, "resolved device name");
                d.id
            })
            .ok_or_else(|| CoreError::DeviceNotFound { name: name.into() })
    }
}

/// Turn a single-attempt read outcome into its payload or a fatal error.
pub(crate) fn read_outcome(
    endpoint: Endpoint,
    outcome: RetryOutcome,
) -> Result<serde_json::Value, CoreError> {
    if outcome.succeeded {
        return outcome.json().cloned().ok_or_else(|| CoreError::MalformedResponse {
            endpoint,
            message: "empty response".into(),
        });
    }

    let Some(failure) = outcome.last_failure else {
        return Err(CoreError::RequestFailed {
            endpoint,
            status: outcome.last_http_status,
            reason: "request failed".into(),
        });
    };

    Err(match failure.kind {
        FailureKind::Fatal => CoreError::MalformedResponse {
            endpoint,
            message: failure.reason,
        },
        FailureKind::Timeout => CoreError::Timeout { endpoint },
        FailureKind::Transport => CoreError::BridgeUnreachable {
            endpoint,
            reason: failure.reason,
        },
        FailureKind::Retryable => CoreError::RequestFailed {
            endpoint,
            status: outcome.last_http_status,
            reason: failure.reason,
        },
    })
}
