// ── Typed bridge requests ──

use url::Url;

use nukictl_api::{BridgeEndpoints, DeviceId, Endpoint, LockAction};

/// One command to send to the bridge. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    endpoint: Endpoint,
    device_id: Option<DeviceId>,
    action: Option<LockAction>,
}

impl ActionRequest {
    pub fn list() -> Self {
        Self {
            endpoint: Endpoint::List,
            device_id: None,
            action: None,
        }
    }

    pub fn info() -> Self {
        Self {
            endpoint: Endpoint::Info,
            device_id: None,
            action: None,
        }
    }

    pub fn lock_action(device_id: DeviceId, action: LockAction) -> Self {
        Self {
            endpoint: Endpoint::LockAction,
            device_id: Some(device_id),
            action: Some(action),
        }
    }

    pub fn lock_state(device_id: DeviceId) -> Self {
        Self {
            endpoint: Endpoint::LockState,
            device_id: Some(device_id),
            action: None,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn device_id(&self) -> Option<&DeviceId> {
        self.device_id.as_ref()
    }

    pub fn action(&self) -> Option<LockAction> {
        self.action
    }

    /// Fully-qualified URL for this request against `endpoints`.
    pub fn url(&self, endpoints: &BridgeEndpoints) -> Url {
        endpoints.url_for(self.endpoint, self.device_id.as_ref(), self.action)
    }
}
