// ── Lock state interpretation ──

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use nukictl_api::{Device, LockAction};

/// Lock position as reported by the bridge `state` code.
///
/// Only `1` and `3` are meaningful to this client; everything else
/// (unlocking, locking, motor blocked, uncalibrated, ...) is transitional
/// or unknown and kept as its raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    Locked,
    Unlocked,
    Other(u32),
}

impl LockState {
    pub const LOCKED_CODE: u32 = 1;
    pub const UNLOCKED_CODE: u32 = 3;

    pub fn from_code(code: u32) -> Self {
        match code {
            Self::LOCKED_CODE => Self::Locked,
            Self::UNLOCKED_CODE => Self::Unlocked,
            other => Self::Other(other),
        }
    }

    /// Read the `state` field of a `lockState` payload.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        payload
            .get("state")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .map(Self::from_code)
    }

    /// Last state the bridge reported in `/list`, if it has polled the lock.
    pub fn of_device(device: &Device) -> Option<Self> {
        device.state_code().map(Self::from_code)
    }

    /// The action that flips this state, if the state is settled.
    pub fn toggle_action(self) -> Option<LockAction> {
        match self {
            Self::Locked => Some(LockAction::Unlock),
            Self::Unlocked => Some(LockAction::Lock),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => f.write_str("locked"),
            Self::Unlocked => f.write_str("unlocked"),
            Self::Other(code) => write!(f, "unknown ({code})"),
        }
    }
}
