// Bridge wire models for `GET /list`.
//
// Every field except the id may be missing depending on firmware and on
// whether the bridge has polled the lock yet. Absent fields stay absent on
// re-serialization; unknown fields are kept in `extra`.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque device identifier (`nukiId`).
///
/// The bridge reports ids as JSON numbers; some integrations hand out
/// string ids. Both round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceId {
    Numeric(u64),
    Text(String),
}

impl DeviceId {
    /// Compare against user input regardless of representation.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            Self::Numeric(n) => n.to_string() == raw,
            Self::Text(s) => s == raw,
        }
    }

    /// An empty or whitespace-only text id, which names no device.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for DeviceId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Only canonical digits become numbers, so `007` is sent as typed.
        Ok(match trimmed.parse::<u64>() {
            Ok(n) if n.to_string() == trimmed => Self::Numeric(n),
            _ => Self::Text(trimmed.to_owned()),
        })
    }
}

impl From<u64> for DeviceId {
    fn from(n: u64) -> Self {
        Self::Numeric(n)
    }
}

/// One paired lock as reported by `GET /list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(rename = "nukiId")]
    pub id: DeviceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,

    /// Absent until the bridge has polled the lock at least once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_known_state: Option<LastKnownState>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Device {
    /// Name for display, falling back to the id.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }

    /// Last reported state code, if any.
    pub fn state_code(&self) -> Option<u32> {
        self.last_known_state.as_ref().and_then(|s| s.state)
    }
}

/// Snapshot of the lock as last seen by the bridge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastKnownState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_critical: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_charging: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_charge_state: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keypad_battery_critical: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doorsensor_state: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doorsensor_state_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_list() -> Value {
        json!([
            {
                "deviceType": 4,
                "nukiId": 123_456_789,
                "name": "Front Door",
                "firmwareVersion": "3.6.9",
                "lastKnownState": {
                    "mode": 2,
                    "state": 1,
                    "stateName": "locked",
                    "batteryCritical": false,
                    "batteryCharging": false,
                    "batteryChargeState": 84,
                    "keypadBatteryCritical": false,
                    "doorsensorState": 2,
                    "doorsensorStateName": "door closed",
                    "timestamp": "2024-10-24T16:15:32+00:00"
                }
            },
            {
                "deviceType": 4,
                "nukiId": 987_654_321,
                "name": "Garage"
            }
        ])
    }

    #[test]
    fn decodes_full_and_unpolled_devices() {
        let devices: Vec<Device> = serde_json::from_value(sample_list()).unwrap();

        assert_eq!(devices.len(), 2);
        let front = &devices[0];
        assert_eq!(front.id, DeviceId::Numeric(123_456_789));
        assert_eq!(front.name.as_deref(), Some("Front Door"));
        assert_eq!(front.device_type, Some(4));
        assert_eq!(front.state_code(), Some(1));
        let state = front.last_known_state.as_ref().unwrap();
        assert_eq!(state.battery_charge_state, Some(84));
        assert_eq!(state.doorsensor_state_name.as_deref(), Some("door closed"));

        let garage = &devices[1];
        assert!(garage.last_known_state.is_none());
        assert!(garage.firmware_version.is_none());
    }

    #[test]
    fn reencoding_keeps_absent_fields_absent() {
        let original = sample_list();
        let devices: Vec<Device> = serde_json::from_value(original.clone()).unwrap();
        let reencoded = serde_json::to_value(&devices).unwrap();

        assert_eq!(reencoded, original);
        assert!(reencoded[1].get("lastKnownState").is_none());
    }

    #[test]
    fn unknown_fields_survive() {
        let raw = json!({
            "nukiId": "abc",
            "lastKnownState": { "state": 3, "ringactionState": true },
            "serverConnected": true
        });
        let device: Device = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(device.id, DeviceId::Text("abc".into()));
        assert_eq!(device.extra.get("serverConnected"), Some(&json!(true)));
        assert_eq!(serde_json::to_value(&device).unwrap(), raw);
    }

    #[test]
    fn device_id_parsing_and_matching() {
        assert_eq!("42".parse::<DeviceId>().unwrap(), DeviceId::Numeric(42));
        assert_eq!(
            "front-door".parse::<DeviceId>().unwrap(),
            DeviceId::Text("front-door".into())
        );
        assert!(DeviceId::Numeric(42).matches("42"));
        assert!(!DeviceId::Numeric(42).matches("042x"));
        assert!(DeviceId::Text("x1".into()).matches("x1"));
        assert_eq!(DeviceId::Numeric(7).to_string(), "7");
    }

    #[test]
    fn non_canonical_digits_stay_text() {
        for raw in ["007", "+7"] {
            let id = raw.parse::<DeviceId>().unwrap();
            assert_eq!(id, DeviceId::Text(raw.into()));
            assert_eq!(id.to_string(), raw);
        }
        assert!(!DeviceId::Numeric(7).matches("007"));
    }

    #[test]
    fn blank_ids() {
        assert!("".parse::<DeviceId>().unwrap().is_blank());
        assert!(DeviceId::Text("  ".into()).is_blank());
        assert!(!DeviceId::Numeric(0).is_blank());
        assert!(!DeviceId::Text("x".into()).is_blank());
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let device: Device = serde_json::from_value(json!({ "nukiId": 5 })).unwrap();
        assert_eq!(device.display_name(), "5");
    }
}
