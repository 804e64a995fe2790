//! Device list and bridge info handlers.

use serde_json::Value;
use tabled::Tabled;

use nukictl_core::{Device, LockState};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Battery")]
    battery: String,
    #[tabled(rename = "Door")]
    door: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
}

impl DeviceRow {
    fn new(d: &Device, color: bool) -> Self {
        let last = d.last_known_state.as_ref();
        Self {
            id: d.id.to_string(),
            name: d.name.clone().unwrap_or_default(),
            dtype: d.device_type.map(device_type_name).unwrap_or_default(),
            state: output::paint_state(LockState::of_device(d), color),
            battery: last.map(battery).unwrap_or_default(),
            door: last
                .and_then(|s| s.doorsensor_state_name.clone())
                .unwrap_or_default(),
            firmware: d.firmware_version.clone().unwrap_or_default(),
        }
    }
}

fn device_type_name(code: u32) -> String {
    match code {
        0 => "smartlock".into(),
        2 => "opener".into(),
        3 => "smartdoor".into(),
        4 => "smartlock3".into(),
        other => other.to_string(),
    }
}

fn battery(s: &nukictl_core::LastKnownState) -> String {
    let level = s
        .battery_charge_state
        .map(|pct| format!("{pct}%"))
        .unwrap_or_default();
    match (s.battery_critical, s.battery_charging) {
        (Some(true), _) => format!("{level} critical").trim().to_owned(),
        (_, Some(true)) => format!("{level} charging").trim().to_owned(),
        _ => level,
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn list(devices: &[Device], global: &GlobalOpts, color: bool) -> Result<(), CliError> {
    let out = output::render_list(
        &global.output,
        devices,
        |d| DeviceRow::new(d, color),
        |d| d.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Bridge info is passed through as JSON; the table view flattens one level.
pub fn info(info: &Value, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, info, detail, |v| v.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(info: &Value) -> String {
    let Some(map) = info.as_object() else {
        return info.to_string();
    };
    let width = map.keys().map(String::len).max().unwrap_or(0) + 1;
    map.iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{:<width$} {rendered}", format!("{key}:"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
