//! Single-device handlers: open, close, status, toggle.

use serde_json::Value;

use nukictl_core::{Intent, LockState, RetryOutcome, ToggleResult};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Detail views ────────────────────────────────────────────────────

fn outcome_lines(outcome: &RetryOutcome, color: bool) -> Vec<String> {
    let mut lines = vec![
        format!("Result:   {}", output::paint_result(outcome.succeeded, color)),
        format!("Attempts: {}", outcome.attempts),
        format!(
            "HTTP:     {}",
            outcome
                .last_http_status
                .map_or_else(|| "-".into(), |s| s.to_string())
        ),
    ];
    if let Some(state) = outcome.json().and_then(LockState::from_payload) {
        let name = state_name(outcome.json());
        lines.push(format!(
            "State:    {}{}",
            output::paint_state(Some(state), color),
            name.map(|n| format!(" ({n})")).unwrap_or_default()
        ));
    }
    if let Some(battery) = outcome.json().and_then(|v| v.get("batteryCritical")) {
        lines.push(format!("Battery:  {}", battery_label(battery)));
    }
    if let Some(reason) = outcome.failure_reason() {
        lines.push(format!("Reason:   {reason}"));
    }
    if let Some(payload) = &outcome.last_payload {
        let body = match payload.as_json() {
            Some(json) => json.to_string(),
            None => serde_json::to_string(payload).unwrap_or_default(),
        };
        lines.push(format!("Response: {body}"));
    }
    lines
}

fn state_name(payload: Option<&Value>) -> Option<&str> {
    payload.and_then(|v| v.get("stateName")).and_then(Value::as_str)
}

fn battery_label(critical: &Value) -> &'static str {
    if critical.as_bool() == Some(true) {
        "critical"
    } else {
        "ok"
    }
}

/// Plain output: the state name for `status`, `ok`/`failed` otherwise.
fn plain(intent: Intent, outcome: &RetryOutcome) -> String {
    if intent == Intent::Status && outcome.succeeded {
        if let Some(name) = state_name(outcome.json()) {
            return name.to_owned();
        }
        if let Some(state) = outcome.json().and_then(LockState::from_payload) {
            return state.to_string();
        }
    }
    output::paint_result(outcome.succeeded, false)
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn report_outcome(
    intent: Intent,
    outcome: &RetryOutcome,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let out = output::render_single(
        &global.output,
        outcome,
        |o| outcome_lines(o, color).join("\n"),
        |o| plain(intent, o),
    )?;
    output::print_output(&out, global.quiet);

    if outcome.succeeded {
        Ok(())
    } else {
        Err(action_failed(&intent.to_string(), outcome))
    }
}

pub fn report_toggle(
    toggled: &ToggleResult,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let out = output::render_single(
        &global.output,
        toggled,
        |t| {
            let mut lines = vec![
                format!("Was:      {}", output::paint_state(t.state, color)),
                format!(
                    "Action:   {}",
                    t.action.map_or_else(|| "-".into(), |a| a.to_string())
                ),
            ];
            lines.extend(outcome_lines(&t.outcome, color));
            lines.join("\n")
        },
        |t| match (t.action, t.outcome.succeeded) {
            (Some(action), true) => action.to_string(),
            _ => output::paint_result(false, false),
        },
    )?;
    output::print_output(&out, global.quiet);

    if toggled.outcome.succeeded {
        Ok(())
    } else {
        Err(action_failed(&Intent::Toggle.to_string(), &toggled.outcome))
    }
}

pub(crate) fn action_failed(action: &str, outcome: &RetryOutcome) -> CliError {
    CliError::ActionFailed {
        action: action.to_owned(),
        attempts: outcome.attempts,
        reason: outcome
            .failure_reason()
            .unwrap_or("bridge did not confirm")
            .to_owned(),
    }
}
