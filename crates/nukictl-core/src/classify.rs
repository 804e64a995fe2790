// ── Response classification ──
//
// Decides, per endpoint, whether one bridge response is good enough to
// stop, worth another attempt, or hopeless.

use serde_json::Value;

use nukictl_api::Endpoint;

/// Verdict on a single bridge response.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The response satisfies the endpoint's contract; carries the decoded body.
    Accepted(Value),
    /// Another attempt may succeed.
    Retryable { reason: String },
    /// No further attempt can help.
    Fatal { reason: String },
}

impl Classification {
    fn retryable(reason: impl Into<String>) -> Self {
        Self::Retryable {
            reason: reason.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Classify a transport result for `endpoint`.
///
/// - any status other than exactly 200 is retryable;
/// - an undecodable body is fatal for `list`/`info` and retryable for lock calls;
/// - `lockAction` needs `"success": true`;
/// - `lockState` needs a `state` key (any value);
/// - `list`/`info` accept any JSON.
pub fn classify(endpoint: Endpoint, status: u16, body: &str) -> Classification {
    if status != 200 {
        return Classification::retryable(format!("http status {status}"));
    }

    let decoded: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) if endpoint.is_read_only() => {
            return Classification::Fatal {
                reason: "malformed response".into(),
            };
        }
        Err(_) => return Classification::retryable("malformed response"),
    };

    match endpoint {
        Endpoint::List | Endpoint::Info => Classification::Accepted(decoded),
        Endpoint::LockAction => {
            if decoded.get("success").and_then(Value::as_bool) == Some(true) {
                Classification::Accepted(decoded)
            } else {
                Classification::retryable("action not confirmed")
            }
        }
        Endpoint::LockState => {
            if decoded.get("state").is_some() {
                Classification::Accepted(decoded)
            } else {
                Classification::retryable("state not reported")
            }
        }
    }
}
