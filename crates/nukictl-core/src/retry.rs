// ── Bounded retry loop ──
//
// Fixed delay, no backoff growth: bridge hiccups are Bluetooth round trips
// that clear within a second or two, and worst-case latency stays at
// `max_attempts × (timeout + delay)`.

use std::num::NonZeroU32;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use nukictl_api::{BridgeEndpoints, Transport};

use crate::classify::{Classification, classify};
use crate::request::ActionRequest;

/// Pause between two attempts of the same request.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Attempt budget for lock calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: NonZeroU32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: NonZeroU32) -> Self {
        Self {
            max_attempts,
            delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Exactly one attempt (used for `list` and `info`).
    pub fn single_attempt() -> Self {
        Self::new(NonZeroU32::MIN)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(NonZeroU32::new(3).unwrap_or(NonZeroU32::MIN))
    }
}

/// Last body seen from the bridge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Json(Value),
    Raw(String),
}

impl Payload {
    /// Decode `body` as JSON if possible; `None` for an empty body.
    pub fn from_body(body: &str) -> Option<Self> {
        if body.trim().is_empty() {
            return None;
        }
        Some(
            serde_json::from_str(body)
                .map_or_else(|_| Self::Raw(body.to_owned()), Self::Json),
        )
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Raw(_) => None,
        }
    }
}

/// Why the last attempt did not count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No response arrived (DNS, refused, reset).
    Transport,
    /// No response within the transport timeout.
    Timeout,
    /// A response arrived but was not acceptable.
    Retryable,
    /// A response arrived that no retry can fix.
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub reason: String,
}

/// Result of running one request through the executor.
///
/// `1 <= attempts <= max_attempts` always holds. `succeeded` implies the
/// last attempt was classified as accepted, in which case `last_failure`
/// is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetryOutcome {
    pub succeeded: bool,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_payload: Option<Payload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<Failure>,
}

impl RetryOutcome {
    fn accepted(attempts: u32, status: u16, payload: Value) -> Self {
        Self {
            succeeded: true,
            attempts,
            last_http_status: Some(status),
            last_payload: Some(Payload::Json(payload)),
            last_failure: None,
        }
    }

    pub(crate) fn failed(
        attempts: u32,
        status: Option<u16>,
        payload: Option<Payload>,
        failure: Failure,
    ) -> Self {
        Self {
            succeeded: false,
            attempts,
            last_http_status: status,
            last_payload: payload,
            last_failure: Some(failure),
        }
    }

    /// Decoded JSON of the last response, if it was JSON.
    pub fn json(&self) -> Option<&Value> {
        self.last_payload.as_ref().and_then(Payload::as_json)
    }

    /// Whether retrying stopped early because of a fatal response.
    pub fn is_fatal(&self) -> bool {
        self.last_failure
            .as_ref()
            .is_some_and(|f| f.kind == FailureKind::Fatal)
    }

    /// Human-readable reason for a failed outcome.
    pub fn failure_reason(&self) -> Option<&str> {
        self.last_failure.as_ref().map(|f| f.reason.as_str())
    }
}

/// Runs [`ActionRequest`]s through a [`Transport`] with bounded retries.
#[derive(Debug, Clone)]
pub struct RetryExecutor<T> {
    transport: T,
}

impl<T: Transport> RetryExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute `request`, retrying retryable and transport failures until
    /// `policy.max_attempts` is spent. Accepted or fatal results stop
    /// immediately.
    pub async fn execute(
        &self,
        endpoints: &BridgeEndpoints,
        request: &ActionRequest,
        policy: &RetryPolicy,
    ) -> RetryOutcome {
        let endpoint = request.endpoint();
        let max_attempts = policy.max_attempts.get();
        let url = request.url(endpoints);
        let mut attempt = 0;
        // A transport error carries no response, so it keeps the last one seen.
        let mut last_status = None;
        let mut last_payload = None;

        loop {
            attempt += 1;
            debug!(%endpoint, attempt, max_attempts, "sending bridge request");

            let failure = match self.transport.get(&url).await {
                Err(e) => Failure {
                    kind: if e.is_timeout() {
                        FailureKind::Timeout
                    } else {
                        FailureKind::Transport
                    },
                    reason: e.to_string(),
                },
                Ok(resp) => match classify(endpoint, resp.status, &resp.body) {
                    Classification::Accepted(value) => {
                        debug!(%endpoint, attempt, "bridge accepted request");
                        return RetryOutcome::accepted(attempt, resp.status, value);
                    }
                    Classification::Fatal { reason } => {
                        warn!(%endpoint, attempt, %reason, "fatal bridge response, not retrying");
                        return RetryOutcome::failed(
                            attempt,
                            Some(resp.status),
                            Payload::from_body(&resp.body),
                            Failure {
                                kind: FailureKind::Fatal,
                                reason,
                            },
                        );
                    }
                    Classification::Retryable { reason } => {
                        last_status = Some(resp.status);
                        last_payload = Payload::from_body(&resp.body);
                        Failure {
                            kind: FailureKind::Retryable,
                            reason,
                        }
                    }
                },
            };

            if attempt >= max_attempts {
                warn!(%endpoint, attempts = attempt, reason = %failure.reason, "retry budget exhausted");
                return RetryOutcome::failed(attempt, last_status, last_payload, failure);
            }

            warn!(
                %endpoint,
                attempt,
                reason = %failure.reason,
                "attempt failed, retrying in {:?}",
                policy.delay
            );
            tokio::time::sleep(policy.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn payload_decodes_json_or_keeps_raw() {
        assert_eq!(
            Payload::from_body(r#"{"success":false}"#),
            Some(Payload::Json(json!({ "success": false })))
        );
        assert_eq!(
            Payload::from_body("Service Unavailable"),
            Some(Payload::Raw("Service Unavailable".into()))
        );
        assert_eq!(Payload::from_body("  "), None);
    }

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts.get(), 3);
        assert_eq!(policy.delay, Duration::from_secs(1));
        assert_eq!(RetryPolicy::single_attempt().max_attempts.get(), 1);
    }

    #[test]
    fn outcome_serializes_without_absent_fields() {
        let outcome = RetryOutcome::failed(
            2,
            None,
            None,
            Failure {
                kind: FailureKind::Transport,
                reason: "connection refused".into(),
            },
        );
        assert_eq!(
            serde_json::to_value(&outcome).unwrap_or_default(),
            json!({
                "succeeded": false,
                "attempts": 2,
                "last_failure": { "kind": "transport", "reason": "connection refused" }
            })
        );
    }
}
