// ── Action dispatcher ──
//
// Maps a user intent onto one or more bridge calls. Single-device intents
// resolve their target first (a name costs one `list`), then run exactly
// one request through the retry executor. Bulk intents list once and walk
// the devices sequentially, in bridge order, one full retry budget each.

use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, info, warn};

use nukictl_api::{Device, DeviceId, Endpoint, HttpTransport, LockAction, Transport, TransportConfig};

use crate::config::{BridgeContext, DeviceSelector};
use crate::directory::{DeviceDirectory, read_outcome};
use crate::error::CoreError;
use crate::model::LockState;
use crate::request::ActionRequest;
use crate::retry::{Failure, FailureKind, RetryExecutor, RetryOutcome, RetryPolicy};

/// What the caller wants done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Intent {
    /// Unlock one device.
    Open,
    /// Lock one device.
    Close,
    /// Read the live state of one device.
    Status,
    /// Read the live state of one device, then flip it.
    Toggle,
    /// List paired devices.
    List,
    /// Bridge-level information.
    Info,
    /// Unlock every paired device.
    OpenAll,
    /// Lock every paired device.
    CloseAll,
    /// Flip every paired device.
    ToggleAll,
}

impl Intent {
    /// Whether this intent targets a single device and needs a selector.
    pub fn needs_device(self) -> bool {
        matches!(self, Self::Open | Self::Close | Self::Status | Self::Toggle)
    }
}

/// Outcome of a fetch-then-act toggle.
///
/// `action` is `None` when the state read failed or the lock was in
/// neither settled position; `outcome` is then the failed read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<LockState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<LockAction>,
    pub outcome: RetryOutcome,
}

/// One device's line in a bulk report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkEntry {
    pub device: Device,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<LockAction>,
    pub outcome: RetryOutcome,
}

/// Per-device results of a bulk intent, in bridge list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BulkReport {
    entries: Vec<BulkEntry>,
}

impl BulkReport {
    pub fn entries(&self) -> &[BulkEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.outcome.succeeded).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_count() == 0
    }

    fn push(&mut self, entry: BulkEntry) {
        self.entries.push(entry);
    }
}

impl IntoIterator for BulkReport {
    type Item = BulkEntry;
    type IntoIter = std::vec::IntoIter<BulkEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Structured result of one dispatch, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionResult {
    /// `open`, `close`, `status`.
    Outcome(RetryOutcome),
    /// `toggle`.
    Toggled(ToggleResult),
    /// `list`.
    Devices(Vec<Device>),
    /// `info`, passed through undecoded beyond JSON.
    Info(Value),
    /// `open-all`, `close-all`, `toggle-all`.
    Bulk(BulkReport),
}

impl ActionResult {
    /// `false` if any lock call in this result did not succeed.
    pub fn is_success(&self) -> bool {
        match self {
            Self::Outcome(outcome) => outcome.succeeded,
            Self::Toggled(toggle) => toggle.outcome.succeeded,
            Self::Devices(_) | Self::Info(_) => true,
            Self::Bulk(report) => report.all_succeeded(),
        }
    }
}

/// Entry point for every intent.
#[derive(Debug, Clone)]
pub struct Dispatcher<T> {
    executor: RetryExecutor<T>,
}

impl Dispatcher<HttpTransport> {
    /// Build a dispatcher over a real HTTP transport.
    pub fn connect(config: &TransportConfig) -> Result<Self, CoreError> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            executor: RetryExecutor::new(transport),
        }
    }

    pub fn executor(&self) -> &RetryExecutor<T> {
        &self.executor
    }

    pub fn directory<'a>(&'a self, ctx: &'a BridgeContext) -> DeviceDirectory<'a, T> {
        DeviceDirectory::new(&self.executor, ctx)
    }

    /// Run `intent` against the bridge described by `ctx`.
    ///
    /// Exhausted retries come back as an unsuccessful result, not an
    /// error. Errors are reserved for configuration problems, unknown
    /// device names, and failed `list`/`info` reads.
    pub async fn dispatch(
        &self,
        intent: Intent,
        ctx: &BridgeContext,
    ) -> Result<ActionResult, CoreError> {
        debug!(%intent, "dispatching");
        match intent {
            Intent::Open => self.lock(ctx, LockAction::Unlock).await,
            Intent::Close => self.lock(ctx, LockAction::Lock).await,
            Intent::Status => {
                let id = self.resolve_target(ctx).await?;
                let outcome = self.run(ctx, &ActionRequest::lock_state(id)).await;
                Ok(ActionResult::Outcome(outcome))
            }
            Intent::Toggle => {
                let id = self.resolve_target(ctx).await?;
                Ok(ActionResult::Toggled(self.toggle(ctx, id).await))
            }
            Intent::List => Ok(ActionResult::Devices(self.directory(ctx).fetch_all().await?)),
            Intent::Info => {
                let outcome = self
                    .executor
                    .execute(
                        ctx.endpoints(),
                        &ActionRequest::info(),
                        &RetryPolicy::single_attempt(),
                    )
                    .await;
                Ok(ActionResult::Info(read_outcome(Endpoint::Info, outcome)?))
            }
            Intent::OpenAll => self.bulk(ctx, Some(LockAction::Unlock)).await,
            Intent::CloseAll => self.bulk(ctx, Some(LockAction::Lock)).await,
            Intent::ToggleAll => self.bulk(ctx, None).await,
        }
    }

    async fn lock(&self, ctx: &BridgeContext, action: LockAction) -> Result<ActionResult, CoreError> {
        let id = self.resolve_target(ctx).await?;
        info!(device = %id, %action, "sending lock action");
        let outcome = self.run(ctx, &ActionRequest::lock_action(id, action)).await;
        Ok(ActionResult::Outcome(outcome))
    }

    async fn run(&self, ctx: &BridgeContext, request: &ActionRequest) -> RetryOutcome {
        self.executor
            .execute(ctx.endpoints(), request, ctx.retry())
            .await
    }

    /// Resolve the context's selector to an id. Fails before any network
    /// call when no selector is present.
    async fn resolve_target(&self, ctx: &BridgeContext) -> Result<DeviceId, CoreError> {
        match ctx.device() {
            None => Err(CoreError::config(
                "a device id or name is required for this action",
            )),
            Some(DeviceSelector::Id(id)) if id.is_blank() => Err(CoreError::config(
                "the device id is empty; pass --id or set device_id",
            )),
            Some(DeviceSelector::Id(id)) => Ok(id.clone()),
            Some(DeviceSelector::Name(name)) => self.directory(ctx).resolve_by_name(name).await,
        }
    }

    /// Read the live state, then issue the opposite action. Not atomic:
    /// the lock can be moved by hand between the two calls.
    async fn toggle(&self, ctx: &BridgeContext, id: DeviceId) -> ToggleResult {
        let read = self.run(ctx, &ActionRequest::lock_state(id.clone())).await;
        if !read.succeeded {
            return ToggleResult {
                state: None,
                action: None,
                outcome: read,
            };
        }

        let state = read.json().and_then(LockState::from_payload);
        let Some(action) = state.and_then(LockState::toggle_action) else {
            let reason = match state {
                Some(state) => format!("lock is {state}, neither locked nor unlocked"),
                None => "lock state is not a numeric code".to_owned(),
            };
            warn!(device = %id, %reason, "cannot toggle");
            return ToggleResult {
                state,
                action: None,
                outcome: RetryOutcome::failed(
                    read.attempts,
                    read.last_http_status,
                    read.last_payload,
                    Failure {
                        kind: FailureKind::Fatal,
                        reason,
                    },
                ),
            };
        };

        info!(device = %id, ?state, %action, "toggling");
        let outcome = self.run(ctx, &ActionRequest::lock_action(id, action)).await;
        ToggleResult {
            state,
            action: Some(action),
            outcome,
        }
    }

    /// Fan out over the current device list, one device at a time.
    async fn bulk(
        &self,
        ctx: &BridgeContext,
        action: Option<LockAction>,
    ) -> Result<ActionResult, CoreError> {
        let devices = self.directory(ctx).fetch_all().await?;
        let mut report = BulkReport::default();

        for device in devices {
            let entry = match action {
                Some(action) => {
                    let request = ActionRequest::lock_action(device.id.clone(), action);
                    BulkEntry {
                        outcome: self.run(ctx, &request).await,
                        action: Some(action),
                        device,
                    }
                }
                None => {
                    let toggled = self.toggle(ctx, device.id.clone()).await;
                    BulkEntry {
                        device,
                        action: toggled.action,
                        outcome: toggled.outcome,
                    }
                }
            };

            if !entry.outcome.succeeded {
                warn!(
                    device = %entry.device.display_name(),
                    attempts = entry.outcome.attempts,
                    "device action failed, continuing with the rest"
                );
            }
            report.push(entry);
        }

        Ok(ActionResult::Bulk(report))
    }
}
