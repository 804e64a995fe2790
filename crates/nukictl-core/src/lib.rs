//! Retry-driven lock actions on top of `nukictl-api`.
//!
//! The crate turns a high-level [`Intent`] plus an immutable
//! [`BridgeContext`] into bridge calls and hands back structured results.
//! It never prints, exits, or reads configuration files.
//!
//! - **[`Dispatcher`]** — maps `open`/`close`/`status`/`toggle`/`list`/`info`
//!   and the `*-all` bulk intents onto endpoint calls. Bulk intents run one
//!   device at a time, in bridge list order, and isolate failures per device.
//!
//! - **[`RetryExecutor`]** — one [`ActionRequest`] through a bounded retry
//!   loop with a fixed inter-attempt delay, producing a [`RetryOutcome`].
//!
//! - **[`classify`]** — per-endpoint judgement of a response: accepted,
//!   retryable, or fatal.
//!
//! - **[`DeviceDirectory`]** — fresh `list` fetch and exact, first-match
//!   name resolution. Nothing is cached between calls.

pub mod classify;
pub mod config;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod request;
pub mod retry;

// ── Primary re-exports ──────────────────────────────────────────────
pub use classify::{Classification, classify};
pub use config::{BridgeContext, DeviceSelector};
pub use directory::DeviceDirectory;
pub use dispatch::{ActionResult, BulkEntry, BulkReport, Dispatcher, Intent, ToggleResult};
pub use error::CoreError;
pub use model::LockState;
pub use request::ActionRequest;
pub use retry::{Failure, FailureKind, Payload, RetryExecutor, RetryOutcome, RetryPolicy};

// Wire types surface unchanged.
pub use nukictl_api::{
    BridgeEndpoints, DEFAULT_PORT, Device, DeviceId, Endpoint, HttpTransport, LastKnownState,
    LockAction, RawResponse, Transport, TransportConfig,
};
