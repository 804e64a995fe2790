// ── Core error types ──
//
// Errors that end a dispatch outright. Exhausted retries on a lock call
// are *not* errors: they come back as a failed `RetryOutcome` so the
// caller can present the last status and payload. Only configuration
// problems, name-resolution misses, and failures of the non-retried
// `list`/`info` reads land here.

use thiserror::Error;

use nukictl_api::Endpoint;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ── Resolution errors ────────────────────────────────────────────
    #[error("Device not found: no device named '{name}'")]
    DeviceNotFound { name: String },

    // ── Bridge errors ────────────────────────────────────────────────
    #[error("Cannot reach bridge for /{endpoint}: {reason}")]
    BridgeUnreachable { endpoint: Endpoint, reason: String },

    #[error("Bridge request to /{endpoint} timed out")]
    Timeout { endpoint: Endpoint },

    #[error("Bridge rejected /{endpoint}: {reason}")]
    RequestFailed {
        endpoint: Endpoint,
        /// HTTP status code (if a response arrived).
        status: Option<u16>,
        reason: String,
    },

    #[error("Malformed response from /{endpoint}: {message}")]
    MalformedResponse { endpoint: Endpoint, message: String },

    /// Transport failure outside of a retried request.
    #[error("Bridge transport error: {0}")]
    Transport(String),
}

impl CoreError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nukictl_api::Error> for CoreError {
    fn from(err: nukictl_api::Error) -> Self {
        match err {
            nukictl_api::Error::InvalidUrl(e) => CoreError::Configuration {
                message: format!("invalid bridge address: {e}"),
            },
            nukictl_api::Error::ClientBuild(reason) => CoreError::Configuration {
                message: format!("cannot build HTTP client: {reason}"),
            },
            e @ (nukictl_api::Error::Timeout { .. } | nukictl_api::Error::Transport(_)) => {
                CoreError::Transport(e.to_string())
            }
        }
    }
}
