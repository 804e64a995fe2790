use thiserror::Error;

/// Top-level error type for the `nukictl-api` crate.
///
/// Only covers failures below the HTTP status line: a response with any
/// status code is a successful round trip at this layer. `nukictl-core`
/// decides what a non-200 status or an odd payload means.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The `reqwest::Client` could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Timeout { .. } => true,
            Self::InvalidUrl(_) | Self::ClientBuild(_) => false,
        }
    }

    /// Returns `true` if the bridge never answered in time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_transient() {
        let err = Error::Timeout { timeout_secs: 10 };
        assert!(err.is_transient());
        assert!(err.is_timeout());
    }

    #[test]
    fn bad_url_is_not_transient() {
        let err = Error::from(url::Url::parse("not a url").unwrap_err());
        assert!(!err.is_transient());
        assert!(!err.is_timeout());
    }
}
