//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use nukictl_config::ConfigError;
use nukictl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const ACTION_FAILED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the bridge ({endpoint})")]
    #[diagnostic(
        code(nukictl::connection_failed),
        help(
            "Check that the bridge is powered, on the same network, and has the HTTP API enabled.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { endpoint: String, reason: String },

    #[error("Bridge request to {endpoint} timed out")]
    #[diagnostic(
        code(nukictl::timeout),
        help("The bridge did not answer within 10s. It may be busy talking to a lock; try again.")
    )]
    Timeout { endpoint: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Bridge rejected the API token")]
    #[diagnostic(
        code(nukictl::auth_failed),
        help(
            "Verify the token shown in the Nuki app under Bridge > Manage bridge > HTTP API.\n\
             Pass it with --token, NUKI_TOKEN, or `token` in the config file."
        )
    )]
    AuthFailed,

    // ── Resources ────────────────────────────────────────────────────
    #[error("No device named '{name}'")]
    #[diagnostic(
        code(nukictl::not_found),
        help("Names match exactly. Run: nukictl list to see paired devices")
    )]
    NotFound { name: String },

    // ── Bridge responses ─────────────────────────────────────────────
    #[error("Bridge request to {endpoint} failed: {reason}")]
    #[diagnostic(code(nukictl::bridge_error))]
    BridgeError { endpoint: String, reason: String },

    #[error("Malformed response from {endpoint}: {message}")]
    #[diagnostic(
        code(nukictl::malformed_response),
        help("The bridge firmware may be too old or the address may point at another service.")
    )]
    MalformedResponse { endpoint: String, message: String },

    #[error("{action} was not confirmed after {attempts} attempt(s): {reason}")]
    #[diagnostic(
        code(nukictl::action_failed),
        help("Increase --retries, or check the lock's battery and Bluetooth range to the bridge.")
    )]
    ActionFailed {
        action: String,
        attempts: u32,
        reason: String,
    },

    #[error("{failed} of {total} device(s) did not complete {action}")]
    #[diagnostic(
        code(nukictl::bulk_incomplete),
        help("See the report above for per-device results.")
    )]
    BulkIncomplete {
        action: String,
        failed: usize,
        total: usize,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Missing {field}")]
    #[diagnostic(
        code(nukictl::missing_config),
        help(
            "{hint}.\n\
             Create a config file with: nukictl config init"
        )
    )]
    MissingConfig { field: String, hint: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nukictl::validation))]
    Validation { field: String, reason: String },

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(nukictl::config_exists),
        help("Use --force to overwrite it with a fresh template.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(nukictl::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ActionFailed { .. } | Self::BulkIncomplete { .. } => exit_code::ACTION_FAILED,
            Self::MissingConfig { .. }
            | Self::Validation { .. }
            | Self::ConfigExists { .. }
            | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Configuration { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },

            CoreError::DeviceNotFound { name } => CliError::NotFound { name },

            CoreError::BridgeUnreachable { endpoint, reason } => CliError::ConnectionFailed {
                endpoint: format!("/{endpoint}"),
                reason,
            },

            CoreError::Transport(reason) => CliError::ConnectionFailed {
                endpoint: "bridge".into(),
                reason,
            },

            CoreError::Timeout { endpoint } => CliError::Timeout {
                endpoint: format!("/{endpoint}"),
            },

            CoreError::RequestFailed {
                status: Some(401 | 403),
                ..
            } => CliError::AuthFailed,

            CoreError::RequestFailed {
                endpoint, reason, ..
            } => CliError::BridgeError {
                endpoint: format!("/{endpoint}"),
                reason,
            },

            CoreError::MalformedResponse { endpoint, message } => CliError::MalformedResponse {
                endpoint: format!("/{endpoint}"),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Missing { field, hint } => CliError::MissingConfig { field, hint },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Exists { path } => CliError::ConfigExists {
                path: path.display().to_string(),
            },
            ConfigError::Serialization(e) => CliError::Toml(e),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Core(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nukictl_core::Endpoint;

    #[test]
    fn bridge_failures_map_to_distinct_exit_codes() {
        let cases = [
            (
                CoreError::BridgeUnreachable {
                    endpoint: Endpoint::List,
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::Timeout {
                    endpoint: Endpoint::Info,
                },
                exit_code::TIMEOUT,
            ),
            (
                CoreError::DeviceNotFound {
                    name: "Cellar".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::RequestFailed {
                    endpoint: Endpoint::List,
                    status: Some(401),
                    reason: "http status 401".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::RequestFailed {
                    endpoint: Endpoint::List,
                    status: Some(503),
                    reason: "http status 503".into(),
                },
                exit_code::GENERAL,
            ),
            (
                CoreError::Configuration {
                    message: "bridge IP address is required".into(),
                },
                exit_code::USAGE,
            ),
        ];

        for (core, code) in cases {
            let cli = CliError::from(core);
            assert_eq!(cli.exit_code(), code, "{cli:?}");
        }
    }

    #[test]
    fn config_errors_are_usage_errors() {
        let err = CliError::from(ConfigError::Missing {
            field: "token".into(),
            hint: "pass --token".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(err.to_string(), "Missing token");
    }

    #[test]
    fn failed_actions_exit_with_nine() {
        let err = CliError::BulkIncomplete {
            action: "open-all".into(),
            failed: 1,
            total: 3,
        };
        assert_eq!(err.exit_code(), exit_code::ACTION_FAILED);
        assert_eq!(err.to_string(), "1 of 3 device(s) did not complete open-all");
    }
}
