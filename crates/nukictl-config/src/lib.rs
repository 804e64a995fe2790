//! Configuration for the nukictl CLI.
//!
//! A single TOML file plus `NUKI_*` environment variables plus command-line
//! overrides, merged with `figment`, validated, and translated into a
//! [`nukictl_core::BridgeContext`]. Also owns the first-run template the
//! CLI writes with `config init`.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use nukictl_core::{
    BridgeContext, CoreError, DEFAULT_PORT, DeviceId, DeviceSelector, RetryPolicy,
};

/// Environment variable prefix (`NUKI_IP`, `NUKI_TOKEN`, ...).
pub const ENV_PREFIX: &str = "NUKI_";

/// Attempts per request when nothing else is configured.
pub const DEFAULT_RETRIES: u32 = 3;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing {field}: {hint}")]
    Missing { field: String, hint: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file already exists at {}", path.display())]
    Exists { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Resolved configuration, as stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Bridge IP address or hostname.
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub ip: Option<String>,

    /// Bridge HTTP API port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bridge API token (plaintext in the file; prefer `NUKI_TOKEN`).
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<String>,

    /// Default target device by bridge id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<DeviceId>,

    /// Default target device by name. Ignored when `device_id` is also set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,

    /// Maximum attempts per lock request.
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ip: None,
            port: DEFAULT_PORT,
            token: None,
            device_id: None,
            device_name: None,
            retries: DEFAULT_RETRIES,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

/// Env values like `NUKI_TOKEN=123456` arrive as numbers; keep them as text.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
        Scalar::Text(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(f) => f.to_string(),
    }))
}

// ── Template ────────────────────────────────────────────────────────

const TEMPLATE_IP: &str = "0.0.0.0";
const TEMPLATE_TOKEN: &str = "1mytkn";
const TEMPLATE_DEVICE_ID: &str = "123456789";

impl Config {
    /// Placeholder values written by `config init`.
    pub fn template() -> Self {
        Self {
            ip: Some(TEMPLATE_IP.into()),
            token: Some(TEMPLATE_TOKEN.into()),
            device_id: Some(DeviceId::Text(TEMPLATE_DEVICE_ID.into())),
            ..Self::default()
        }
    }

    /// Whether the bridge settings are still the untouched placeholders.
    pub fn is_template(&self) -> bool {
        self.ip.as_deref() == Some(TEMPLATE_IP)
            && self.token.as_deref() == Some(TEMPLATE_TOKEN)
            && self
                .device_id
                .as_ref()
                .is_some_and(|id| id.matches(TEMPLATE_DEVICE_ID))
    }

    /// The device a single-device command targets by default.
    ///
    /// An id wins over a name when both are configured. Blank values
    /// select nothing.
    pub fn device_selector(&self) -> Option<DeviceSelector> {
        if let Some(id) = self.device_id.as_ref().filter(|id| !id.is_blank()) {
            return Some(DeviceSelector::Id(id.clone()));
        }
        self.device_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| DeviceSelector::Name(n.to_owned()))
    }

    /// Validate and build the immutable context every dispatch runs with.
    pub fn to_bridge_context(&self) -> Result<BridgeContext, ConfigError> {
        let ip = self
            .ip
            .as_deref()
            .filter(|ip| !ip.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "ip".into(),
                hint: "pass --ip, set NUKI_IP, or add `ip` to the config file".into(),
            })?;

        let token = self
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "token".into(),
                hint: "pass --token, set NUKI_TOKEN, or add `token` to the config file".into(),
            })?;

        if self.port == 0 {
            return Err(ConfigError::Validation {
                field: "port".into(),
                reason: "must be between 1 and 65535".into(),
            });
        }

        let Some(max_attempts) = NonZeroU32::new(self.retries) else {
            return Err(ConfigError::Validation {
                field: "retries".into(),
                reason: "must be at least 1".into(),
            });
        };

        let ctx = BridgeContext::new(
            ip,
            self.port,
            SecretString::from(token.to_owned()),
            RetryPolicy::new(max_attempts),
        )?;

        Ok(match self.device_selector() {
            Some(selector) => ctx.with_device(selector),
            None => ctx,
        })
    }
}

// ── Overrides ───────────────────────────────────────────────────────

/// Highest-precedence layer, typically built from command-line flags.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<DeviceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "nukictl", "nukictl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("nukictl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Layered provider: defaults, then the TOML file, then `{env_prefix}*`
/// variables, then `overrides`.
pub fn figment(path: &Path, env_prefix: &str, overrides: &Overrides) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(env_prefix))
        .merge(Serialized::defaults(overrides))
}

/// Load the config from `path` + `NUKI_*` environment + `overrides`.
///
/// A missing file is not an error; required values may come from the
/// environment or flags instead.
pub fn load_config(path: &Path, overrides: &Overrides) -> Result<Config, ConfigError> {
    load_config_with_env(path, ENV_PREFIX, overrides)
}

/// [`load_config`] with a custom environment prefix.
pub fn load_config_with_env(
    path: &Path,
    env_prefix: &str,
    overrides: &Overrides,
) -> Result<Config, ConfigError> {
    if path.is_file() {
        info!(path = %path.display(), "using config file");
    } else {
        debug!(path = %path.display(), "no config file, using environment and flags only");
    }

    let figment = figment(path, env_prefix, overrides);
    let mut config: Config = figment.extract()?;

    // The highest layer that names a device replaces whatever lower layers
    // configured, whichever way they gave it.
    let env = Figment::from(Env::prefixed(env_prefix));
    let layers = [
        (overrides.device_id.is_some(), overrides.device_name.is_some()),
        (env.contains("device_id"), env.contains("device_name")),
    ];
    if let Some(&(has_id, has_name)) = layers.iter().find(|(id, name)| *id || *name) {
        if !has_id {
            config.device_id = None;
        }
        if !has_name {
            config.device_name = None;
        }
    }

    if let Some(ip) = config.ip.as_deref().filter(|_| from_file(&figment, "ip")) {
        info!(%ip, "using bridge address from config file");
    }
    if let Some(id) = config.device_id.as_ref().filter(|_| from_file(&figment, "device_id")) {
        info!(device = %id, "using device id from config file");
    }
    if let Some(name) = config
        .device_name
        .as_deref()
        .filter(|_| from_file(&figment, "device_name"))
    {
        info!(device = %name, "using device name from config file");
    }

    if config.is_template() {
        warn!(
            path = %path.display(),
            "config still holds the template values; edit it with your bridge IP, token and device id"
        );
    }

    Ok(config)
}

/// Whether the value in effect for `key` was read from the TOML file.
fn from_file(figment: &Figment, key: &str) -> bool {
    figment
        .find_metadata(key)
        .and_then(|md| md.source.as_ref())
        .is_some_and(|source| source.file_path().is_some())
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Write the first-run template to `path`. Refuses to replace an existing
/// file unless `force` is set.
pub fn init_config(path: &Path, force: bool) -> Result<Config, ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::Exists {
            path: path.to_path_buf(),
        });
    }
    let template = Config::template();
    save_config(&template, path)?;
    info!(path = %path.display(), "wrote config template");
    Ok(template)
}
