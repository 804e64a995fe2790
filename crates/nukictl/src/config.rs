//! CLI configuration: thin wrapper around `nukictl_config`.
//!
//! Turns `GlobalOpts` into the highest-precedence override layer and picks
//! the config file (`--config` or the platform default).

use std::path::PathBuf;

use nukictl_config::{Config, Overrides};
use nukictl_core::DeviceId;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use nukictl_config::{config_path, init_config};

/// Config file in effect for this invocation.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Flags that were actually given, as an override layer.
pub fn overrides(global: &GlobalOpts) -> Overrides {
    Overrides {
        ip: global.ip.clone(),
        port: global.port,
        token: global.token.clone(),
        device_id: global
            .id
            .as_deref()
            .and_then(|raw| raw.parse::<DeviceId>().ok()),
        device_name: global.name.clone(),
        retries: global.retries,
    }
}

/// Load file + `NUKI_*` env + flags into one resolved config.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_file(global);
    Ok(nukictl_config::load_config(&path, &overrides(global))?)
}
