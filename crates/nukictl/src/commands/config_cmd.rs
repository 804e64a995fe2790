//! Config subcommand handlers.

use nukictl_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` safe to print: the token is replaced by a mask.
fn redacted(cfg: &Config) -> Config {
    Config {
        token: cfg.token.as_ref().map(|_| MASK.to_owned()),
        ..cfg.clone()
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_file(global);

    match args.command {
        // ── Init: template bootstrap ────────────────────────────────
        ConfigCommand::Init { force } => {
            config::init_config(&path, force)?;
            if !global.quiet {
                eprintln!("Wrote config template to {}", path.display());
                eprintln!("Edit it with your bridge IP, API token and device id.");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::resolve(global)?);
            let toml = toml::to_string_pretty(&cfg)?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |_| toml.trim_end().to_owned(),
                |_| toml.trim_end().to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
