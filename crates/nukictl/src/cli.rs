//! Clap derive structures for the `nukictl` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use nukictl_core::Intent;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nukictl -- control Nuki smart locks through a bridge's local HTTP API
#[derive(Debug, Parser)]
#[command(
    name = "nukictl",
    version,
    about = "Open, close and inspect Nuki smart locks via the bridge HTTP API",
    long_about = "Talks to a Nuki bridge on the local network.\n\n\
        Lock actions are retried until the bridge confirms them or the\n\
        retry budget is spent. Bulk commands act on every paired device.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Bridge IP address (overrides config and NUKI_IP)
    #[arg(long, short = 'i', global = true)]
    pub ip: Option<String>,

    /// Bridge HTTP port [default: 8080]
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Bridge API token (overrides config and NUKI_TOKEN)
    #[arg(long, short = 't', global = true)]
    pub token: Option<String>,

    /// Target device by bridge id
    #[arg(long, short = 'd', global = true, conflicts_with = "name")]
    pub id: Option<String>,

    /// Target device by name (exact match, resolved via the bridge list)
    #[arg(long, short = 'n', global = true)]
    pub name: Option<String>,

    /// Attempts per lock request [default: 3]
    #[arg(
        long,
        short = 'r',
        global = true,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub retries: Option<u32>,

    /// Config file path
    #[arg(long, env = "NUKI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NUKI_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Unlock the selected device
    #[command(alias = "unlock")]
    Open,

    /// Lock the selected device
    #[command(alias = "lock")]
    Close,

    /// Show the live lock state of the selected device
    Status,

    /// Read the selected device's state, then lock or unlock it
    Toggle,

    /// List devices paired with the bridge
    #[command(alias = "ls")]
    List,

    /// Show bridge information
    Info,

    /// Unlock every paired device
    OpenAll,

    /// Lock every paired device
    CloseAll,

    /// Flip every paired device
    ToggleAll,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Command {
    /// The bridge intent behind this command, if it talks to the bridge.
    pub fn intent(&self) -> Option<Intent> {
        Some(match self {
            Self::Open => Intent::Open,
            Self::Close => Intent::Close,
            Self::Status => Intent::Status,
            Self::Toggle => Intent::Toggle,
            Self::List => Intent::List,
            Self::Info => Intent::Info,
            Self::OpenAll => Intent::OpenAll,
            Self::CloseAll => Intent::CloseAll,
            Self::ToggleAll => Intent::ToggleAll,
            Self::Config(_) | Self::Completions(_) => return None,
        })
    }
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a template config file to edit
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the resolved configuration (token masked)
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn id_and_name_conflict() {
        let err = Cli::try_parse_from(["nukictl", "--id", "1", "--name", "Door", "open"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn zero_retries_rejected_at_parse() {
        assert!(Cli::try_parse_from(["nukictl", "-r", "0", "open"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["nukictl", "status", "-d", "42", "-o", "json"]).unwrap();
        assert_eq!(cli.global.id.as_deref(), Some("42"));
        assert!(matches!(cli.global.output, OutputFormat::Json));
        assert_eq!(cli.command.intent(), Some(Intent::Status));
    }

    #[test]
    fn bulk_commands_map_to_bulk_intents() {
        let cli = Cli::try_parse_from(["nukictl", "toggle-all"]).unwrap();
        assert_eq!(cli.command.intent(), Some(Intent::ToggleAll));

        let cli = Cli::try_parse_from(["nukictl", "config", "path"]).unwrap();
        assert_eq!(cli.command.intent(), None);
    }
}
