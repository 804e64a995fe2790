//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use nukictl_core::LockState;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Lock state label, green when locked and yellow when unlocked.
pub fn paint_state(state: Option<LockState>, color: bool) -> String {
    let Some(state) = state else {
        return "-".into();
    };
    let label = state.to_string();
    if !color {
        return label;
    }
    match state {
        LockState::Locked => label.green().to_string(),
        LockState::Unlocked => label.yellow().to_string(),
        LockState::Other(_) => label.dimmed().to_string(),
    }
}

/// `ok` / `failed`, colored when enabled.
pub fn paint_result(succeeded: bool, color: bool) -> String {
    match (succeeded, color) {
        (true, true) => "ok".green().to_string(),
        (true, false) => "ok".into(),
        (false, true) => "failed".red().bold().to_string(),
        (false, false) => "failed".into(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed or compact JSON.
pub(crate) fn render_json<T: serde::Serialize + ?Sized>(
    data: &T,
    compact: bool,
) -> Result<String, CliError> {
    Ok(if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    })
}

/// YAML output.
fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        id: u32,
        name: &'static str,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: u32,
        #[tabled(rename = "Name")]
        name: &'static str,
    }

    fn items() -> Vec<Item> {
        vec![Item { id: 1, name: "Front Door" }, Item { id: 2, name: "Garage" }]
    }

    fn row(i: &Item) -> ItemRow {
        ItemRow {
            id: i.id,
            name: i.name,
        }
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let out = render_list(&OutputFormat::Plain, &items(), row, |i| i.id.to_string()).unwrap();
        assert_eq!(out, "1\n2");
    }

    #[test]
    fn table_has_headers_and_rows() {
        let out = render_list(&OutputFormat::Table, &items(), row, |i| i.id.to_string()).unwrap();
        assert!(out.contains("Name"), "{out}");
        assert!(out.contains("Front Door"), "{out}");
        assert!(out.contains("Garage"), "{out}");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out =
            render_list(&OutputFormat::JsonCompact, &items(), row, |i| i.id.to_string()).unwrap();
        assert_eq!(out, r#"[{"id":1,"name":"Front Door"},{"id":2,"name":"Garage"}]"#);
    }

    #[test]
    fn uncolored_state_labels() {
        assert_eq!(paint_state(Some(LockState::Locked), false), "locked");
        assert_eq!(paint_state(None, false), "-");
        assert_eq!(paint_result(false, false), "failed");
    }
}
