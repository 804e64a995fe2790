//! Bulk handlers: open-all, close-all, toggle-all.

use tabled::Tabled;

use nukictl_core::{BulkEntry, BulkReport, Intent};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct BulkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Attempts")]
    attempts: u32,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl BulkRow {
    fn new(e: &BulkEntry, color: bool) -> Self {
        Self {
            id: e.device.id.to_string(),
            name: e.device.name.clone().unwrap_or_default(),
            action: e.action.map_or_else(|| "-".into(), |a| a.to_string()),
            result: output::paint_result(e.outcome.succeeded, color),
            attempts: e.outcome.attempts,
            detail: e.outcome.failure_reason().unwrap_or_default().to_owned(),
        }
    }
}

pub fn report(
    intent: Intent,
    report: &BulkReport,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let out = output::render_list(
        &global.output,
        report.entries(),
        |e| BulkRow::new(e, color),
        |e| {
            format!(
                "{}\t{}",
                e.device.id,
                output::paint_result(e.outcome.succeeded, false)
            )
        },
    )?;
    output::print_output(&out, global.quiet);

    if report.all_succeeded() {
        Ok(())
    } else {
        Err(CliError::BulkIncomplete {
            action: intent.to_string(),
            failed: report.failed_count(),
            total: report.len(),
        })
    }
}
