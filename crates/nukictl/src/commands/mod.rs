//! Command dispatch: bridges CLI commands -> core intents -> output formatting.

pub mod bulk;
pub mod config_cmd;
pub mod devices;
pub mod locks;

use nukictl_core::{ActionResult, BridgeContext, Dispatcher, HttpTransport, Intent};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Run a bridge-bound intent and render its result.
///
/// Results are always printed first; a failed lock action or an
/// incomplete bulk run is then returned as an error for the exit code.
pub async fn dispatch(
    intent: Intent,
    dispatcher: &Dispatcher<HttpTransport>,
    ctx: &BridgeContext,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = dispatcher.dispatch(intent, ctx).await?;
    let color = output::should_color(&global.color);

    match result {
        ActionResult::Outcome(outcome) => locks::report_outcome(intent, &outcome, global, color),
        ActionResult::Toggled(toggled) => locks::report_toggle(&toggled, global, color),
        ActionResult::Devices(devices) => devices::list(&devices, global, color),
        ActionResult::Info(info) => devices::info(&info, global),
        ActionResult::Bulk(report) => bulk::report(intent, &report, global, color),
    }
}
