use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DiffArgs;
use crate::commands::shared::read::read_value;
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct DiffResponse {
    pub changed: Vec<String>,
}

/// Compute the changed leaf paths between the two documents.
pub fn run(args: &DiffArgs) -> anyhow::Result<DiffResponse> {
    let new = read_value(&args.new)?;
    let old = read_value(&args.old)?;
    let changed = form_core::diff(&new, &old)
        .iter()
        .map(ToString::to_string)
        .collect();
    Ok(DiffResponse { changed })
}

/// Handle `formtree diff`.
pub fn handle(args: &DiffArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = run(args)?;
    tracing::debug!(changed = response.changed.len(), "diff complete");
    output(&response, flags.format)
}
