use form_core::{Path, Segment};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PathArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct PathResponse {
    pub path: String,
    pub segments: Vec<Segment>,
}

/// Parse the path string and echo its canonical form.
pub fn run(args: &PathArgs) -> anyhow::Result<PathResponse> {
    let path = Path::parse(&args.path)?;
    Ok(PathResponse {
        path: path.to_string(),
        segments: path.into_segments(),
    })
}

/// Handle `formtree path`.
pub fn handle(args: &PathArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&run(args)?, flags.format)
}
