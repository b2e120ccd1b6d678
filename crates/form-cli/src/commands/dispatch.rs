use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Diff(args) => commands::diff::handle(&args, flags),
        Commands::Shape(args) => commands::shape::handle(&args, flags),
        Commands::Validate(args) => commands::validate::handle(&args, flags).await,
        Commands::Path(args) => commands::path::handle(&args, flags),
    }
}
