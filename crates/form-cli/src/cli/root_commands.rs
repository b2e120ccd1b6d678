use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List the leaf paths that differ between two JSON documents.
    Diff(DiffArgs),
    /// Print the error-tree shape of a JSON Schema.
    Shape(ShapeArgs),
    /// Validate JSON form data against a JSON Schema.
    Validate(ValidateArgs),
    /// Parse a path string such as `a.b[2].c` into segments.
    Path(PathArgs),
}

#[derive(Clone, Debug, Args)]
pub struct DiffArgs {
    /// The newer document.
    pub new: PathBuf,
    /// The document to compare against.
    pub old: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct ShapeArgs {
    /// JSON Schema file.
    pub schema: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    /// JSON Schema file.
    pub schema: PathBuf,
    /// JSON data file. Schema defaults are validated when omitted.
    pub data: Option<PathBuf>,
    /// Form id (defaults to the schema file name).
    #[arg(long)]
    pub id: Option<String>,
    /// Treat the data as a submission.
    #[arg(long)]
    pub posted: bool,
    /// Report errors even when no data is given.
    #[arg(long)]
    pub errors: bool,
    /// How the data is transported; overrides `data.data_type` from config.
    #[arg(long, value_enum)]
    pub data_type: Option<DataTypeArg>,
}

/// CLI spelling of the form transport.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum DataTypeArg {
    Form,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct PathArgs {
    /// Path string, e.g. `address.lines[0]`. The empty string is the root.
    pub path: String,
}
