use std::sync::Arc;

use anyhow::Context;
use form_config::{DataType, FormConfig};
use form_core::{ErrorTree, FlatError, Value};
use form_schema::ValidateFormOptions;
use form_session::SessionRegistry;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{DataTypeArg, ValidateArgs};
use crate::commands::shared::read::{read_schema, read_value};
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub id: String,
    pub valid: bool,
    pub posted: bool,
    pub data: Value,
    pub errors: ErrorTree,
    pub flat_errors: Vec<FlatError>,
}

/// Open a form session for the data and report its initial state.
pub async fn run(args: &ValidateArgs, mut config: FormConfig) -> anyhow::Result<ValidateResponse> {
    if let Some(data_type) = args.data_type {
        config.data.data_type = match data_type {
            DataTypeArg::Form => DataType::Form,
            DataTypeArg::Json => DataType::Json,
        };
    }

    let schema = Arc::new(read_schema(&args.schema)?);
    let data = args.data.as_deref().map(read_value).transpose()?;
    let options = ValidateFormOptions {
        id: args.id.clone(),
        errors: args.errors.then_some(true),
        posted: args.posted,
    };

    let mut registry = SessionRegistry::new(config);
    let session = registry
        .open_session(schema, data.as_ref(), &options)
        .await
        .context("failed to validate form")?;

    let snapshot = session.capture();
    Ok(ValidateResponse {
        id: snapshot.id,
        valid: snapshot.valid,
        posted: snapshot.posted,
        data: snapshot.data,
        flat_errors: snapshot.errors.flatten(),
        errors: snapshot.errors,
    })
}

/// Handle `formtree validate`.
pub async fn handle(args: &ValidateArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = FormConfig::load_with_dotenv().context("failed to load formtree config")?;
    let response = run(args, config).await?;
    tracing::debug!(
        form = %response.id,
        valid = response.valid,
        errors = response.flat_errors.len(),
        "validated form"
    );
    output(&response, flags.format)
}
