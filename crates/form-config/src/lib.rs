//! # form-config
//!
//! Layered configuration loading for formtree sessions using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`FORMTREE_*` prefix, `__` as separator)
//! 2. Project-level `.formtree/config.toml`
//! 3. User-level `~/.config/formtree/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `FORMTREE_VALIDATION__METHOD` -> `validation.method`,
//! `FORMTREE_SUBMIT__RESET_FORM` -> `submit.reset_form`, and so on.
//!
//! # Usage
//!
//! ```no_run
//! use form_config::{FormConfig, ValidationMethod};
//!
//! let config = FormConfig::load_with_dotenv().expect("config");
//! if config.validation.method == ValidationMethod::OnBlur {
//!     println!("validating on blur");
//! }
//! ```

mod data;
mod error;
mod submit;
mod validation;
mod warnings;

pub use data::{DataConfig, DataType};
pub use error::ConfigError;
pub use submit::{ClearOnSubmit, SubmitConfig};
pub use validation::{ValidationConfig, ValidationMethod};
pub use warnings::WarningsConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormConfig {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub submit: SubmitConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub warnings: WarningsConfig,
    /// Prompt shown before leaving a form with touched fields, e.g.
    /// "Do you want to leave this page? Changes you made may not be saved."
    /// `None` disables the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tainted_message: Option<String>,
}

impl FormConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`FormConfig::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source fails to parse or
    /// extract, and `ConfigError::InvalidValue` when [`FormConfig::validate`] rejects it.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`FormConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so callers can layer extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".formtree/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("FORMTREE_").split("__"))
    }

    /// Check values serde cannot reject on its own.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a blank `tainted_message`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .tainted_message
            .as_deref()
            .is_some_and(|message| message.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "tainted_message".into(),
                reason: "must not be blank; omit it to disable the prompt".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("formtree").join("config.toml"))
    }

    /// Walks up from `CARGO_MANIFEST_DIR` (crate -> crates/ -> workspace)
    /// looking for `.env`, then falls back to the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
