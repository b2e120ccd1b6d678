//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use form_config::{ClearOnSubmit, DataType, FormConfig, ValidationMethod};

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
tainted_message = "Leave anyway?"

[validation]
method = "onblur"

[submit]
clear_on_submit = "message"
reset_form = true

[data]
data_type = "json"

[warnings]
duplicate_id = false
"#,
        )?;

        let config: FormConfig = Figment::from(Serialized::defaults(FormConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.validation.method, ValidationMethod::OnBlur);
        assert_eq!(config.submit.clear_on_submit, ClearOnSubmit::Message);
        assert!(config.submit.reset_form);
        assert_eq!(config.data.data_type, DataType::Json);
        assert!(!config.warnings.duplicate_id);
        assert!(config.warnings.no_validation_and_constraints);
        assert_eq!(config.tainted_message.as_deref(), Some("Leave anyway?"));
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[validation]
method = "submit-only"
"#,
        )?;

        let config: FormConfig = Figment::from(Serialized::defaults(FormConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.validation.method, ValidationMethod::SubmitOnly);
        assert_eq!(config.submit, FormConfig::default().submit);
        assert_eq!(config.data.data_type, DataType::Form);
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".formtree")?;
        jail.create_file(
            ".formtree/config.toml",
            r#"
[submit]
clear_on_submit = "none"
"#,
        )?;

        let config = FormConfig::load().expect("config loads");
        assert_eq!(config.submit.clear_on_submit, ClearOnSubmit::None);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[validation]
method = "onblur"
"#,
        )?;
        jail.set_env("FORMTREE_VALIDATION__METHOD", "oninput");

        let config: FormConfig = Figment::from(Serialized::defaults(FormConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("FORMTREE_").split("__"))
            .extract()?;

        assert_eq!(config.validation.method, ValidationMethod::OnInput);
        Ok(())
    });
}

#[test]
fn unknown_enum_value_fails_extraction() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[validation]
method = "eventually"
"#,
        )?;

        let result: Result<FormConfig, _> = Figment::from(Serialized::defaults(FormConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract();
        assert!(result.is_err());
        Ok(())
    });
}
