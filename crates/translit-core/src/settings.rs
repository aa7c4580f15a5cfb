//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Upper bound on `pipeline.cancel_check_interval`.
pub const MAX_CANCEL_CHECK_INTERVAL: usize = 100;

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub pipeline: PipelineSettings,
    pub zh: ZhSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub cancel_check_interval: usize,
    pub default_max_input_length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZhSettings {
    pub default_scheme: String,
    #[serde(default)]
    pub tokenizer_max_input_length: usize,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    let interval = s.pipeline.cancel_check_interval;
    if interval == 0 || interval > MAX_CANCEL_CHECK_INTERVAL {
        return Err(SettingsError::InvalidValue {
            field: "pipeline.cancel_check_interval".to_string(),
            reason: format!("must be between 1 and {MAX_CANCEL_CHECK_INTERVAL}"),
        });
    }
    if s.pipeline.default_max_input_length == 0 {
        return Err(SettingsError::InvalidValue {
            field: "pipeline.default_max_input_length".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if s.zh.default_scheme.trim().is_empty() {
        return Err(SettingsError::InvalidValue {
            field: "zh.default_scheme".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}
