//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config::schema::{NanoserviceConfig, SidecarConfig};
use crate::config::validation::{validate_nanoservice, validate_sidecar, ValidationError};

/// Environment prefix for sidecar overrides.
pub const SIDECAR_ENV_PREFIX: &str = "SIDECAR";

/// Environment prefix for nanoservice overrides.
pub const NANO_ENV_PREFIX: &str = "NANO";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Name of the environment variable shadowing `option`: `<PREFIX>_<OPTION>` uppercased.
pub fn env_key(prefix: &str, option: &str) -> String {
    format!("{}_{}", prefix, option).to_uppercase()
}

/// Replace `target` with the override for `option`, if one is set.
fn shadow<F>(target: &mut String, prefix: &str, option: &str, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    let key = env_key(prefix, option);
    if let Some(value) = lookup(&key) {
        tracing::debug!(key = %key, "Option overridden from environment");
        *target = value;
    }
}

impl SidecarConfig {
    /// Apply `SIDECAR_*` style overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, prefix: &str, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        shadow(&mut self.listener.bind_address, prefix, "bind_address", &lookup);
        shadow(
            &mut self.forwarding.downstream_base_url,
            prefix,
            "downstream_base_url",
            &lookup,
        );
    }
}

impl NanoserviceConfig {
    /// Apply `NANO_*` style overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, prefix: &str, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        shadow(&mut self.listener.bind_address, prefix, "bind_address", &lookup);
        if let Some(id) = lookup(&env_key(prefix, "id")) {
            self.app.id = Some(id);
        }
        shadow(&mut self.app.message, prefix, "message", &lookup);
        shadow(&mut self.app.file, prefix, "file", &lookup);
        shadow(&mut self.app.next_service_url, prefix, "next_service_url", &lookup);
    }
}

/// Parse a TOML file, or fall back to defaults when no path is given.
fn read_toml<T>(path: Option<&Path>) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        }
        None => Ok(T::default()),
    }
}

/// Load, override from the process environment, and validate the sidecar configuration.
pub fn load_sidecar_config(path: Option<&Path>) -> Result<SidecarConfig, ConfigError> {
    let mut config: SidecarConfig = read_toml(path)?;
    config.apply_overrides(SIDECAR_ENV_PREFIX, |key| std::env::var(key).ok());

    validate_sidecar(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load, override from the process environment, and validate the nanoservice configuration.
pub fn load_nanoservice_config(path: Option<&Path>) -> Result<NanoserviceConfig, ConfigError> {
    let mut config: NanoserviceConfig = read_toml(path)?;
    config.apply_overrides(NANO_ENV_PREFIX, |key| std::env::var(key).ok());

    validate_nanoservice(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
