//! Configuration management for the lead scoring engine
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default.*`, `config/{env}.*`)
//! - Environment variables (FLUENCY_LEADS_ prefix, `__` separator)
//! - Standalone YAML files for the scoring rules and the offer catalog
//!
//! Every table keyed by an enum (prices, module names, tier messages) is
//! validated on load so that a gap surfaces at startup instead of at the
//! first offer built for that key.

pub mod catalog;
pub mod constants;
pub mod scoring;
pub mod settings;

pub use catalog::{CatalogEntry, OfferCatalog};
pub use scoring::{
    AnalysisConfig, ConversionThresholds, EligibilityConfig, OfferRankingConfig, ReadinessPoints,
    ScoringConfig, StatusThresholds, SubScoreWeights, UrgencyPoints, ValuePoints,
};
pub use settings::{load_settings, ObservabilityConfig, RuntimeEnvironment, Settings};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Read a YAML file into any deserializable config type
pub(crate) fn read_yaml<T, P>(path: P) -> Result<T, ConfigError>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<std::path::Path>,
{
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    Ok(serde_yaml::from_str(&content)?)
}
