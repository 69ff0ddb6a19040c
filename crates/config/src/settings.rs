//! Main settings module
//!
//! Layered settings for the lead scorer: `config/default`, then
//! `config/{env}`, then `FLUENCY_LEADS__*` environment variables. The scoring
//! rules and the offer catalog live in their own YAML files referenced from
//! here; when no path is set the built-in defaults apply.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, OfferCatalog, ScoringConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Missing rule files fall back to defaults with a warning
    #[default]
    Development,
    Staging,
    /// Rule file paths must be set explicitly
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Path to scoring.yaml
    #[serde(default)]
    pub scoring_config_path: Option<String>,

    /// Path to catalog.yaml
    #[serde(default)]
    pub catalog_path: Option<String>,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.observability.validate()?;

        if self.environment.is_production() {
            if self.scoring_config_path.is_none() {
                return Err(ConfigError::MissingField("scoring_config_path".to_string()));
            }
            if self.catalog_path.is_none() {
                return Err(ConfigError::MissingField("catalog_path".to_string()));
            }
        }

        Ok(())
    }

    /// Scoring rules from `scoring_config_path`, or the defaults
    pub fn scoring_config(&self) -> Result<ScoringConfig, ConfigError> {
        match &self.scoring_config_path {
            Some(path) => ScoringConfig::load(path),
            None => {
                tracing::debug!("No scoring config path set, using defaults");
                Ok(ScoringConfig::default())
            }
        }
    }

    /// Offer catalog from `catalog_path`, or the defaults
    pub fn offer_catalog(&self) -> Result<OfferCatalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => OfferCatalog::load(path),
            None => {
                tracing::debug!("No catalog path set, using defaults");
                Ok(OfferCatalog::default())
            }
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level or EnvFilter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl ObservabilityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::invalid(
                "observability.log_level",
                "Log level must not be empty",
            ));
        }
        Ok(())
    }
}

/// Load settings from files and environment
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("FLUENCY_LEADS")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
