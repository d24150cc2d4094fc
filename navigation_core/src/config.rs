//! Configuration loading with env-var overrides.
//!
//! Every section is optional; missing values fall back to the defaults the
//! graph and game were designed with. `NAVIGATOR_LOG_LEVEL` overrides
//! `logging.level`.

use character_catalog::WeightTable;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::relationship_graph::{
    GraphBuilder, RelationRules, DEFAULT_EXCLUDED_DEBUT_PREFIX, DEFAULT_SPECIAL_AFFILIATION,
};

/// Env var that overrides the configured log level.
pub const LOG_LEVEL_ENV: &str = "NAVIGATOR_LOG_LEVEL";

/// Graph construction settings (`[graph]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Characters whose debut starts with one of these are left out.
    pub excluded_debut_prefixes: Vec<String>,
    /// Affiliation scored with the special affiliation weight.
    pub special_affiliation: Option<String>,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            excluded_debut_prefixes: vec![DEFAULT_EXCLUDED_DEBUT_PREFIX.to_owned()],
            special_affiliation: Some(DEFAULT_SPECIAL_AFFILIATION.to_owned()),
        }
    }
}

/// Game settings (`[game]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Moves allowed per session; omitted means unlimited.
    pub move_limit: Option<u32>,
}

/// Logging settings (`[logging]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

/// Fully-resolved navigator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub graph: GraphSettings,
    pub weights: WeightTable,
    pub game: GameSettings,
    pub logging: LoggingSettings,
}

impl NavigatorConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file, then apply env overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;
        config.apply_env_overrides(std::env::var(LOG_LEVEL_ENV).ok());
        Ok(config)
    }

    /// Defaults with env overrides applied, for runs without a config file.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides(std::env::var(LOG_LEVEL_ENV).ok());
        config
    }

    fn apply_env_overrides(&mut self, log_level: Option<String>) {
        if let Some(level) = log_level.filter(|l| !l.trim().is_empty()) {
            self.logging.level = level.trim().to_owned();
        }
    }

    /// A graph builder using these settings.
    pub fn graph_builder(&self) -> GraphBuilder {
        let rules = RelationRules::new(self.weights.clone(), self.graph.special_affiliation.clone());
        GraphBuilder::new(rules).with_excluded_prefixes(self.graph.excluded_debut_prefixes.clone())
    }
}
