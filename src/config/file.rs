//! YAML configuration file for the engine host

use super::settings::{Settings, WorldConfig, WorldInit};
use crate::engine::speed::SpeedConfig;
use crate::game_of_life::LifeLikeRule;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub world: WorldConfig,
    pub speed: SpeedConfig,
    /// Transition rule in `B<digits>/S<digits>` notation
    pub rule: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            speed: SpeedConfig::default(),
            rule: "B3/S23".to_string(),
        }
    }
}

impl ConfigFile {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Check everything an engine would reject, before one is built
    pub fn validate(&self) -> Result<()> {
        self.rule()?;
        Settings::from_config(self.world.clone(), self.speed).context("Invalid world settings")?;
        Ok(())
    }

    pub fn rule(&self) -> Result<LifeLikeRule> {
        self.rule
            .parse::<LifeLikeRule>()
            .with_context(|| format!("Invalid rule: {}", self.rule))
    }

    /// Build the runtime settings this file describes
    pub fn to_settings(&self) -> Result<Settings> {
        Ok(Settings::from_config(self.world.clone(), self.speed)?)
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(rows) = cli_overrides.rows {
            self.world.rows = rows;
        }
        if let Some(cols) = cli_overrides.cols {
            self.world.cols = cols;
        }
        if let Some(init) = cli_overrides.init {
            self.world.init = init;
        }
        if let Some(wrap_edges) = cli_overrides.wrap_edges {
            self.world.wrap_edges = wrap_edges;
        }
        if let Some(seed) = cli_overrides.seed {
            self.world.seed = Some(seed);
        }
        if let Some(ref rule) = cli_overrides.rule {
            self.rule = rule.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub init: Option<WorldInit>,
    pub wrap_edges: Option<bool>,
    pub seed: Option<u64>,
    pub rule: Option<String>,
}
