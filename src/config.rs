use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::generators::{EVENT_COUNT, MAX_EVENT_COUNT, Strategy};
use crate::orchestra::OrchestraConfig;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Everything a performance run needs. Every field has a default, so a
/// config file only has to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Passed verbatim to the engine before compilation.
    pub engine_option: String,
    pub score: Strategy,
    pub event_count: usize,
    /// Fixes the structured builder's pitch choices; entropy-seeded when
    /// absent.
    pub seed: Option<u64>,
    pub orchestra: OrchestraConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine_option: "-odac".to_string(),
            score: Strategy::default(),
            event_count: EVENT_COUNT,
            seed: None,
            orchestra: OrchestraConfig::default(),
        }
    }
}

impl Config {
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, ron_string)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ron_string = fs::read_to_string(path)?;
        let config: Config = ron::from_str(&ron_string)?;
        config.validate()?;
        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = self.orchestra.problems();
        if self.engine_option.trim().is_empty() {
            problems.push("engine_option must not be empty".to_string());
        }
        if self.event_count > MAX_EVENT_COUNT {
            problems.push(format!(
                "event_count {} exceeds {}",
                self.event_count, MAX_EVENT_COUNT
            ));
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}
