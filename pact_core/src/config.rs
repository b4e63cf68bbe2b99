//! Configuration file support for Pact.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/pact/config.toml`.

use crate::{Error, GroupConfig, Result, TargetCurve, Weekday};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub group: GroupSection,

    #[serde(default)]
    pub targets: TargetCurve,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Group challenge configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupSection {
    /// Day 1 of the challenge; required before any day can be numbered
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default = "default_rest_days")]
    pub rest_days: BTreeSet<Weekday>,

    #[serde(default = "default_recovery_days")]
    pub recovery_days: BTreeSet<Weekday>,
}

impl Default for GroupSection {
    fn default() -> Self {
        Self {
            start_date: None,
            rest_days: default_rest_days(),
            recovery_days: default_recovery_days(),
        }
    }
}

impl TryFrom<&GroupSection> for GroupConfig {
    type Error = Error;

    fn try_from(section: &GroupSection) -> Result<Self> {
        let start_date = section.start_date.ok_or_else(|| {
            Error::Config("[group] start_date is required (YYYY-MM-DD)".into())
        })?;

        Ok(GroupConfig {
            start_date,
            rest_days: section.rest_days.clone(),
            recovery_days: section.recovery_days.clone(),
        })
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(".local/share")
    });
    base.join("pact")
}

fn default_rest_days() -> BTreeSet<Weekday> {
    BTreeSet::from([0])
}

fn default_recovery_days() -> BTreeSet<Weekday> {
    BTreeSet::from([5])
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
        base.join("pact").join("config.toml")
    }

    /// Check the group start date, group weekdays and the target curve ordering
    pub fn validate(&self) -> Result<()> {
        self.group_config()?
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;
        self.targets.validate()
    }

    /// Group configuration handed to the engine
    ///
    /// Fails with `Error::Config` when no start date is configured.
    pub fn group_config(&self) -> Result<GroupConfig> {
        GroupConfig::try_from(&self.group)
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
