use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::preset::Preset;
use crate::runtime::{MAX_TICK_INTERVAL, MIN_TICK_INTERVAL};

/// Values of the user adjustable "custom" preset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomPresetConfig {
    pub rounds: u32,
    pub round_duration_secs: u32,
    pub rest_duration_secs: u32,
}

impl Default for CustomPresetConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            round_duration_secs: 180,
            rest_duration_secs: 60,
        }
    }
}

impl From<&Preset> for CustomPresetConfig {
    fn from(p: &Preset) -> Self {
        Self {
            rounds: p.rounds,
            round_duration_secs: p.round_duration_secs,
            rest_duration_secs: p.rest_duration_secs,
        }
    }
}

impl CustomPresetConfig {
    pub fn to_preset(self) -> Preset {
        Preset::custom(self.rounds, self.round_duration_secs, self.rest_duration_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Preset highlighted on launch
    pub default_preset: Option<String>,
    pub custom: CustomPresetConfig,
    pub sound: bool,
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_preset: None,
            custom: CustomPresetConfig::default(),
            sound: true,
            tick_interval_ms: 1000,
        }
    }
}

impl Config {
    /// Clock cadence, kept within what the tick schedule accepts
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms).clamp(MIN_TICK_INTERVAL, MAX_TICK_INTERVAL)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "gymclock") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("gymclock_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("ignoring unreadable config {}: {}", self.path.display(), e);
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
