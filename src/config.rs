use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::state::{PerTeam, ScoringRules, TeamColor};

/// Application folder under the platform config directory
const APP_DIR: &str = "TreasureScoreboard";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Point table and per-type quotas
    pub rules: ScoringRules,

    /// Max characters of each team name (0 = unlimited)
    pub max_name_length: PerTeam<usize>,

    /// Names shown when a match is created
    pub default_team_names: PerTeam<String>,

    /// Names used when an operator clears a name
    pub fallback_team_names: PerTeam<String>,

    /// Colors shown when a match is created
    pub default_team_colors: PerTeam<TeamColor>,

    /// Timer tick cadence in milliseconds
    pub tick_interval_ms: u64,

    /// Near-end cue window in milliseconds
    pub near_end_window_ms: u64,

    /// Quick time presets in seconds
    pub time_presets: Vec<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: ScoringRules::default(),
            max_name_length: PerTeam::new(60, 60),
            default_team_names: PerTeam::new("RED TEAM".to_string(), "BLUE TEAM".to_string()),
            fallback_team_names: PerTeam::new("TEAM 1".to_string(), "TEAM 2".to_string()),
            default_team_colors: PerTeam::new(
                TeamColor::from_rgb(0xe74c3c),
                TeamColor::from_rgb(0x1e73be),
            ),
            tick_interval_ms: 100, // 1s display resolution, 4s cue window
            near_end_window_ms: 4000,
            time_presets: vec![210, 180, 60, 30],
        }
    }
}

impl Config {
    /// Load configuration from the platform-specific config directory.
    /// Creates default config if file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;

        if path.exists() {
            let config = Self::load_from(&path)?;
            tracing::info!("Loaded config from: {}", path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(&path)?;
            tracing::info!("Created default config at: {}", path.display());
            Ok(config)
        }
    }

    /// Read and validate a config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source,
        };

        let content = fs::read_to_string(path).map_err(|e| load_failed(Box::new(e)))?;
        let config: Config = serde_json::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source,
        };

        let json = serde_json::to_string_pretty(self).map_err(|e| save_failed(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_failed(Box::new(e)))?;
        Ok(())
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1000).contains(&self.tick_interval_ms) {
            return Err(ConfigError::Invalid(format!(
                "tick_interval_ms must be 1-1000, got {}",
                self.tick_interval_ms
            )));
        }

        if self.near_end_window_ms == 0 {
            return Err(ConfigError::Invalid(
                "near_end_window_ms must be greater than 0".to_string(),
            ));
        }

        for name in [&self.fallback_team_names.team1, &self.fallback_team_names.team2] {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "fallback team names must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn near_end_window(&self) -> Duration {
        Duration::from_millis(self.near_end_window_ms)
    }

    /// Directory holding the config file and logs
    pub fn app_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::app_dir()?.join("config.json"))
    }

    /// Get the config file path for display purposes
    pub fn config_path_display() -> String {
        Self::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}
