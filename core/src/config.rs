//! Configuration management (config.toml)
//!
//! Handles loading and providing defaults for runtime settings.
//! Settings are stored in TOML format in the platform-specific config directory.

use std::path::{Path, PathBuf};

use haxagon_shared::formats::{DEFAULT_SCORE_CAPACITY, SCORE_OVERHEAD};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::save_store::DEFAULT_EEPROM_BYTES;

/// Runtime configuration.
///
/// Passed explicitly to every component that needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where level packs and saved blobs live
    #[serde(default)]
    pub storage: StorageConfig,
    /// Score database settings
    #[serde(default)]
    pub scores: ScoreConfig,
    /// Game-over screen settings
    #[serde(default)]
    pub over: OverConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Built-in assets (default: `romfs` next to the working directory)
    #[serde(default = "default_rom_dir")]
    pub rom_dir: PathBuf,
    /// User level packs, every `*.haxagon` file is loaded
    #[serde(default = "default_user_dir")]
    pub user_dir: PathBuf,
    /// Non-volatile blobs
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,
    /// Total byte budget of the save medium (default: 512)
    #[serde(default = "default_eeprom_bytes")]
    pub eeprom_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Fixed size of the score blob (default: 500)
    #[serde(default = "default_score_capacity")]
    pub capacity: usize,
    /// Blob key (default: `/scores.db`)
    #[serde(default = "default_score_key")]
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverConfig {
    /// Frames before the game-over screen accepts input (default: 60)
    #[serde(default = "default_min_display_frames")]
    pub min_display_frames: f32,
}

fn default_rom_dir() -> PathBuf {
    PathBuf::from("romfs")
}
fn default_user_dir() -> PathBuf {
    data_dir()
        .map(|dir| dir.join("levels"))
        .unwrap_or_else(|| PathBuf::from("levels"))
}
fn default_save_dir() -> PathBuf {
    data_dir()
        .map(|dir| dir.join("saves"))
        .unwrap_or_else(|| PathBuf::from("saves"))
}
fn default_eeprom_bytes() -> usize {
    DEFAULT_EEPROM_BYTES
}

fn default_score_capacity() -> usize {
    DEFAULT_SCORE_CAPACITY
}
fn default_score_key() -> String {
    "/scores.db".to_string()
}

fn default_min_display_frames() -> f32 {
    60.0
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            rom_dir: default_rom_dir(),
            user_dir: default_user_dir(),
            save_dir: default_save_dir(),
            eeprom_bytes: default_eeprom_bytes(),
        }
    }
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            capacity: default_score_capacity(),
            key: default_score_key(),
        }
    }
}

impl Default for OverConfig {
    fn default() -> Self {
        Self {
            min_display_frames: default_min_display_frames(),
        }
    }
}

impl Config {
    /// Check settings that depend on each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let capacity = self.scores.capacity;
        if capacity < SCORE_OVERHEAD {
            return Err(ConfigError::ScoreCapacityTooSmall {
                capacity,
                min: SCORE_OVERHEAD,
            });
        }
        if capacity > self.storage.eeprom_bytes {
            return Err(ConfigError::ScoreCapacityOverBudget {
                capacity,
                budget: self.storage.eeprom_bytes,
            });
        }
        Ok(())
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Linux: `~/.config/haxagon`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "superhaxagon", "haxagon")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns the platform-specific data directory for user levels and saves.
///
/// On Linux: `~/.local/share/haxagon`
pub fn data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "superhaxagon", "haxagon")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Loads the configuration from disk.
///
/// Reads `config.toml` from the platform's configuration directory.
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = config_dir().map(|dir| dir.join("config.toml")) else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{e}, using defaults");
            Config::default()
        }
    }
}

/// Loads the configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.scores.capacity, 500);
        assert_eq!(config.scores.key, "/scores.db");
        assert_eq!(config.storage.eeprom_bytes, 512);
        assert_eq!(config.storage.rom_dir, PathBuf::from("romfs"));
        assert!((config.over.min_display_frames - 60.0).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.scores.capacity, 500);
        assert!((config.over.min_display_frames - 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml_str = r#"
[storage]
rom_dir = "/opt/haxagon/romfs"

[scores]
capacity = 256
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.storage.rom_dir, PathBuf::from("/opt/haxagon/romfs"));
        assert_eq!(config.storage.eeprom_bytes, 512); // default
        assert_eq!(config.scores.capacity, 256);
        assert_eq!(config.scores.key, "/scores.db"); // default
    }

    #[test]
    fn test_config_serialize_roundtrip() {
        let mut config = Config::default();
        config.scores.key = "/alt.db".to_string();
        config.over.min_display_frames = 30.0;

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_capacity() {
        let mut config = Config::default();
        config.scores.capacity = 600;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ScoreCapacityOverBudget {
                capacity: 600,
                budget: 512
            })
        ));

        config.scores.capacity = 10;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ScoreCapacityTooSmall { min: 18, .. })
        ));
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scores]\ncapacity = \"lots\"\n").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            load_from(&dir.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));

        std::fs::write(&path, "[over]\nmin_display_frames = 12.5\n").unwrap();
        let config = load_from(&path).unwrap();
        assert!((config.over.min_display_frames - 12.5).abs() < f32::EPSILON);
    }
}
