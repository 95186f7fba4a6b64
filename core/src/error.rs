//! Runtime error types

use std::path::PathBuf;

use thiserror::Error;

/// Conditions that stop the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Every source failed or none existed
    #[error("no levels loaded")]
    NoLevelsLoaded,
}

/// Failure to read or validate a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("score capacity {capacity} is below the {min}-byte minimum")]
    ScoreCapacityTooSmall { capacity: usize, min: usize },

    #[error("score capacity {capacity} exceeds the {budget}-byte storage budget")]
    ScoreCapacityOverBudget { capacity: usize, budget: usize },
}
