//! # Combat Error Types
//!
//! All errors that can occur in the combat core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during combat.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CombatError {
    /// Every projectile slot is occupied. The caller suppresses the shot.
    #[error("projectile slots full: all {capacity} in use")]
    Full {
        /// Number of slots.
        capacity: usize,
    },
}

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for a combat config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for combat operations.
pub type CombatResult<T> = Result<T, CombatError>;
