//! Error types for the settings crate.
//!
//! This module provides structured error types for shelf project files and
//! their validation.

use shelfkit_camtools::ConfigurationError;
use std::io;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The project file could not be loaded.
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    /// The project file could not be saved.
    #[error("Failed to save settings: {0}")]
    SaveError(String),

    /// A setting value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// A configuration file error occurred.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The shelf described by the settings cannot be built.
    #[error("Shelf geometry error: {0}")]
    Geometry(#[from] ConfigurationError),
}

/// Errors related to the configuration file itself.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file format is not supported.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// No directory could be determined for the default project file.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
