//! ShelfKit Settings Crate
//!
//! Handles shelf project files: loading, saving and validation.

pub mod config;
pub mod error;

pub use config::{ProjectFormat, ShelfProject};
pub use error::{ConfigError, SettingsError, SettingsResult};
