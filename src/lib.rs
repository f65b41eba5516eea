//! # ShelfKit
//!
//! Generates the panels of a laser-cut display shelf with slanted shelves.
//!
//! ## Architecture
//!
//! 1. **shelfkit-camtools** - Shelf geometry, finger joints, cut paths and G-code
//! 2. **shelfkit-settings** - Project files (JSON/TOML) and validation
//! 3. **shelfkit** - Command line binary and logging setup

pub mod cli;

pub use shelfkit_camtools::{
    CamToolError, ConfigurationError, CutterSettings, DerivedGeometry, DisplayShelfMaker,
    FingerJointSettings, Panel, PanelCutter, PanelSink, ShelfParameters,
};
pub use shelfkit_settings::{SettingsError, ShelfProject};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr so generated G-code on stdout stays clean
/// - RUST_LOG environment variable support
/// - `default_level` when RUST_LOG names nothing more specific
pub fn init_logging(default_level: tracing::Level) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(default_level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
