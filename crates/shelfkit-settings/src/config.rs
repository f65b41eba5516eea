//! Shelf project files
//!
//! A project bundles the shelf dimensions with finger joint and cutter
//! settings. Projects are stored as JSON or TOML, chosen by file extension.
//! Every section has defaults, so partial files are accepted.

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use shelfkit_camtools::{derive_geometry, CutterSettings, FingerJointSettings, ShelfParameters};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supported project file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    Json,
    Toml,
}

impl ProjectFormat {
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(format!(
                "{} (project file must be .json or .toml)",
                other.unwrap_or("no extension")
            ))
            .into()),
        }
    }
}

/// Complete shelf project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShelfProject {
    /// Shelf dimensions and options
    pub shelf: ShelfParameters,
    /// Finger joint proportions
    pub finger_joint: FingerJointSettings,
    /// Laser and sheet layout settings
    pub cutter: CutterSettings,
}

impl ShelfProject {
    /// Create new project with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `shelf.toml` in the platform config directory.
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::ConfigDirectory("no config directory on this platform".to_string())
        })?;
        Ok(dir.join("shelfkit").join("shelf.toml"))
    }

    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ProjectFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let project = Self::from_str_as(&content, format)?;
        project.validate()?;
        debug!(path = %path.display(), "Loaded shelf project");
        Ok(project)
    }

    pub fn from_str_as(content: &str, format: ProjectFormat) -> SettingsResult<Self> {
        let project = match format {
            ProjectFormat::Json => serde_json::from_str(content)?,
            ProjectFormat::Toml => toml::from_str(content)?,
        };
        Ok(project)
    }

    pub fn to_string_as(&self, format: ProjectFormat) -> SettingsResult<String> {
        match format {
            ProjectFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ProjectFormat::Toml => toml::to_string_pretty(self).map_err(|e| {
                SettingsError::SaveError(format!("Failed to serialize project: {}", e))
            }),
        }
    }

    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = self.to_string_as(ProjectFormat::from_path(path)?)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "Saved shelf project");
        Ok(())
    }

    pub fn validate(&self) -> SettingsResult<()> {
        self.finger_joint
            .validate()
            .map_err(|reason| SettingsError::InvalidSetting {
                key: "finger_joint".to_string(),
                reason,
            })?;

        self.cutter
            .validate()
            .map_err(|reason| SettingsError::InvalidSetting {
                key: "cutter".to_string(),
                reason,
            })?;

        if self.shelf.hole_diameter < 0.0 {
            return Err(SettingsError::InvalidSetting {
                key: "shelf.hole_diameter".to_string(),
                reason: "must not be negative".to_string(),
            });
        }

        derive_geometry(&self.shelf)?;

        if self.cutter.burn >= self.shelf.thickness {
            return Err(SettingsError::InvalidSetting {
                key: "cutter.burn".to_string(),
                reason: "must be smaller than the material thickness".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_project_is_valid() {
        assert!(ShelfProject::new().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let content = r#"
            [shelf]
            shelf_count = 3
            height = 400.0
            hole_diameter = 8.0
        "#;
        let project = ShelfProject::from_str_as(content, ProjectFormat::Toml).unwrap();
        assert_eq!(project.shelf.shelf_count, 3);
        assert_eq!(project.shelf.height, 400.0);
        assert_eq!(project.shelf.width, 140.0);
        assert_eq!(project.cutter, CutterSettings::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let content = r#"{ "shelf": { "angle_degrees": 30.0 }, "cutter": { "burn": 0.2 } }"#;
        let project = ShelfProject::from_str_as(content, ProjectFormat::Json).unwrap();
        assert_eq!(project.shelf.angle_degrees, 30.0);
        assert_eq!(project.cutter.burn, 0.2);
        assert_eq!(project.cutter.laser_passes, 3);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ProjectFormat::from_path(Path::new("a/shelf.toml")).unwrap(),
            ProjectFormat::Toml
        );
        assert_eq!(
            ProjectFormat::from_path(Path::new("shelf.json")).unwrap(),
            ProjectFormat::Json
        );
        assert!(matches!(
            ProjectFormat::from_path(Path::new("shelf.yaml")),
            Err(SettingsError::Config(ConfigError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn test_validate_rejects_impossible_shelf() {
        let mut project = ShelfProject::new();
        project.shelf.depth = 10.0;
        assert!(matches!(
            project.validate(),
            Err(SettingsError::Geometry(_))
        ));

        let mut project = ShelfProject::new();
        project.cutter.feed_rate = 0.0;
        assert!(matches!(
            project.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));

        let mut project = ShelfProject::new();
        project.cutter.burn = 3.0;
        assert!(matches!(
            project.validate(),
            Err(SettingsError::InvalidSetting { key, .. }) if key == "cutter.burn"
        ));
    }
}
