//! Configuration for the folio engine
//!
//! Breakpoints, thresholds and the shared collapse-animation duration live
//! here so that the compensator and the stylesheet agree on one constant.
//!
//! # Configuration Hierarchy
//!
//! 1. An explicit file passed to [`FolioConfig::load_from`]
//! 2. User-level config (`<config_dir>/folio/folio.yaml`)
//! 3. Built-in defaults
//!
//! # Configuration File Format
//!
//! ```yaml
//! layout:
//!   desktop_min_width: 900
//!   dock_max_height: 700
//! compensation:
//!   mobile_max_width: 600
//!   collapse_duration_ms: 500
//!   control_margin: 20
//! ```

use crate::error::{FolioError, FolioResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Layout-mode thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Widths strictly above this are the desktop arrangement
    pub desktop_min_width: f64,
    /// On desktop, heights strictly below this dock the contact panel
    pub dock_max_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            desktop_min_width: 900.0,
            dock_max_height: 700.0,
        }
    }
}

/// Scroll compensation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensationConfig {
    /// Widths at or below this use the settle-to-control strategy
    pub mobile_max_width: f64,
    /// Duration of the CSS collapse animation, in milliseconds
    pub collapse_duration_ms: u64,
    /// Gap left between a pinned control and the viewport bottom
    pub control_margin: f64,
}

impl Default for CompensationConfig {
    fn default() -> Self {
        Self {
            mobile_max_width: 600.0,
            collapse_duration_ms: 500,
            control_margin: 20.0,
        }
    }
}

impl CompensationConfig {
    /// Collapse animation duration
    pub fn collapse_duration(&self) -> Duration {
        Duration::from_millis(self.collapse_duration_ms)
    }
}

/// Folio configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Layout-mode thresholds
    pub layout: LayoutConfig,
    /// Scroll compensation settings
    pub compensation: CompensationConfig,
}

impl FolioConfig {
    /// Load configuration from the user config file, falling back to defaults
    pub fn load() -> FolioResult<Self> {
        match Self::config_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::debug!("Using default config: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific YAML file
    pub fn load_from(path: &Path) -> FolioResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| FolioError::io(path, e))?;
        let config: Self = serde_yaml::from_str(&raw)?;
        config.validate()?;
        tracing::debug!("Loaded FolioConfig from {}", path.display());
        Ok(config)
    }

    /// Get the config file path
    pub fn config_path() -> FolioResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FolioError::config("Could not determine config directory"))?;
        Ok(config_dir.join("folio").join("folio.yaml"))
    }

    /// Reject settings the engine cannot honor
    pub fn validate(&self) -> FolioResult<()> {
        if self.compensation.collapse_duration_ms == 0 {
            return Err(FolioError::config(
                "compensation.collapse_duration_ms must be non-zero",
            ));
        }
        if self.compensation.control_margin < 0.0 {
            return Err(FolioError::config(
                "compensation.control_margin must not be negative",
            ));
        }
        if self.compensation.mobile_max_width >= self.layout.desktop_min_width {
            return Err(FolioError::config(format!(
                "compensation.mobile_max_width ({}) must be below layout.desktop_min_width ({})",
                self.compensation.mobile_max_width, self.layout.desktop_min_width
            )));
        }
        if self.layout.dock_max_height <= 0.0 {
            return Err(FolioError::config("layout.dock_max_height must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_stylesheet() {
        let config = FolioConfig::default();
        assert_eq!(config.layout.desktop_min_width, 900.0);
        assert_eq!(config.layout.dock_max_height, 700.0);
        assert_eq!(config.compensation.mobile_max_width, 600.0);
        assert_eq!(
            config.compensation.collapse_duration(),
            Duration::from_millis(500)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "compensation:\n  collapse_duration_ms: 350").unwrap();

        let config = FolioConfig::load_from(file.path()).unwrap();
        assert_eq!(config.compensation.collapse_duration_ms, 350);
        assert_eq!(config.compensation.control_margin, 20.0);
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let mut config = FolioConfig::default();
        config.compensation.collapse_duration_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(FolioError::Config { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_overlapping_breakpoints() {
        let mut config = FolioConfig::default();
        config.compensation.mobile_max_width = 950.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FolioConfig::load_from(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, FolioError::Io { .. }));
    }
}
