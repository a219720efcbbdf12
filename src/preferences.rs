//! Persisted client preferences.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// How a category page lays out its products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub view_mode: ViewMode,
}

impl Preferences {
    /// Read preferences; a missing or unreadable file yields the defaults
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read preferences from {}", path.display());
                return Self::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring corrupt preferences file {}", path.display());
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create preferences directory")?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize preferences")?;
        std::fs::write(path, json).context("Failed to write preferences")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_defaults_to_grid() {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences::load(&dir.path().join("preferences.json"));
        assert_eq!(prefs.view_mode, ViewMode::Grid);
    }

    #[test]
    fn test_view_mode_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("preferences.json");

        let prefs = Preferences {
            view_mode: ViewMode::List,
        };
        prefs.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"view_mode\": \"list\""));
        assert_eq!(Preferences::load(&path).view_mode, ViewMode::List);
    }

    #[test]
    fn test_corrupt_file_defaults_to_grid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Preferences::load(&path).view_mode, ViewMode::Grid);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(ViewMode::Grid.toggled(), ViewMode::List);
        assert_eq!(ViewMode::List.toggled(), ViewMode::Grid);
    }
}
