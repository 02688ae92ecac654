//! Game configuration (JSON file)

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cards::Category;
use crate::error::Result;
use crate::fuzzy::{Thresholds, CLOSE_THRESHOLD, EXACT_THRESHOLD};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct GameConfig {
    pub exact_threshold: f64,
    pub close_threshold: f64,
    /// Restrict the session deck to one category
    pub category: Option<Category>,
    pub record_attempts: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            exact_threshold: EXACT_THRESHOLD,
            close_threshold: CLOSE_THRESHOLD,
            category: None,
            record_attempts: true,
        }
    }
}

impl GameConfig {
    /// Read config from `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.thresholds()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn thresholds(&self) -> Result<Thresholds> {
        Thresholds::new(self.exact_threshold, self.close_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlashcardError;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.exact_threshold, 0.8);
        assert_eq!(config.close_threshold, 0.6);
        assert!(config.record_attempts);
        assert_eq!(config.thresholds().unwrap(), Thresholds::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"exactThreshold": 0.9, "category": "animals"}"#).unwrap();
        assert_eq!(config.exact_threshold, 0.9);
        assert_eq!(config.close_threshold, 0.6);
        assert_eq!(config.category, Some(Category::Animals));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load(dir.path().join("nope.json")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("game.json");
        let config = GameConfig {
            exact_threshold: 0.85,
            close_threshold: 0.5,
            category: Some(Category::Fruits),
            record_attempts: false,
        };
        config.save(&path).unwrap();
        assert_eq!(GameConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_inverted_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        fs::write(&path, r#"{"exactThreshold": 0.5, "closeThreshold": 0.7}"#).unwrap();
        assert!(matches!(
            GameConfig::load(&path),
            Err(FlashcardError::InvalidThresholds { .. })
        ));
    }
}
