//! Persisted user settings
//!
//! Orthogonal to the conversion and history invariants: a plain record
//! with defaults, stored as its own JSON file next to the history.

use crate::currency::Currency;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Well-known file name for the persisted settings record
pub const DEFAULT_SETTINGS_FILE: &str = "converter_settings.json";

/// Configuration for the converter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Refresh rates on a periodic timer
    pub auto_update: bool,
    /// Seconds between periodic refreshes
    pub refresh_interval_secs: u64,
    /// Locale used by the presentation layer for number formatting
    pub number_format: String,
    /// Preferred rate provider name
    pub rate_source: String,
    /// API key for providers that require one; empty when unset
    pub api_key: String,
    /// Surface rate-change notifications in the presentation layer
    pub notifications: bool,
    /// UI language tag
    pub language: String,
    /// Pairs pinned by the user
    pub favorite_pairs: Vec<(Currency, Currency)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_update: true,
            refresh_interval_secs: 300,
            number_format: "en-US".to_string(),
            rate_source: "http".to_string(),
            api_key: String::new(),
            notifications: false,
            language: "en".to_string(),
            favorite_pairs: vec![
                (Currency::EUR, Currency::USD),
                (Currency::USD, Currency::JPY),
                (Currency::GBP, Currency::USD),
            ],
        }
    }
}

impl Settings {
    /// Load from a JSON file, falling back to defaults when absent
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    /// Persist to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Periodic refresh interval as a [`Duration`]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.auto_update);
        assert_eq!(settings.refresh_interval(), Duration::from_secs(300));
        assert_eq!(settings.number_format, "en-US");
        assert!(settings.api_key.is_empty());
        assert_eq!(settings.favorite_pairs.len(), 3);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SETTINGS_FILE);

        let mut settings = Settings::default();
        settings.auto_update = false;
        settings.refresh_interval_secs = 60;
        settings.language = "pt".to_string();
        settings.api_key = "k-123".to_string();
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }
}
