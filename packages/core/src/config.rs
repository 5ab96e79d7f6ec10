/// Configuration for the editor core
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound for the persistence debounce window.
/// Anything longer risks losing a noticeable amount of typing on a crash.
const MAX_PERSIST_DEBOUNCE_MS: u64 = 60_000;

/// Runtime configuration for `PageState`, `PageSyncer` and page loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Quiet period before a page snapshot is persisted (milliseconds)
    pub persist_debounce_ms: u64,

    /// Slug of the page that is scaffolded on first visit
    pub start_slug: String,

    /// Title given to freshly created pages
    pub default_title: String,

    /// Cover image path given to freshly created pages
    pub default_cover: String,

    /// Capacity of the page event broadcast channel
    pub event_channel_capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            persist_debounce_ms: 500,
            start_slug: "start".to_string(),
            default_title: "Untitled".to_string(),
            default_cover: "cover/default.png".to_string(),
            event_channel_capacity: 128,
        }
    }
}

impl EditorConfig {
    /// Debounce window as a `Duration`
    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }

    /// Parse a JSON document; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("Invalid editor config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {:?}: {}", path, e))?;
        Self::from_json_str(&json)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.persist_debounce_ms > MAX_PERSIST_DEBOUNCE_MS {
            return Err(format!(
                "persist_debounce_ms cannot exceed {} ms",
                MAX_PERSIST_DEBOUNCE_MS
            ));
        }

        if !crate::models::is_valid_slug(&self.start_slug) {
            return Err(format!("start_slug '{}' is not a valid slug", self.start_slug));
        }

        if self.default_title.is_empty() {
            return Err("default_title cannot be empty".to_string());
        }

        if self.event_channel_capacity == 0 {
            return Err("event_channel_capacity must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.persist_debounce_ms, 500);
        assert_eq!(config.persist_debounce(), Duration::from_millis(500));
        assert_eq!(config.start_slug, "start");
        assert_eq!(config.default_title, "Untitled");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EditorConfig::default();

        config.persist_debounce_ms = 120_000;
        assert!(config.validate().is_err());

        config.persist_debounce_ms = 0;
        assert!(config.validate().is_ok());

        config.start_slug = "with space".to_string();
        assert!(config.validate().is_err());

        config.start_slug = "start".to_string();
        config.event_channel_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json_str(r#"{"persist_debounce_ms": 250}"#).unwrap();
        assert_eq!(config.persist_debounce_ms, 250);
        assert_eq!(config.start_slug, "start");
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(EditorConfig::from_json_str("{not json").is_err());
        assert!(EditorConfig::from_json_str(r#"{"default_title": ""}"#).is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{"start_slug": "home"}"#).unwrap();

        let config = EditorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.start_slug, "home");
        assert!(EditorConfig::from_json_file(dir.path().join("missing.json")).is_err());
    }
}
