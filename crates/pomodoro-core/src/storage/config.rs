//! TOML-based host configuration.
//!
//! Timer preferences live in the key-value store (see [`super::SettingsStore`]).
//! This file holds knobs for the host process itself:
//! - Quote source and rotation interval
//! - Notification delivery toggles
//! - Log filter
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;

/// Quote rotation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotesConfig {
    /// File path or http(s) URL of a JSON array of `{text, author}`.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default = "default_rotate_secs")]
    pub rotate_secs: u64,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub sound: bool,
}

/// Host configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub quotes: QuotesConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// `tracing` filter directive used when `POMODORO_LOG` is unset.
    #[serde(default = "default_log")]
    pub log: String,
}

fn default_rotate_secs() -> u64 {
    20
}
fn default_true() -> bool {
    true
}
fn default_log() -> String {
    "warn".into()
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            source: None,
            rotate_secs: default_rotate_secs(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quotes: QuotesConfig::default(),
            notifications: NotificationsConfig::default(),
            log: default_log(),
        }
    }
}

impl AppConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(root, |current, part| current.get(part))
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut parent = root;
        if let Some(path) = parent_path {
            for part in path.split('.') {
                parent = parent.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = parent.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as true/false")))?,
            ),
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
            // Optional strings are null until first set.
            serde_json::Value::Null if value.is_empty() => serde_json::Value::Null,
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Path of the config file inside `dir`.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join("config.toml")
    }

    /// Load from `<dir>/config.toml`, writing the defaults if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(dir);
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(dir)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to `<dir>/config.toml`.
    pub fn save_to(&self, dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path_in(dir);
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    fn dir() -> Result<PathBuf, ConfigError> {
        data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })
    }

    /// Load from the data directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::dir()?)
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::dir()?)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::get_json_value_by_path(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = AppConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_toml_takes_defaults() {
        let parsed: AppConfig = toml::from_str("[quotes]\nrotate_secs = 5\n").unwrap();
        assert_eq!(parsed.quotes.rotate_secs, 5);
        assert_eq!(parsed.quotes.source, None);
        assert!(parsed.notifications.enabled);
        assert_eq!(parsed.log, "warn");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("quotes.rotate_secs").as_deref(), Some("20"));
        assert_eq!(cfg.get("notifications.sound").as_deref(), Some("true"));
        assert_eq!(cfg.get("log").as_deref(), Some("warn"));
        assert!(cfg.get("quotes.source").is_none());
        assert!(cfg.get("quotes.missing").is_none());
    }

    #[test]
    fn set_updates_typed_fields() {
        let mut cfg = AppConfig::default();
        cfg.set("notifications.enabled", "false").unwrap();
        cfg.set("quotes.rotate_secs", "45").unwrap();
        cfg.set("quotes.source", "https://example.com/quotes.json")
            .unwrap();
        cfg.set("log", "debug").unwrap();
        assert!(!cfg.notifications.enabled);
        assert_eq!(cfg.quotes.rotate_secs, 45);
        assert_eq!(
            cfg.quotes.source.as_deref(),
            Some("https://example.com/quotes.json")
        );
        assert_eq!(cfg.log, "debug");
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_type() {
        let mut cfg = AppConfig::default();
        assert!(matches!(
            cfg.set("quotes.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("notifications.enabled", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("quotes.rotate_secs", "-1"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert!(AppConfig::path_in(dir.path()).exists());

        let mut changed = cfg.clone();
        changed.set("quotes.rotate_secs", "7").unwrap();
        changed.save_to(dir.path()).unwrap();
        assert_eq!(AppConfig::load_from(dir.path()).unwrap().quotes.rotate_secs, 7);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(AppConfig::path_in(dir.path()), "quotes = [").unwrap();
        assert!(matches!(
            AppConfig::load_from(dir.path()),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
