//! TOML-based application configuration.
//!
//! Stores:
//! - Which time-tracking workspace to read and from when
//! - Where the target weights live
//! - How the priority task is placed on the task board
//!
//! Configuration is stored at `~/.config/timeshare/config.toml`.
//! Credentials are never stored here; they live in the OS keyring.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};

/// Time-tracking source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Only entries after this instant count.
    #[serde(default = "default_since")]
    pub since: DateTime<Utc>,
    /// Workspace to read entries from.
    #[serde(default)]
    pub workspace_name: String,
    /// Count the currently running entry as well.
    #[serde(default = "default_true")]
    pub include_running: bool,
}

/// Weight source settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetsConfig {
    /// JSON map or two-column CSV export.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Treat the file as normalized fractions instead of integer scores.
    #[serde(default)]
    pub shares: bool,
}

/// Task-board settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_due_string")]
    pub due_string: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timeshare/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub targets: TargetsConfig,
    #[serde(default)]
    pub board: BoardConfig,
}

fn default_since() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}
fn default_true() -> bool {
    true
}
fn default_due_string() -> String {
    "today".into()
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            since: default_since(),
            workspace_name: String::new(),
            include_running: true,
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            due_string: default_due_string(),
            project_id: None,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
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

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(format!("cannot parse '{value}' as bool: {e}")))?,
                ),
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|e| invalid(format!("cannot parse '{value}' as number: {e}")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ if value.is_empty() => serde_json::Value::Null,
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Location of the config file.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    /// Same as [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| -> CoreError {
            ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message,
            }
            .into()
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if the key is
    /// unknown or the value does not fit the field.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownKey`] or [`ConfigError::InvalidValue`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Target file path, required for a sync run.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingKey`] if `targets.path` is unset.
    pub fn targets_path(&self) -> Result<&Path, ConfigError> {
        self.targets
            .path
            .as_deref()
            .ok_or_else(|| ConfigError::MissingKey("targets.path".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.tracking.since, default_since());
        assert_eq!(parsed.board.due_string, "today");
        assert!(parsed.targets.path.is_none());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert!(parsed.tracking.include_running);
        assert!(!parsed.targets.shares);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("board.due_string").as_deref(), Some("today"));
        assert_eq!(cfg.get("tracking.include_running").as_deref(), Some("true"));
        assert_eq!(
            cfg.get("tracking.since").as_deref(),
            Some("2021-01-01T00:00:00Z")
        );
        assert!(cfg.get("board.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("tracking.include_running", "false").unwrap();
        cfg.set("tracking.workspace_name", "Personal").unwrap();
        cfg.set("targets.path", "/tmp/weights.csv").unwrap();
        cfg.set("tracking.since", "2024-03-01T00:00:00Z").unwrap();

        assert!(!cfg.tracking.include_running);
        assert_eq!(cfg.tracking.workspace_name, "Personal");
        assert_eq!(cfg.targets.path, Some(PathBuf::from("/tmp/weights.csv")));
        assert_eq!(cfg.tracking.since.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("board.nonexistent_key", "value").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("targets.shares", "not_a_bool").is_err());
        assert!(cfg.set("tracking.since", "yesterday").is_err());
        // A failed set leaves the config untouched.
        assert_eq!(cfg.tracking.since, default_since());
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let first = Config::load_from(&path).unwrap();
        assert!(path.exists(), "defaults are written on first load");
        assert_eq!(first.board.due_string, "today");

        let mut cfg = first.clone();
        cfg.set("board.due_string", "tomorrow").unwrap();
        cfg.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.board.due_string, "tomorrow");
    }

    #[test]
    fn load_from_reports_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tracking = 3").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::LoadFailed { .. })));
    }

    #[test]
    fn targets_path_required() {
        let cfg = Config::default();
        assert!(matches!(cfg.targets_path(), Err(ConfigError::MissingKey(_))));
    }
}
