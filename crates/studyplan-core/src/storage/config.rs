//! TOML-based application configuration.
//!
//! Stores the planner defaults used when a request leaves them out:
//! - Study window start and end
//! - Break length, frequency policy, and optional limits
//! - Default study budget
//! - Export directory
//!
//! Configuration is stored at `~/.config/studyplan/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::plan::{RawPlanInput, DEFAULT_END_TIME, DEFAULT_START_TIME};
use crate::schedule::{BreakFrequency, DEFAULT_BREAK_MINUTES};

/// Planner defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_start_time")]
    pub study_start_time: String,
    #[serde(default = "default_end_time")]
    pub study_end_time: String,
    #[serde(default = "default_break_duration")]
    pub break_duration: u32,
    #[serde(default)]
    pub break_frequency: BreakFrequency,
    #[serde(default)]
    pub max_breaks: Option<u32>,
    /// Total break budget in minutes.
    #[serde(default)]
    pub total_break_time: Option<u32>,
    #[serde(default)]
    pub total_hours: f64,
}

/// Export configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for CSV exports; the working directory when unset.
    #[serde(default)]
    pub directory: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studyplan/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

fn default_start_time() -> String {
    DEFAULT_START_TIME.into()
}
fn default_end_time() -> String {
    DEFAULT_END_TIME.into()
}
fn default_break_duration() -> u32 {
    DEFAULT_BREAK_MINUTES
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            study_start_time: default_start_time(),
            study_end_time: default_end_time(),
            break_duration: default_break_duration(),
            break_frequency: BreakFrequency::Auto,
            max_breaks: None,
            total_break_time: None,
            total_hours: 0.0,
        }
    }
}

impl PlannerConfig {
    /// These defaults as planning input with no subjects, ready to be
    /// overlaid with user input.
    pub fn raw_defaults(&self) -> RawPlanInput {
        RawPlanInput {
            subjects: Vec::new(),
            total_hours: self.total_hours.max(0.0).to_string(),
            note: String::new(),
            study_start_time: self.study_start_time.clone(),
            study_end_time: self.study_end_time.clone(),
            break_duration: self.break_duration.to_string(),
            max_breaks: self.max_breaks.map(|n| n.to_string()).unwrap_or_default(),
            total_break_time: self.total_break_time.map(|n| n.to_string()).unwrap_or_default(),
            break_frequency: self.break_frequency.to_string(),
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
            let unset = value.is_empty() || value.eq_ignore_ascii_case("none");

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                ),
                serde_json::Value::Number(_) if unset => serde_json::Value::Null,
                serde_json::Value::Number(_) => parse_number(value)
                    .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                serde_json::Value::Null if unset => serde_json::Value::Null,
                serde_json::Value::Null => parse_number(value)
                    .unwrap_or_else(|| serde_json::Value::String(value.into())),
                serde_json::Value::String(_) if unset => serde_json::Value::Null,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
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

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
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

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.parse::<u64>() {
        return Some(serde_json::Value::Number(n.into()));
    }
    if let Ok(n) = value.parse::<i64>() {
        return Some(serde_json::Value::Number(n.into()));
    }
    value
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str("[planner]\nbreak_frequency = \"minimal\"\n").unwrap();
        assert_eq!(parsed.planner.break_frequency, BreakFrequency::Minimal);
        assert_eq!(parsed.planner.study_start_time, "08:00");
        assert_eq!(parsed.planner.break_duration, 15);
        assert_eq!(parsed.export.directory, None);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("planner.study_end_time").as_deref(), Some("22:00"));
        assert_eq!(cfg.get("planner.break_duration").as_deref(), Some("15"));
        assert_eq!(cfg.get("planner.break_frequency").as_deref(), Some("auto"));
        assert_eq!(cfg.get("planner.max_breaks").as_deref(), Some("null"));
        assert!(cfg.get("planner.missing_key").is_none());
    }

    #[test]
    fn set_value_updates_number_and_enum() {
        let mut cfg = Config::default();
        cfg.set_value("planner.break_duration", "10").unwrap();
        cfg.set_value("planner.break_frequency", "frequent").unwrap();
        assert_eq!(cfg.planner.break_duration, 10);
        assert_eq!(cfg.planner.break_frequency, BreakFrequency::Frequent);
    }

    #[test]
    fn set_value_sets_and_clears_optional() {
        let mut cfg = Config::default();
        cfg.set_value("planner.max_breaks", "4").unwrap();
        assert_eq!(cfg.planner.max_breaks, Some(4));
        cfg.set_value("planner.max_breaks", "none").unwrap();
        assert_eq!(cfg.planner.max_breaks, None);

        cfg.set_value("export.directory", "/tmp/plans").unwrap();
        assert_eq!(cfg.export.directory.as_deref(), Some("/tmp/plans"));
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("planner.nonexistent_key", "1").is_err());
        assert!(cfg.set_value("", "1").is_err());
    }

    #[test]
    fn set_value_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("planner.break_duration", "long").is_err());
        assert!(cfg.set_value("planner.break_duration", "-5").is_err());
        assert!(cfg.set_value("planner.break_frequency", "sometimes").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set_value("planner.study_start_time", "09:30").unwrap();
        cfg.set_value("planner.total_break_time", "45").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.planner.study_start_time, "09:30");
        assert_eq!(loaded.planner.total_break_time, Some(45));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "planner = 3").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn raw_defaults_resolve_to_configured_request() {
        let mut cfg = Config::default();
        cfg.planner.max_breaks = Some(3);
        cfg.planner.break_frequency = BreakFrequency::Minimal;
        let request = crate::plan::PlanRequest::from_raw(cfg.planner.raw_defaults());
        assert_eq!(request.study_start_time, "08:00");
        assert_eq!(request.total_hours, 0.0);
        assert_eq!(request.breaks.max_breaks, Some(3));
        assert_eq!(request.breaks.total_break_time, None);
        assert_eq!(request.breaks.frequency, BreakFrequency::Minimal);
        assert!(request.subjects.is_empty());
    }
}
