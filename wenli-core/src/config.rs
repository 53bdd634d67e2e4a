//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "app": { "namespace": "wenli_wallet", "strictStorage": true, "trendDays": 7 }
//! }
//! ```
//! Fields the wallet does not manage are kept as-is when saving.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::statistics::{DEFAULT_TREND_DAYS, MAX_TREND_DAYS};
use crate::services::{CorruptDataPolicy, DEFAULT_NAMESPACE};

/// File name of the settings file inside the data directory
pub const SETTINGS_FILENAME: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strict_storage: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trend_days: Option<u32>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Wallet configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix of every storage key
    pub namespace: String,
    /// Fail on unparsable stored data instead of reading it as empty
    pub strict_storage: bool,
    /// Length of the daily trend window
    pub trend_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            strict_storage: true,
            trend_days: DEFAULT_TREND_DAYS,
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or unparsable settings file yields the defaults. The
    /// namespace and storage strictness can be overridden with
    /// WENLI_NAMESPACE and WENLI_STRICT_STORAGE. A `trendDays` outside
    /// `1..=MAX_TREND_DAYS` falls back to the default.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        let defaults = Config::default();

        let namespace = match std::env::var("WENLI_NAMESPACE") {
            Ok(ns) if !ns.trim().is_empty() => ns.trim().to_string(),
            _ => raw
                .app
                .namespace
                .filter(|ns| !ns.trim().is_empty())
                .unwrap_or(defaults.namespace),
        };

        let strict_storage = std::env::var("WENLI_STRICT_STORAGE")
            .ok()
            .and_then(|value| parse_flag(&value))
            .or(raw.app.strict_storage)
            .unwrap_or(defaults.strict_storage);

        let trend_days = match raw.app.trend_days {
            Some(days) if (1..=MAX_TREND_DAYS).contains(&days) => days,
            Some(days) => {
                tracing::warn!(
                    trend_days = days,
                    max = MAX_TREND_DAYS,
                    "trendDays out of range, using default"
                );
                defaults.trend_days
            }
            None => defaults.trend_days,
        };

        Ok(Self {
            namespace,
            strict_storage,
            trend_days,
        })
    }

    /// Save config to the data directory
    /// Preserves other settings the wallet doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;

        settings.app.namespace = Some(self.namespace.clone());
        settings.app.strict_storage = Some(self.strict_storage);
        settings.app.trend_days = Some(self.trend_days);

        let settings_path = data_dir.join(SETTINGS_FILENAME);
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {}", settings_path.display()))?;
        Ok(())
    }

    /// How unparsable stored values are handled
    pub fn corrupt_policy(&self) -> CorruptDataPolicy {
        if self.strict_storage {
            CorruptDataPolicy::Fail
        } else {
            CorruptDataPolicy::TreatAsEmpty
        }
    }
}

/// Accepted spellings of a boolean environment override
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILENAME);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    match serde_json::from_str(&content) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            tracing::warn!(path = %settings_path.display(), error = %e, "ignoring unparsable settings");
            Ok(SettingsFile::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    use super::*;
    use tempfile::tempdir;

    /// Tests that load config share the process environment
    fn env_lock() -> MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_env() {
        std::env::remove_var("WENLI_NAMESPACE");
        std::env::remove_var("WENLI_STRICT_STORAGE");
    }

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let raw = read_settings(dir.path()).unwrap();
        assert!(raw.app.namespace.is_none());

        let config = Config::default();
        assert_eq!(config.namespace, "wenli_wallet");
        assert!(config.strict_storage);
        assert_eq!(config.trend_days, 7);
        assert_eq!(config.corrupt_policy(), CorruptDataPolicy::Fail);
    }

    #[test]
    fn test_unparsable_settings_fall_back() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILENAME), "{ nope").unwrap();
        let raw = read_settings(dir.path()).unwrap();
        assert!(raw.app.trend_days.is_none());
    }

    #[test]
    fn test_save_preserves_unknown_fields() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{"app":{"theme":"dark","trendDays":14},"desktop":{"width":800}}"#,
        )
        .unwrap();

        let config = Config {
            namespace: "test_ns".to_string(),
            strict_storage: false,
            trend_days: 30,
        };
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(SETTINGS_FILENAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["app"]["theme"], "dark");
        assert_eq!(saved["app"]["namespace"], "test_ns");
        assert_eq!(saved["app"]["strictStorage"], false);
        assert_eq!(saved["app"]["trendDays"], 30);
        assert_eq!(saved["desktop"]["width"], 800);
    }

    #[test]
    fn test_load_trend_days() {
        let _guard = env_lock();
        clear_env();
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILENAME), r#"{"app":{"trendDays":30}}"#).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().trend_days, 30);

        std::fs::write(dir.path().join(SETTINGS_FILENAME), r#"{"app":{"trendDays":0}}"#).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().trend_days, 7);
    }

    #[test]
    fn test_out_of_range_trend_days_fall_back() {
        let _guard = env_lock();
        clear_env();
        let dir = tempdir().unwrap();

        std::fs::write(dir.path().join(SETTINGS_FILENAME), r#"{"app":{"trendDays":366}}"#).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().trend_days, 366);

        std::fs::write(dir.path().join(SETTINGS_FILENAME), r#"{"app":{"trendDays":367}}"#).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().trend_days, 7);

        std::fs::write(dir.path().join(SETTINGS_FILENAME), r#"{"app":{"trendDays":200000000}}"#).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().trend_days, 7);
    }

    #[test]
    fn test_parse_flag_spellings() {
        for value in ["true", "1", "yes", "TRUE", "Yes", " true "] {
            assert_eq!(parse_flag(value), Some(true), "{value}");
        }
        for value in ["false", "0", "no", "FALSE", "No"] {
            assert_eq!(parse_flag(value), Some(false), "{value}");
        }
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let _guard = env_lock();
        clear_env();
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{"app":{"namespace":"from_file","strictStorage":true}}"#,
        )
        .unwrap();

        let from_file = Config::load(dir.path()).unwrap();
        assert_eq!(from_file.namespace, "from_file");
        assert!(from_file.strict_storage);

        std::env::set_var("WENLI_NAMESPACE", " from_env ");
        std::env::set_var("WENLI_STRICT_STORAGE", "no");
        let overridden = Config::load(dir.path()).unwrap();
        clear_env();

        assert_eq!(overridden.namespace, "from_env");
        assert!(!overridden.strict_storage);
        assert_eq!(overridden.corrupt_policy(), CorruptDataPolicy::TreatAsEmpty);
    }

    #[test]
    fn test_blank_or_unknown_env_values_are_ignored() {
        let _guard = env_lock();
        clear_env();
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{"app":{"namespace":"from_file","strictStorage":false}}"#,
        )
        .unwrap();

        std::env::set_var("WENLI_NAMESPACE", "   ");
        std::env::set_var("WENLI_STRICT_STORAGE", "maybe");
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.namespace, "from_file");
        assert!(!config.strict_storage);

        // Blank in the file too: the default namespace
        let empty = tempdir().unwrap();
        std::fs::write(empty.path().join(SETTINGS_FILENAME), r#"{"app":{"namespace":""}}"#).unwrap();
        let config = Config::load(empty.path()).unwrap();
        clear_env();

        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert!(config.strict_storage);
    }

    #[test]
    fn test_strict_env_enables_fail_policy() {
        let _guard = env_lock();
        clear_env();
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILENAME), r#"{"app":{"strictStorage":false}}"#).unwrap();

        std::env::set_var("WENLI_STRICT_STORAGE", "1");
        let config = Config::load(dir.path()).unwrap();
        clear_env();

        assert!(config.strict_storage);
        assert_eq!(config.corrupt_policy(), CorruptDataPolicy::Fail);
    }

    #[test]
    fn test_lenient_policy() {
        let config = Config {
            strict_storage: false,
            ..Config::default()
        };
        assert_eq!(config.corrupt_policy(), CorruptDataPolicy::TreatAsEmpty);
    }
}
