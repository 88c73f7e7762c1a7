//! TOML-based application configuration.
//!
//! Stores:
//! - Chat backend location, endpoints and network limits
//! - Local assistant behavior (simulated latency, history window, seed)
//! - Defaults for new alarms
//!
//! Configuration is stored at `~/.config/daymate/config.toml`. The
//! `DAYMATE_BACKEND_URL`, `DAYMATE_BACKEND_TIMEOUT_MS` and
//! `DAYMATE_MAX_RETRIES` environment variables override the file in
//! [`Config::load_or_default`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::data_dir;
use crate::alarm::{AlarmSound, AlarmTime};
use crate::error::{BackendError, ConfigError, CoreError, Result};

/// Chat backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_endpoint")]
    pub chat_endpoint: String,
    #[serde(default = "default_suggestions_endpoint")]
    pub suggestions_endpoint: String,
    #[serde(default = "default_health_endpoint")]
    pub health_endpoint: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Only the health probe retries; chat and suggestions are single-shot.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Local assistant configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Send messages to the backend instead of the built-in responder.
    #[serde(default = "default_true")]
    pub use_backend: bool,
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Number of previous messages sent as history with each chat request.
    #[serde(default = "default_history_len")]
    pub history_len: usize,
    /// Fixed seed for response selection (random when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Defaults applied to new alarms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmDefaults {
    #[serde(default)]
    pub default_time: AlarmTime,
    #[serde(default)]
    pub default_sound: AlarmSound,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/daymate/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub alarms: AlarmDefaults,
}

fn default_base_url() -> String {
    "http://192.168.1.6:5004".into()
}
fn default_chat_endpoint() -> String {
    "/chat".into()
}
fn default_suggestions_endpoint() -> String {
    "/suggestions".into()
}
fn default_health_endpoint() -> String {
    "/health".into()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_max_retries() -> u32 {
    3
}
fn default_true() -> bool {
    true
}
fn default_min_delay_ms() -> u64 {
    1000
}
fn default_max_delay_ms() -> u64 {
    3000
}
fn default_history_len() -> usize {
    5
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_endpoint: default_chat_endpoint(),
            suggestions_endpoint: default_suggestions_endpoint(),
            health_endpoint: default_health_endpoint(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            use_backend: true,
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            history_len: default_history_len(),
            seed: None,
        }
    }
}

impl Default for AlarmDefaults {
    fn default() -> Self {
        Self {
            default_time: AlarmTime::default(),
            default_sound: AlarmSound::Gentle,
        }
    }
}

impl BackendConfig {
    fn endpoint_url(&self, endpoint: &str) -> Result<Url, BackendError> {
        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), endpoint);
        Url::parse(&raw).map_err(|source| BackendError::InvalidUrl { url: raw, source })
    }

    pub fn chat_url(&self) -> Result<Url, BackendError> {
        self.endpoint_url(&self.chat_endpoint)
    }

    pub fn suggestions_url(&self) -> Result<Url, BackendError> {
        self.endpoint_url(&self.suggestions_endpoint)
    }

    pub fn health_url(&self) -> Result<Url, BackendError> {
        self.endpoint_url(&self.health_endpoint)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl AssistantConfig {
    /// Simulated latency bounds, normalized so `min <= max`.
    pub fn delay_range(&self) -> (Duration, Duration) {
        let lo = self.min_delay_ms.min(self.max_delay_ms);
        let hi = self.min_delay_ms.max(self.max_delay_ms);
        (Duration::from_millis(lo), Duration::from_millis(hi))
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

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        // assistant.seed is skipped when unset, so it is the one optional leaf.
        let existing = match obj.get(leaf) {
            Some(v) => v.clone(),
            None if key == "assistant.seed" => serde_json::Value::Null,
            None => return Err(unknown()),
        };

        let new_value = match &existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) | serde_json::Value::Null => {
                if key == "assistant.seed" && value.eq_ignore_ascii_case("none") {
                    serde_json::Value::Null
                } else {
                    let n = value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    // TOML integers are signed 64-bit.
                    if i64::try_from(n).is_err() {
                        return Err(invalid(format!("'{value}' exceeds {}", i64::MAX)));
                    }
                    serde_json::Value::Number(n.into())
                }
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is
    /// missing. Environment overrides are not applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Effective runtime configuration: the file (or defaults on error)
    /// with environment overrides applied. Never fails.
    pub fn load_or_default() -> Self {
        let mut cfg = Self::load().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default configuration");
            Self::default()
        });
        cfg.apply_overrides(|name| std::env::var(name).ok());
        cfg
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Apply environment-style overrides. `lookup` maps a variable name to
    /// its value; unparsable numbers are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DAYMATE_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(raw) = lookup("DAYMATE_BACKEND_TIMEOUT_MS") {
            match raw.parse() {
                Ok(ms) => self.backend.timeout_ms = ms,
                Err(_) => warn!(value = %raw, "ignoring invalid DAYMATE_BACKEND_TIMEOUT_MS"),
            }
        }
        if let Some(raw) = lookup("DAYMATE_MAX_RETRIES") {
            match raw.parse() {
                Ok(n) => self.backend.max_retries = n,
                Err(_) => warn!(value = %raw, "ignoring invalid DAYMATE_MAX_RETRIES"),
            }
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field (including malformed alarm times and sounds).
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| {
            CoreError::from(ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.backend.base_url, "http://192.168.1.6:5004");
        assert_eq!(cfg.backend.timeout_ms, 10_000);
        assert_eq!(cfg.backend.max_retries, 3);
        assert_eq!(cfg.assistant.history_len, 5);
        assert_eq!(cfg.assistant.min_delay_ms, 1000);
        assert_eq!(cfg.assistant.max_delay_ms, 3000);
        assert_eq!(cfg.alarms.default_time.to_string(), "07:00");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[backend]\nbase_url = \"http://localhost:9000\"\n").unwrap();
        assert_eq!(parsed.backend.base_url, "http://localhost:9000");
        assert_eq!(parsed.backend.chat_endpoint, "/chat");
        assert!(parsed.assistant.use_backend);
    }

    #[test]
    fn endpoint_urls_join_base_and_path() {
        let mut backend = BackendConfig::default();
        backend.base_url = "http://localhost:5004/".into();
        assert_eq!(backend.chat_url().unwrap().as_str(), "http://localhost:5004/chat");
        assert_eq!(backend.health_url().unwrap().path(), "/health");

        backend.base_url = "not a url".into();
        assert!(matches!(backend.chat_url(), Err(BackendError::InvalidUrl { .. })));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("backend.timeout_ms").as_deref(), Some("10000"));
        assert_eq!(cfg.get("assistant.use_backend").as_deref(), Some("true"));
        assert_eq!(cfg.get("alarms.default_time").as_deref(), Some("07:00"));
        assert!(cfg.get("backend").is_none());
        assert!(cfg.get("backend.missing").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("assistant.use_backend", "false").unwrap();
        cfg.set("backend.max_retries", "5").unwrap();
        cfg.set("backend.base_url", "http://10.0.0.2:5004").unwrap();
        cfg.set("alarms.default_sound", "nature").unwrap();
        assert!(!cfg.assistant.use_backend);
        assert_eq!(cfg.backend.max_retries, 5);
        assert_eq!(cfg.backend.base_url, "http://10.0.0.2:5004");
        assert_eq!(cfg.alarms.default_sound, AlarmSound::Nature);
    }

    #[test]
    fn set_optional_seed() {
        let mut cfg = Config::default();
        cfg.set("assistant.seed", "42").unwrap();
        assert_eq!(cfg.assistant.seed, Some(42));
        cfg.set("assistant.seed", "none").unwrap();
        assert_eq!(cfg.assistant.seed, None);
    }

    #[test]
    fn set_rejects_integers_toml_cannot_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();

        let err = cfg.set("assistant.seed", &u64::MAX.to_string()).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg.assistant.seed, None);
        assert!(cfg.set("backend.timeout_ms", "9223372036854775808").is_err());

        cfg.set("assistant.seed", &i64::MAX.to_string()).unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().assistant.seed, Some(i64::MAX as u64));
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("backend.nonexistent", "1").is_err());
        assert!(cfg.set("assistant.use_backend", "maybe").is_err());
        assert!(cfg.set("backend.timeout_ms", "soon").is_err());
        assert!(cfg.set("alarms.default_time", "31:00").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DAYMATE_BACKEND_URL", "http://127.0.0.1:8080"),
            ("DAYMATE_BACKEND_TIMEOUT_MS", "250"),
            ("DAYMATE_MAX_RETRIES", "not-a-number"),
        ]);
        let mut cfg = Config::default();
        cfg.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(cfg.backend.base_url, "http://127.0.0.1:8080");
        assert_eq!(cfg.backend.timeout_ms, 250);
        assert_eq!(cfg.backend.max_retries, 3);
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.assistant.seed = Some(7);
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn delay_range_is_normalized() {
        let mut assistant = AssistantConfig::default();
        assistant.min_delay_ms = 500;
        assistant.max_delay_ms = 100;
        let (lo, hi) = assistant.delay_range();
        assert_eq!(lo, Duration::from_millis(100));
        assert_eq!(hi, Duration::from_millis(500));
    }
}
