//! Runtime configuration for PebbleNote clients.
//!
//! Read from a JSON file; missing files fall back to defaults and a couple
//! of environment variables can point the mirror elsewhere without editing
//! the file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{mirror_base_url, non_blank};

/// Slot holding the serialized note list.
pub const DEFAULT_NOTES_SLOT: &str = "notes_json";
/// Slot holding the serialized purchase list.
pub const DEFAULT_PURCHASES_SLOT: &str = "purchases_json";

const DEFAULT_MIRROR_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MIRROR_FLUSH_TIMEOUT_MS: u64 = 2_000;

pub const MIRROR_URL_ENV: &str = "PEBBLE_MIRROR_URL";
pub const MIRROR_TOKEN_ENV: &str = "PEBBLE_MIRROR_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_notes_slot")]
    pub notes_slot: String,
    #[serde(default = "default_purchases_slot")]
    pub purchases_slot: String,
    #[serde(default)]
    pub mirror: Option<MirrorConfig>,
    /// How long a short-lived process waits for pending mirror writes
    #[serde(default = "default_mirror_flush_timeout_ms")]
    pub mirror_flush_timeout_ms: u64,
}

/// Remote tree database the notes are mirrored to.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MirrorConfig {
    pub base_url: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_mirror_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for MirrorConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("MirrorConfig")
            .field("base_url", &self.base_url)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notes_slot: default_notes_slot(),
            purchases_slot: default_purchases_slot(),
            mirror: None,
            mirror_flush_timeout_ms: DEFAULT_MIRROR_FLUSH_TIMEOUT_MS,
        }
    }
}

impl MirrorConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
            timeout_secs: DEFAULT_MIRROR_TIMEOUT_SECS,
        }
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load config from `path`, using defaults when the file does not exist.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!("failed to read {}: {error}", path.display()))
        })?;
        let config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!("failed to parse {}: {error}", path.display()))
        })?;
        config.validated()
    }

    /// Apply `PEBBLE_MIRROR_URL` / `PEBBLE_MIRROR_TOKEN` from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = non_blank(lookup(MIRROR_URL_ENV)) {
            match self.mirror.as_mut() {
                Some(mirror) => mirror.base_url = url,
                None => self.mirror = Some(MirrorConfig::new(url)),
            }
        }
        if let Some(token) = non_blank(lookup(MIRROR_TOKEN_ENV)) {
            if let Some(mirror) = self.mirror.as_mut() {
                mirror.auth_token = Some(token);
            }
        }
        self.validated()
    }

    pub const fn mirror_flush_timeout(&self) -> Duration {
        Duration::from_millis(self.mirror_flush_timeout_ms)
    }

    fn validated(mut self) -> Result<Self> {
        self.notes_slot = normalize_slot(&self.notes_slot, "notes_slot")?;
        self.purchases_slot = normalize_slot(&self.purchases_slot, "purchases_slot")?;
        if self.notes_slot == self.purchases_slot {
            return Err(Error::Config(
                "notes_slot and purchases_slot must differ".to_string(),
            ));
        }

        if let Some(mirror) = self.mirror.as_mut() {
            let Some(base_url) = mirror_base_url(&mirror.base_url) else {
                return Err(Error::Config(format!(
                    "mirror base_url must be an http:// or https:// URL, got `{}`",
                    mirror.base_url.trim()
                )));
            };
            mirror.base_url = base_url;
            mirror.auth_token = non_blank(mirror.auth_token.take());
            if mirror.timeout_secs == 0 {
                mirror.timeout_secs = DEFAULT_MIRROR_TIMEOUT_SECS;
            }
        }

        Ok(self)
    }
}

fn normalize_slot(slot: &str, field: &str) -> Result<String> {
    let slot = slot.trim();
    if slot.is_empty() {
        Err(Error::Config(format!("{field} must not be empty")))
    } else {
        Ok(slot.to_string())
    }
}

fn default_notes_slot() -> String {
    DEFAULT_NOTES_SLOT.to_string()
}

fn default_purchases_slot() -> String {
    DEFAULT_PURCHASES_SLOT.to_string()
}

const fn default_mirror_timeout_secs() -> u64 {
    DEFAULT_MIRROR_TIMEOUT_SECS
}

const fn default_mirror_flush_timeout_ms() -> u64 {
    DEFAULT_MIRROR_FLUSH_TIMEOUT_MS
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempdir().unwrap();
        let config = AppConfig::load_from_path(&tmp.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.notes_slot, "notes_json");
        assert_eq!(config.purchases_slot, "purchases_json");
        assert_eq!(config.mirror_flush_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn file_values_are_normalized() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "notes_slot": " demo_notes ",
                "mirror": {"base_url": "https://pebble.example.com/", "auth_token": "  "}
            }"#,
        )
        .unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.notes_slot, "demo_notes");
        let mirror = config.mirror.unwrap();
        assert_eq!(mirror.base_url, "https://pebble.example.com");
        assert_eq!(mirror.auth_token, None);
        assert_eq!(mirror.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn unknown_fields_and_bad_urls_are_rejected() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.json");

        std::fs::write(&path, r#"{"surprise": true}"#).unwrap();
        assert!(matches!(
            AppConfig::load_from_path(&path),
            Err(Error::Config(_))
        ));

        std::fs::write(&path, r#"{"mirror": {"base_url": "pebble.example.com"}}"#).unwrap();
        assert!(AppConfig::load_from_path(&path).is_err());
    }

    #[test]
    fn clashing_slots_are_rejected() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"notes_slot": "x", "purchases_slot": "x"}"#).unwrap();
        assert!(AppConfig::load_from_path(&path).is_err());
    }

    #[test]
    fn env_overrides_create_and_update_mirror() {
        let config = AppConfig::default()
            .with_overrides(|name| match name {
                MIRROR_URL_ENV => Some("http://localhost:9000/".to_string()),
                MIRROR_TOKEN_ENV => Some("secret".to_string()),
                _ => None,
            })
            .unwrap();

        let mirror = config.mirror.unwrap();
        assert_eq!(mirror.base_url, "http://localhost:9000");
        assert_eq!(mirror.auth_token.as_deref(), Some("secret"));
    }

    #[test]
    fn token_without_mirror_is_ignored() {
        let config = AppConfig::default()
            .with_overrides(|name| (name == MIRROR_TOKEN_ENV).then(|| "secret".to_string()))
            .unwrap();
        assert!(config.mirror.is_none());
    }

    #[test]
    fn mirror_debug_redacts_token() {
        let mut mirror = MirrorConfig::new("https://pebble.example.com");
        mirror.auth_token = Some("secret".to_string());
        let debug = format!("{mirror:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
