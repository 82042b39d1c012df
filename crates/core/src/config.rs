//! Client configuration.
//!
//! Sources, later ones winning: built-in defaults, an optional JSON file,
//! `ARENA_*` environment variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_BASE_URL: &str = "ARENA_BASE_URL";
pub const ENV_POLL_MS: &str = "ARENA_POLL_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server origin; empty means same-origin (browser only).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u32,
    /// Delay of the out-of-cycle poll after a successful load.
    #[serde(default = "default_load_refresh_delay_ms")]
    pub load_refresh_delay_ms: u32,
    /// How long an acknowledged control keeps its transient label.
    #[serde(default = "default_label_reset_delay_ms")]
    pub label_reset_delay_ms: u32,
    /// Path of the diagnostic push channel.
    #[serde(default = "default_push_path")]
    pub push_path: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_poll_interval_ms() -> u32 {
    2000
}

fn default_load_refresh_delay_ms() -> u32 {
    500
}

fn default_label_reset_delay_ms() -> u32 {
    2000
}

fn default_push_path() -> String {
    "/ws".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_ms: default_poll_interval_ms(),
            load_refresh_delay_ms: default_load_refresh_delay_ms(),
            label_reset_delay_ms: default_label_reset_delay_ms(),
            push_path: default_push_path(),
        }
    }
}

impl ClientConfig {
    /// Defaults for a page served by the arena server itself.
    pub fn same_origin() -> Self {
        Self {
            base_url: String::new(),
            ..Self::default()
        }
    }

    pub fn is_same_origin(&self) -> bool {
        self.base_url.is_empty()
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads `path` if given (it must exist), else the default config file if
    /// present, else the built-in defaults. Environment overrides apply last.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path() {
                Some(p) if p.is_file() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        cfg.apply_overrides(|k| std::env::var(k).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url.trim().to_string();
        }
        if let Some(v) = lookup(ENV_POLL_MS) {
            self.poll_interval_ms = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{ENV_POLL_MS}={v:?} is not a number")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be > 0".into()));
        }
        if self.label_reset_delay_ms == 0 {
            return Err(ConfigError::Invalid("label_reset_delay_ms must be > 0".into()));
        }
        let url = self.base_url.as_str();
        if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "base_url must start with http:// or https:// (got {url:?})"
            )));
        }
        Ok(())
    }

    /// Joins `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms as u64)
    }

    pub fn load_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.load_refresh_delay_ms as u64)
    }

    pub fn label_reset_delay(&self) -> Duration {
        Duration::from_millis(self.label_reset_delay_ms as u64)
    }
}

/// `<config dir>/arena/client.json`
#[cfg(not(target_arch = "wasm32"))]
pub fn default_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("arena").join("client.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg = ClientConfig::from_json(r#"{"poll_interval_ms": 500}"#).unwrap();
        assert_eq!(cfg.poll_interval(), Duration::from_millis(500));
        assert_eq!(cfg.load_refresh_delay(), Duration::from_millis(500));
        assert_eq!(cfg.label_reset_delay(), Duration::from_millis(2000));
        assert_eq!(cfg.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn env_overrides_win() {
        let mut cfg = ClientConfig::default();
        cfg.apply_overrides(|k| match k {
            ENV_BASE_URL => Some("https://arena.example/ ".into()),
            ENV_POLL_MS => Some("750".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.base_url, "https://arena.example/");
        assert_eq!(cfg.poll_interval_ms, 750);
        assert_eq!(cfg.url("/api/stats"), "https://arena.example/api/stats");
    }

    #[test]
    fn bad_values_are_rejected() {
        let mut cfg = ClientConfig::default();
        assert!(cfg
            .apply_overrides(|k| (k == ENV_POLL_MS).then(|| "fast".to_string()))
            .is_err());
        assert!(ClientConfig::from_json(r#"{"poll_interval_ms": 0}"#).is_err());
        assert!(ClientConfig::from_json(r#"{"base_url": "ftp://x"}"#).is_err());
        assert!(ClientConfig::from_json("not json").is_err());
    }

    #[test]
    fn same_origin_urls_are_relative() {
        let cfg = ClientConfig::same_origin();
        assert!(cfg.validate().is_ok());
        assert!(cfg.is_same_origin());
        assert_eq!(cfg.url("/api/load-data"), "/api/load-data");
    }
}
