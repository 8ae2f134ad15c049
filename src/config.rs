//! Service record configuration.
//!
//! Loaded from `~/.service-record/config.toml`, or from the path in
//! `SERVICE_RECORD_CONFIG`. Every key is optional; a missing file means
//! all defaults.
//!
//! ```toml
//! revision = "v2"
//! storage-root = "/var/lib/service-record"
//! session-ttl-minutes = 60
//!
//! [log]
//! level = "info"
//! format = "json"
//!
//! [prices]
//! standard-digital = 4225
//! standard-printed = 4716
//! full-digital = 4887
//! full-printed = 4887
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::pricing::PriceTable;
use crate::revision::Revision;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "SERVICE_RECORD_CONFIG";

/// Service record configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Which journey revision to serve.
    pub revision: Revision,

    /// Where sessions are stored. Defaults to `~/.service-record/`.
    pub storage_root: Option<PathBuf>,

    /// Where accepted uploads go. Defaults to `<storage-root>/uploads/`.
    pub uploads_root: Option<PathBuf>,

    /// Sessions idle for longer than this are expired.
    pub session_ttl_minutes: u32,

    pub log: LogConfig,

    /// Overrides the revision's price table.
    pub prices: Option<PriceTable>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            revision: Revision::default(),
            storage_root: None,
            uploads_root: None,
            session_ttl_minutes: 60,
            log: LogConfig::default(),
            prices: None,
        }
    }
}

/// Logging settings for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LogConfig {
    /// Filter directive, e.g. `"info"` or `"service_record=debug"`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,

    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl Config {
    /// Load config from `SERVICE_RECORD_CONFIG` or `~/.service-record/config.toml`.
    /// A missing file yields the defaults; an unreadable or invalid one is an error.
    pub fn load() -> Result<Self, String> {
        let path = Self::path().ok_or("could not determine home directory")?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

        Self::parse(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// Parse and check config file contents.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(contents).map_err(|e| e.to_string())?;

        if config.session_ttl_minutes == 0 {
            return Err("session-ttl-minutes must be at least 1".to_string());
        }
        if config.log.level.trim().is_empty() {
            return Err("log.level is empty".to_string());
        }

        Ok(config)
    }

    /// The config file path: `$SERVICE_RECORD_CONFIG` or `~/.service-record/config.toml`.
    pub fn path() -> Option<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|h| h.join(".service-record").join("config.toml"))
    }

    /// Effective price table: the override if present, else the revision's.
    pub fn prices(&self) -> PriceTable {
        self.prices.unwrap_or_else(|| self.revision.default_prices())
    }

    pub fn session_ttl(&self) -> SignedDuration {
        SignedDuration::from_mins(i64::from(self.session_ttl_minutes))
    }
}
