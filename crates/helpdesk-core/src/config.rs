//! Configuration resolution for Helpdesk.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (`<config dir>/helpdesk/settings.json`)
//! 3. Explicit config file (`--config`)
//! 4. Environment variables
//! 5. CLI arguments (applied by the binary, highest priority)

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Signing secret used when nothing else is configured. Never use in production.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Complete Helpdesk configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub database_path: Option<PathBuf>,
    /// Deadline applied to every request, including its repository calls.
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_path: None,
            request_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

/// Token and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub access_ttl_days: i64,
    pub refresh_ttl_days: i64,
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_ttl_days: 1,
            refresh_ttl_days: 30,
            min_password_len: 6,
        }
    }
}

impl AuthConfig {
    /// The configured signing secret, or [`DEV_JWT_SECRET`] with `true` as
    /// the second element when none was configured.
    pub fn secret_or_dev(&self) -> (&str, bool) {
        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => (secret, false),
            _ => (DEV_JWT_SECRET, true),
        }
    }
}

/// Outbound chat notifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<i64>,
    pub queue_capacity: usize,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            telegram_token: None,
            telegram_chat_id: None,
            queue_capacity: 32,
        }
    }
}

impl NotifierConfig {
    /// The notifier only runs when both the bot token and chat are known.
    pub const fn is_enabled(&self) -> bool {
        self.telegram_token.is_some() && self.telegram_chat_id.is_some()
    }
}

impl Config {
    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.server.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.auth.access_ttl_days <= 0 {
            return Err(Error::Config(
                "access_ttl_days must be greater than zero".into(),
            ));
        }
        if self.auth.refresh_ttl_days < self.auth.access_ttl_days {
            return Err(Error::Config(
                "refresh_ttl_days must not be shorter than access_ttl_days".into(),
            ));
        }
        if self.auth.min_password_len == 0 {
            return Err(Error::Config("min_password_len must be at least 1".into()));
        }
        if self.notifier.queue_capacity == 0 {
            return Err(Error::Config(
                "notifier queue_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Load configuration with hierarchical resolution.
///
/// Later sources only override the keys they actually set.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    resolve_config(global_config_path().as_deref(), explicit, |key| {
        std::env::var(key).ok()
    })
}

fn resolve_config(
    global: Option<&Path>,
    explicit: Option<&Path>,
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    let mut merged = serde_json::to_value(Config::default())?;

    if let Some(global_path) = global {
        if global_path.exists() {
            merge_json(&mut merged, load_config_file(global_path)?);
        }
    }

    if let Some(path) = explicit {
        merge_json(&mut merged, load_config_file(path)?);
    }

    let mut config: Config = serde_json::from_value(merged)
        .map_err(|e| Error::Config(format!("Invalid configuration: {e}")))?;

    apply_env_overrides(&mut config, var);

    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("settings.json"))
}

/// Get the default database path for the server.
pub fn database_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("helpdesk.db"))
}

fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("helpdesk"))
}

fn load_config_file(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn merge_json(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("HELPDESK_LISTEN_ADDR") {
        if let Ok(addr) = val.parse() {
            config.server.listen_addr = addr;
        }
    }
    if let Some(val) = var("HELPDESK_DATABASE_PATH") {
        config.server.database_path = Some(PathBuf::from(val));
    }
    if let Some(val) = var("HELPDESK_REQUEST_TIMEOUT_SECS") {
        if let Ok(n) = val.parse() {
            config.server.request_timeout_secs = n;
        }
    }
    if let Some(val) = var("HELPDESK_LOG_LEVEL") {
        config.server.log_level = val;
    }
    if let Some(val) = var("HELPDESK_JWT_SECRET") {
        config.auth.jwt_secret = Some(val);
    }
    if let Some(val) = var("HELPDESK_TELEGRAM_TOKEN") {
        config.notifier.telegram_token = Some(val);
    }
    if let Some(val) = var("HELPDESK_TELEGRAM_CHAT_ID") {
        if let Ok(id) = val.parse() {
            config.notifier.telegram_chat_id = Some(id);
        }
    }
}
