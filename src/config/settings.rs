//! TOML-based configuration for druidkit.
//!
//! Supports a config file (druidkit.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! broker_url = "http://broker.internal:8082"
//! coordinator_url = "http://coordinator.internal:8081"
//! overlord_url = "http://overlord.internal:8090"
//! retries = 2
//! retry_delay_ms = 500
//! assign_query_ids = true
//!
//! [timeout]
//! connect_secs = 10
//! request_secs = 60
//!
//! [auth]
//! username = "druid_reader"
//! password = "${DRUID_PASSWORD}"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Broker (query) endpoint.
    pub broker_url: String,

    /// Coordinator endpoint, used for metadata discovery.
    pub coordinator_url: String,

    /// Overlord endpoint, used for indexing tasks.
    pub overlord_url: String,

    /// Retries after a failed attempt (so `retries + 1` attempts in total).
    pub retries: u32,

    /// Constant delay between attempts; 0 disables sleeping.
    pub retry_delay_ms: u64,

    /// Add a generated `queryId` to queries whose context has none.
    pub assign_query_ids: bool,

    /// Transport timeouts.
    pub timeout: TimeoutSettings,

    /// Basic authentication.
    pub auth: Option<AuthSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            broker_url: "http://localhost:8082".to_string(),
            coordinator_url: "http://localhost:8081".to_string(),
            overlord_url: "http://localhost:8090".to_string(),
            retries: 2,
            retry_delay_ms: 500,
            assign_query_ids: false,
            timeout: TimeoutSettings::default(),
            auth: None,
        }
    }
}

/// Transport timeout settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutSettings {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Whole-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            request_secs: 60,
        }
    }
}

impl TimeoutSettings {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

/// Basic authentication credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    pub username: String,

    /// Password (supports ${ENV_VAR} expansion).
    pub password: String,
}

impl AuthSettings {
    /// Get the password with environment variables expanded.
    pub fn resolved_password(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.password)
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `DRUIDKIT_CONFIG`
    /// 2. `./druidkit.toml`
    /// 3. `~/.config/druidkit/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("DRUIDKIT_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("druidkit.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("druidkit").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    /// Check that every endpoint is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (key, url) in [
            ("broker_url", &self.broker_url),
            ("coordinator_url", &self.coordinator_url),
            ("overlord_url", &self.overlord_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(SettingsError::InvalidConfig(format!(
                    "{} must be an http(s) URL, got '{}'",
                    key, url
                )));
            }
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// `{broker_url}/druid/v2`
    pub fn query_url(&self) -> String {
        join_url(&self.broker_url, "druid/v2")
    }

    /// `{overlord_url}/druid/indexer/v1/task`
    pub fn task_url(&self) -> String {
        join_url(&self.overlord_url, "druid/indexer/v1/task")
    }

    /// `{coordinator_url}/druid/coordinator/v1/datasources`
    pub fn datasources_url(&self) -> String {
        join_url(&self.coordinator_url, "druid/coordinator/v1/datasources")
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
