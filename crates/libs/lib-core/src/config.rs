//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! | Variable             | Default                        |
//! |----------------------|--------------------------------|
//! | `BIND_ADDRESS`       | `0.0.0.0:5000`                 |
//! | `ALLOWED_ORIGINS`    | local dev origins (comma list) |
//! | `BOT_REPLY_DELAY_MS` | `1500`                         |
//! | `CONTACT_INBOX`      | `info@smartscaleai.ai`         |
//! | `STATIC_DIR`         | unset (no static site)         |
//! | `LOG_LEVEL`          | `info`                         |
//!
//! The config is built once in the binary and handed to the server; handlers reach
//! it through axum state.

use crate::error::{AppError, Result};
use lib_utils::envs::{self, get_env_list, get_env_parse_or};
use lib_utils::validation::is_valid_email;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound for the simulated bot "thinking" delay.
const MAX_BOT_REPLY_DELAY_MS: u64 = 60_000;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Socket address the HTTP server binds to
    pub bind_address: String,

    /// Origins allowed by the CORS layer
    pub allowed_origins: Vec<String>,

    /// Delay before the canned bot reply is broadcast
    pub bot_reply_delay_ms: u64,

    /// Address the contact notification would be mailed to
    pub contact_inbox: String,

    /// Built site to serve for unmatched routes
    pub static_dir: Option<PathBuf>,

    /// Log filter level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            allowed_origins: vec![
                "http://localhost:5000".to_string(),
                "http://127.0.0.1:5000".to_string(),
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            bot_reply_delay_ms: 1500,
            contact_inbox: "info@smartscaleai.ai".to_string(),
            static_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails with [`AppError::Config`] when a variable is present but unparseable.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bind_address = envs::get_env("BIND_ADDRESS").unwrap_or(defaults.bind_address);

        let allowed_origins = match get_env_list("ALLOWED_ORIGINS") {
            Ok(origins) if !origins.is_empty() => origins,
            _ => defaults.allowed_origins,
        };

        let bot_reply_delay_ms = get_env_parse_or("BOT_REPLY_DELAY_MS", defaults.bot_reply_delay_ms)
            .map_err(|_| config_error("BOT_REPLY_DELAY_MS must be a valid number of milliseconds"))?;

        let contact_inbox = envs::get_env("CONTACT_INBOX").unwrap_or(defaults.contact_inbox);

        let static_dir = envs::get_env("STATIC_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let log_level = envs::get_env("LOG_LEVEL")
            .map(|s| s.to_lowercase())
            .unwrap_or(defaults.log_level);

        Ok(Self {
            bind_address,
            allowed_origins,
            bot_reply_delay_ms,
            contact_inbox,
            static_dir,
            log_level,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(config_error(format!(
                "BIND_ADDRESS must be a socket address like 0.0.0.0:5000, got '{}'",
                self.bind_address
            )));
        }

        if self.bot_reply_delay_ms > MAX_BOT_REPLY_DELAY_MS {
            return Err(config_error(format!(
                "BOT_REPLY_DELAY_MS must be between 0 and {}",
                MAX_BOT_REPLY_DELAY_MS
            )));
        }

        if !is_valid_email(&self.contact_inbox) {
            return Err(config_error("CONTACT_INBOX must be a valid email address"));
        }

        if let Some(dir) = &self.static_dir {
            if !dir.is_dir() {
                return Err(config_error(format!(
                    "STATIC_DIR '{}' is not a directory",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    pub fn bot_reply_delay(&self) -> Duration {
        Duration::from_millis(self.bot_reply_delay_ms)
    }
}

fn config_error(msg: impl Into<String>) -> AppError {
    AppError::Config(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bot_reply_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_validate_rejects_bad_bind_address() {
        let config = Config {
            bind_address: "localhost".to_string(),
            ..Config::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("BIND_ADDRESS"));
    }

    #[test]
    fn test_validate_rejects_excessive_delay() {
        let config = Config {
            bot_reply_delay_ms: MAX_BOT_REPLY_DELAY_MS + 1,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_inbox() {
        let config = Config {
            contact_inbox: "not-an-email".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "Configuration error: CONTACT_INBOX must be a valid email address"
        );
    }

    #[test]
    fn test_validate_rejects_missing_static_dir() {
        let config = Config {
            static_dir: Some(PathBuf::from("/definitely/not/a/real/site/dir")),
            ..Config::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("STATIC_DIR"));
    }
}
