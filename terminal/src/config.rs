//! # Client Configuration
//!
//! Read once at startup from the environment.
//!
//! | Variable                      | Default                       |
//! |-------------------------------|-------------------------------|
//! | `SITE_URL`                    | `http://localhost:5000`       |
//! | `CHAT_AUTO_RECONNECT`         | `true`                        |
//! | `CHAT_RECONNECT_INTERVAL_MS`  | `5000`                        |
//! | `CHAT_MAX_RECONNECT_ATTEMPTS` | `5`                           |
//! | `CHAT_FALLBACK`               | `true`                        |
//! | `SPARKY_TRAINING_FILE`        | `data/custom-responses.json`  |
//! | `CHAT_LOG_DIR`                | `logs`                        |

use crate::services::chat_socket::{ws_url, SocketOptions};
use lib_utils::envs::{get_env, get_env_bool, get_env_parse_or, Error as EnvError};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub site_url: String,
    pub auto_reconnect: bool,
    pub reconnect_interval_ms: u64,
    pub max_reconnect_attempts: u32,
    pub fallback: bool,
    pub training_file: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:5000".to_string(),
            auto_reconnect: true,
            reconnect_interval_ms: 5000,
            max_reconnect_attempts: 5,
            fallback: true,
            training_file: PathBuf::from("data/custom-responses.json"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let site_url = env_or("SITE_URL", defaults.site_url)?
            .trim_end_matches('/')
            .to_string();
        if !site_url.starts_with("http://") && !site_url.starts_with("https://") {
            return Err(format!("SITE_URL must start with http:// or https://, got '{site_url}'"));
        }

        Ok(Self {
            site_url,
            auto_reconnect: get_env_bool("CHAT_AUTO_RECONNECT", defaults.auto_reconnect)
                .map_err(|e| e.to_string())?,
            reconnect_interval_ms: get_env_parse_or(
                "CHAT_RECONNECT_INTERVAL_MS",
                defaults.reconnect_interval_ms,
            )
            .map_err(|e| e.to_string())?,
            max_reconnect_attempts: get_env_parse_or(
                "CHAT_MAX_RECONNECT_ATTEMPTS",
                defaults.max_reconnect_attempts,
            )
            .map_err(|e| e.to_string())?,
            fallback: get_env_bool("CHAT_FALLBACK", defaults.fallback).map_err(|e| e.to_string())?,
            training_file: env_or("SPARKY_TRAINING_FILE", defaults.training_file.display().to_string())?
                .into(),
            log_dir: env_or("CHAT_LOG_DIR", defaults.log_dir.display().to_string())?.into(),
        })
    }

    /// WebSocket endpoint on the configured site.
    pub fn ws_url(&self) -> String {
        ws_url(&self.site_url)
    }

    pub fn socket_options(&self) -> SocketOptions {
        SocketOptions {
            auto_reconnect: self.auto_reconnect,
            reconnect_interval: Duration::from_millis(self.reconnect_interval_ms),
            max_reconnect_attempts: self.max_reconnect_attempts,
            fallback_on_exhaustion: self.fallback,
            ..SocketOptions::new(self.ws_url())
        }
    }
}

fn env_or(name: &'static str, default: String) -> Result<String, String> {
    match get_env(name) {
        Ok(val) if !val.trim().is_empty() => Ok(val.trim().to_string()),
        Ok(_) | Err(EnvError::MissingEnv(_)) => Ok(default),
        Err(e) => Err(e.to_string()),
    }
}
