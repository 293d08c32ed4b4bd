//! Process configuration from environment variables
//!
//! Credentials come from an environment variable or, failing that, from a
//! token file whose path can itself be overridden.

use crate::places::DEFAULT_BASE_URL as DEFAULT_PLACES_URL;
use crate::telegram::DEFAULT_API_URL as DEFAULT_TELEGRAM_URL;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BOT_TOKEN_FILE: &str = "BOT_TOKEN";
const DEFAULT_MAPS_TOKEN_FILE: &str = "MAPS_TOKEN";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not set and token file '{}' could not be read: {source}", .path.display())]
    MissingCredential {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{name} is empty (checked the variable and '{}')", .path.display())]
    EmptyCredential { name: &'static str, path: PathBuf },
    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub api_url: String,
    pub poll_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct PlacesConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub places: PlacesConfig,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let telegram = TelegramConfig {
            token: credential(
                &lookup,
                "TELEGRAM_BOT_TOKEN",
                "BOT_TOKEN_FILE",
                DEFAULT_BOT_TOKEN_FILE,
            )?,
            api_url: lookup("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_URL.to_string()),
            poll_timeout: seconds(&lookup, "TELEGRAM_POLL_TIMEOUT_SECS")?,
        };

        let places = PlacesConfig {
            api_key: credential(
                &lookup,
                "GOOGLE_MAPS_API_KEY",
                "MAPS_TOKEN_FILE",
                DEFAULT_MAPS_TOKEN_FILE,
            )?,
            base_url: lookup("PLACES_BASE_URL").unwrap_or_else(|| DEFAULT_PLACES_URL.to_string()),
            timeout: seconds(&lookup, "PLACES_TIMEOUT_SECS")?,
        };

        Ok(Self { telegram, places })
    }
}

/// Variable first, then the token file; surrounding whitespace is dropped
fn credential(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    file_var: &str,
    default_file: &str,
) -> Result<String, ConfigError> {
    if let Some(value) = lookup(name) {
        let value = value.trim();
        if !value.is_empty() {
            return Ok(value.to_string());
        }
    }

    let path = lookup(file_var).map_or_else(|| PathBuf::from(default_file), PathBuf::from);
    let value = read_token_file(&path).map_err(|source| ConfigError::MissingCredential {
        name,
        path: path.clone(),
        source,
    })?;
    if value.is_empty() {
        return Err(ConfigError::EmptyCredential { name, path });
    }
    Ok(value)
}

fn read_token_file(path: &Path) -> std::io::Result<String> {
    Ok(std::fs::read_to_string(path)?.trim().to_string())
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Duration, ConfigError> {
    let Some(value) = lookup(name) else {
        return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    };
    value
        .trim()
        .parse()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}
