//! Runtime configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads `.env` (if present) and builds one `AppConfig` before touching
//! the database or binding the listener. Optional knobs fall back to defaults;
//! only `DATABASE_URL` is mandatory.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RAWG_BASE_URL: &str = "https://api.rawg.io/api";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_RELEASE_CHECK_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_CATALOG_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CATALOG_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Settings for the RAWG catalog client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub static_dir: PathBuf,
    /// Zero disables the background release watcher.
    pub release_check_interval_secs: u64,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `RAWG_API_KEY`: empty when absent (catalog calls will be rejected upstream)
    /// - `RAWG_BASE_URL`: default `https://api.rawg.io/api`
    /// - `STATIC_DIR`: directory holding the SPA shell, default `public`
    /// - `RELEASE_CHECK_INTERVAL_SECS`: default 3600, `0` disables
    /// - `CATALOG_REQUEST_TIMEOUT_SECS` / `CATALOG_CONNECT_TIMEOUT_SECS`
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or `PORT` is not a port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let port = parse_port(std::env::var("PORT").ok().as_deref())?;

        let api_key = std::env::var("RAWG_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            tracing::warn!("RAWG_API_KEY not set; catalog requests will fail");
        }

        let catalog = CatalogConfig {
            api_key,
            base_url: std::env::var("RAWG_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_RAWG_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            request_timeout_secs: env_parse("CATALOG_REQUEST_TIMEOUT_SECS", DEFAULT_CATALOG_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: env_parse("CATALOG_CONNECT_TIMEOUT_SECS", DEFAULT_CATALOG_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self {
            database_url,
            port,
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR)),
            release_check_interval_secs: env_parse(
                "RELEASE_CHECK_INTERVAL_SECS",
                DEFAULT_RELEASE_CHECK_INTERVAL_SECS,
            ),
            catalog,
        })
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(value) => value
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid { var: "PORT", value: value.to_owned() }),
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
