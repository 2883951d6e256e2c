// Runtime configuration.
// Reads backend, translation and storage settings from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use reqwest::StatusCode;
use tracing::warn;

use crate::auth::RefreshPolicy;
use crate::error::{MealbookError, Result};
use crate::storage::paths;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TRANSLATE_URL: &str = "https://api.mymemory.translated.net/get";
pub const DEFAULT_TRANSLATION_CACHE_SIZE: usize = 1000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by the API client, translator and persistence layer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL that relative request paths are appended to.
    pub api_url: String,
    /// Translation endpoint queried with `q`, `langpair` and `de`.
    pub translate_url: String,
    /// Contact address sent as `de`; omitted when empty.
    pub contact_email: String,
    /// Statuses that send a request through the refresh cycle.
    pub refresh_policy: RefreshPolicy,
    /// Maximum entries per translation cache level.
    pub translation_cache_size: usize,
    /// Per-request timeout applied by the HTTP client.
    pub timeout: Duration,
    /// Directory holding the persisted key-value file.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            contact_email: String::new(),
            refresh_policy: RefreshPolicy::default(),
            translation_cache_size: DEFAULT_TRANSLATION_CACHE_SIZE,
            timeout: DEFAULT_TIMEOUT,
            data_dir: paths::data_dir(),
        }
    }
}

impl Config {
    /// Build a configuration from `MEALBOOK_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let refresh_policy = match std::env::var("MEALBOOK_REFRESH_STATUSES") {
            Ok(raw) => parse_statuses(&raw)
                .map(RefreshPolicy::new)
                .unwrap_or_else(|e| {
                    warn!("{}, falling back to 401", e);
                    RefreshPolicy::default()
                }),
            Err(_) => defaults.refresh_policy,
        };

        Self {
            api_url: std::env::var("MEALBOOK_API_URL").unwrap_or(defaults.api_url),
            translate_url: std::env::var("MEALBOOK_TRANSLATE_URL")
                .unwrap_or(defaults.translate_url),
            contact_email: std::env::var("MEALBOOK_CONTACT_EMAIL").unwrap_or_default(),
            refresh_policy,
            translation_cache_size: env_or(
                "MEALBOOK_TRANSLATION_CACHE_SIZE",
                DEFAULT_TRANSLATION_CACHE_SIZE,
            )
            .max(1),
            timeout: Duration::from_secs(env_or("MEALBOOK_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs())),
            data_dir: std::env::var("MEALBOOK_DATA_DIR")
                .ok()
                .map(PathBuf::from)
                .or(defaults.data_dir),
        }
    }

    /// Path of the persisted key-value file, if a data directory is known.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.data_dir.as_deref().map(paths::store_path_in)
    }
}

/// Read a numeric variable, warning and using the default when it does not parse.
fn env_or<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Parse a comma separated status list such as `401,403`.
pub fn parse_statuses(raw: &str) -> Result<Vec<StatusCode>> {
    let statuses = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u16>()
                .ok()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .ok_or_else(|| MealbookError::Config(format!("invalid status code {:?}", s)))
        })
        .collect::<Result<Vec<_>>>()?;

    if statuses.is_empty() {
        return Err(MealbookError::Config("empty refresh status list".to_string()));
    }
    Ok(statuses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_statuses() {
        let statuses = parse_statuses("401, 403").unwrap();
        assert_eq!(statuses, vec![StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN]);
    }

    #[test]
    fn test_parse_statuses_rejects_garbage() {
        assert!(parse_statuses("401,abc").is_err());
        assert!(parse_statuses(" , ").is_err());
        assert!(parse_statuses("42").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.translation_cache_size, DEFAULT_TRANSLATION_CACHE_SIZE);
        assert!(config.refresh_policy.triggers(StatusCode::UNAUTHORIZED));
        assert!(!config.refresh_policy.triggers(StatusCode::FORBIDDEN));
    }
}
