//! Application configuration.
//!
//! DESIGN
//! ======
//! The whole environment is read exactly once at startup into an
//! `AppConfig` that rides along in `AppState`. Components never reach for
//! `std::env` at request time.

use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_RATE_LIMIT_MAX: u32 = 10;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

/// Typed configuration assembled from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Bearer credential for the external generation service.
    pub gooey_api_key: String,
    /// Generation requests allowed per client per window.
    pub rate_limit_max: u32,
    /// Fixed-window duration for the rate limiter.
    pub rate_limit_window: Duration,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` or `GOOEY_API_KEY` is missing,
    /// or if a numeric override does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let gooey_api_key = required("GOOEY_API_KEY")?;

        Ok(Self {
            database_url,
            port: parsed("PORT", DEFAULT_PORT)?,
            gooey_api_key,
            rate_limit_max: parsed("RATE_LIMIT_MAX", DEFAULT_RATE_LIMIT_MAX)?,
            rate_limit_window: Duration::from_secs(parsed(
                "RATE_LIMIT_WINDOW_SECS",
                DEFAULT_RATE_LIMIT_WINDOW_SECS,
            )?),
            cookie_secure: env_bool("COOKIE_SECURE").unwrap_or(false),
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn parsed<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
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
