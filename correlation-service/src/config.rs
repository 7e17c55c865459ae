use axum::http::HeaderValue;
use std::{str::FromStr, time::Duration};
use thiserror::Error;

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "https://airadioligy-lab-correlation-f-r3bc.vercel.app",
    "https://airadioligy-lab-correlation-f.vercel.app",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a valid number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("invalid CORS origin {0:?}")]
    InvalidOrigin(String),
}

/// Runtime settings, read from the environment at startup
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<HeaderValue>,
    pub generation: GenerationSettings,
    pub max_upload_bytes: usize,
}

/// Timeout and retry policy around the generation backend
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| HeaderValue::from_static(origin))
                .collect(),
            generation: GenerationSettings::default(),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw)?,
            None => defaults.allowed_origins,
        };

        let generation = GenerationSettings {
            timeout: parse_or(&lookup, "GENERATION_TIMEOUT_SECS", defaults.generation.timeout.as_secs())
                .map(Duration::from_secs)?,
            max_retries: parse_or(&lookup, "GENERATION_MAX_RETRIES", defaults.generation.max_retries)?,
            retry_backoff: parse_or(
                &lookup,
                "GENERATION_RETRY_BACKOFF_MS",
                defaults.generation.retry_backoff.as_millis() as u64,
            )
            .map(Duration::from_millis)?,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            allowed_origins,
            generation,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            // A wildcard cannot be combined with credentialed CORS
            if origin == "*" {
                return Err(ConfigError::InvalidOrigin(origin.to_string()));
            }
            HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))
        })
        .collect()
}
