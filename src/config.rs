// Service configuration, read once at startup
use crate::supplier_client::{ClientConfig, DEFAULT_TIMEOUT_MS};
use thiserror::Error;

pub const ENV_BASE_URL: &str = "HOTEL_BEDS_BASE_URL";
pub const ENV_API_KEY: &str = "HOTEL_BEDS_API_KEY";
pub const ENV_API_SECRET: &str = "HOTEL_BEDS_SECRET";
pub const ENV_TIMEOUT_MS: &str = "SUPPLIER_TIMEOUT_MS";
pub const ENV_PORT: &str = "PORT";

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub supplier: ClientConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, ENV_PORT, DEFAULT_PORT)?;
        let timeout_ms = parse_or(&lookup, ENV_TIMEOUT_MS, DEFAULT_TIMEOUT_MS)?;

        Ok(Self {
            port,
            supplier: ClientConfig {
                base_url: lookup(ENV_BASE_URL).unwrap_or_default(),
                api_key: lookup(ENV_API_KEY).unwrap_or_default(),
                api_secret: lookup(ENV_API_SECRET).unwrap_or_default(),
                timeout_ms,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}
