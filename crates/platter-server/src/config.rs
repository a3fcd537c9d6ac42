//! Server configuration.
//!
//! Read from the environment once at startup (after `dotenvy` has run) and
//! passed down explicitly; there is no global settings object.

use std::net::{Ipv4Addr, SocketAddr};

/// Runtime configuration for the server binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection URL (`DATABASE_URL`, required).
    pub database_url: String,
    /// Shared secret clients present in `Authorization` (`API_KEY`, required).
    pub api_key: String,
    /// Socket address to bind (`LISTEN_ADDR`, default `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,
    /// Connection pool size (`POOL_SIZE`, default 16).
    pub pool_size: usize,
}

/// Problems assembling a [`Config`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_POOL_SIZE: usize = 16;

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let api_key = get("API_KEY").ok_or(ConfigError::Missing("API_KEY"))?;

        let listen_addr = match get("LISTEN_ADDR") {
            Some(raw) => raw.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    key: "LISTEN_ADDR",
                    message: e.to_string(),
                }
            })?,
            None => SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
        };

        let pool_size = match get("POOL_SIZE") {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    key: "POOL_SIZE",
                    message: e.to_string(),
                }
            })?,
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Config {
            database_url,
            api_key,
            listen_addr,
            pool_size,
        })
    }
}
