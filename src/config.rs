//! Server configuration from environment variables.

use crate::error::ConfigError;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Which `DocumentStore` implementation backs the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Invalid {
                key: "STORE_BACKEND",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub backend: StoreBackend,
    /// Required for the postgres backend.
    pub database_url: Option<String>,
    /// Schema holding one table per collection.
    pub schema: String,
    pub max_connections: u32,
    /// Seconds a request waits for a pooled connection before failing.
    pub acquire_timeout_secs: u64,
    pub host: IpAddr,
    pub port: u16,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            backend: StoreBackend::Postgres,
            database_url: None,
            schema: "public".into(),
            max_connections: 5,
            acquire_timeout_secs: 5,
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
        None => Ok(default),
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();
        let backend = parse_var(&lookup, "STORE_BACKEND", defaults.backend)?;
        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        if backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        Ok(ServerConfig {
            backend,
            database_url,
            schema: lookup("STORE_SCHEMA")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.schema),
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            acquire_timeout_secs: parse_var(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout_secs)?,
            host: parse_var(&lookup, "HOST", defaults.host)?,
            port: parse_var(&lookup, "PORT", defaults.port)?,
            body_limit_bytes: parse_var(&lookup, "BODY_LIMIT_BYTES", defaults.body_limit_bytes)?,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}
