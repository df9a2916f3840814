//! Server configuration loaded from the environment

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::info;

pub const DEFAULT_DATABASE_URL: &str = "postgresql://demo:password@db:5432/demo";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Where cache entries go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// Redis at the fixed deployment host and port
    Redis,
    /// In-process map, for running without a Redis container
    Memory,
}

impl FromStr for CacheBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            other => bail!("Unknown cache backend: {}", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub cache_backend: CacheBackend,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment...");
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_address = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
            .parse()
            .context("Failed to parse BIND_ADDRESS")?;

        let cache_backend = match lookup("CACHE_BACKEND") {
            Some(value) => value.parse().context("Failed to parse CACHE_BACKEND")?,
            None => CacheBackend::Redis,
        };

        Ok(Config {
            bind_address,
            database_url,
            cache_backend,
        })
    }

    /// Database URL with the password masked, for logging.
    pub fn redacted_database_url(&self) -> String {
        redact_password(&self.database_url)
    }
}

fn redact_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_address, "0.0.0.0:8000".parse().unwrap());
        assert_eq!(config.cache_backend, CacheBackend::Redis);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://notes.db"),
            ("BIND_ADDRESS", "127.0.0.1:9000"),
            ("CACHE_BACKEND", "Memory"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite://notes.db");
        assert_eq!(config.bind_address.port(), 9000);
        assert_eq!(config.cache_backend, CacheBackend::Memory);
    }

    #[test]
    fn test_unknown_cache_backend() {
        let result = Config::from_lookup(lookup_from(&[("CACHE_BACKEND", "memcached")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_bind_address() {
        let result = Config::from_lookup(lookup_from(&[("BIND_ADDRESS", "not-an-address")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_redacted_database_url() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(
            config.redacted_database_url(),
            "postgresql://demo:***@db:5432/demo"
        );
        assert_eq!(redact_password("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            redact_password("postgres://demo@db/demo"),
            "postgres://demo@db/demo"
        );
    }
}
