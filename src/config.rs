//! Service configuration, read from the process environment.

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_PATH: &str = "schools.db";
pub const DEFAULT_LOG_FILTER: &str = "school_registry=info,tower_http=info";

/// Value of `DB_PATH` that selects the in-process store.
pub const IN_MEMORY_DB: &str = ":memory:";

#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    Sqlite(PathBuf),
    InMemory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Address to bind the HTTP listener to
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Where schools are kept
    pub storage: StorageConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            storage: StorageConfig::Sqlite(PathBuf::from(DEFAULT_DB_PATH)),
        }
    }
}

impl ServiceConfig {
    /// Build from `HOST`, `PORT` and `DB_PATH`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let host = lookup("HOST").filter(|h| !h.is_empty()).unwrap_or(defaults.host);
        let port = match lookup("PORT").filter(|p| !p.is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got '{}'", raw))?,
            None => defaults.port,
        };
        let storage = match lookup("DB_PATH").filter(|p| !p.is_empty()) {
            Some(path) if path == IN_MEMORY_DB => StorageConfig::InMemory,
            Some(path) => StorageConfig::Sqlite(PathBuf::from(path)),
            None => defaults.storage,
        };

        Ok(Self { host, port, storage })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.bind_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DB_PATH", "/var/lib/schools/data.db"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.storage, StorageConfig::Sqlite("/var/lib/schools/data.db".into()));
    }

    #[test]
    fn test_in_memory_storage() {
        let config = ServiceConfig::from_lookup(lookup(&[("DB_PATH", ":memory:")])).unwrap();
        assert_eq!(config.storage, StorageConfig::InMemory);
    }

    #[test]
    fn test_bad_port_is_an_error() {
        let err = ServiceConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
