use crate::error::{PortError, Result};
use crate::ports::{DEFAULT_BATCH_HOST, DEFAULT_HOST, DEFAULT_PORT_COUNT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfig {
    pub host: String,
    pub batch_host: String,
    pub count: usize,
    pub log_level: String,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            batch_host: DEFAULT_BATCH_HOST.into(),
            count: DEFAULT_PORT_COUNT,
            log_level: "warn".into(),
        }
    }
}

impl PortConfig {
    /// Load from the process environment, reading a `.env` file first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let count = match lookup("FREE_PORT_COUNT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| PortError::InvalidCount(raw.clone()))?,
            None => defaults.count,
        };

        Ok(Self {
            host: lookup("FREE_PORT_HOST").unwrap_or(defaults.host),
            batch_host: lookup("FREE_PORT_BATCH_HOST").unwrap_or(defaults.batch_host),
            count,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = PortConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, PortConfig::default());
        assert_eq!(config.count, 10);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.batch_host, "127.0.0.1");
    }

    #[test]
    fn test_env_overrides() {
        let config = PortConfig::from_lookup(lookup_from(&[
            ("FREE_PORT_HOST", "127.0.0.1"),
            ("FREE_PORT_BATCH_HOST", "localhost"),
            ("FREE_PORT_COUNT", " 3 "),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.batch_host, "localhost");
        assert_eq!(config.count, 3);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_count() {
        let err = PortConfig::from_lookup(lookup_from(&[("FREE_PORT_COUNT", "many")])).unwrap_err();
        assert!(matches!(err, PortError::InvalidCount(raw) if raw == "many"));
    }
}
