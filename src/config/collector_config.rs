//! Metrics collector (Graphite/StatsD) configuration parsing.

use super::parse::{self, Lookup};
use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8125;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct CollectorEnvConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl CollectorEnvConfig {
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        Ok(Self {
            host: parse::raw(lookup, "GRAPHITE_HOST").context("GRAPHITE_HOST must be set")?,
            port: parse::parse_or(lookup, "GRAPHITE_PORT", DEFAULT_PORT)?,
            timeout: parse::parse_seconds(lookup, "GRAPHITE_TIMEOUT", DEFAULT_TIMEOUT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_is_required() {
        let err = CollectorEnvConfig::from_lookup(&|_| None).unwrap_err();
        assert!(err.to_string().contains("GRAPHITE_HOST"));
    }

    #[test]
    fn test_collector_defaults() {
        let config = CollectorEnvConfig::from_lookup(&|key| match key {
            "GRAPHITE_HOST" => Some("graphite.lan".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.host, "graphite.lan");
        assert_eq!(config.port, 8125);
        assert_eq!(config.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = CollectorEnvConfig::from_lookup(&|key| match key {
            "GRAPHITE_HOST" => Some("graphite.lan".to_string()),
            "GRAPHITE_PORT" => Some("99999".to_string()),
            _ => None,
        });
        assert!(result.is_err());
    }
}
