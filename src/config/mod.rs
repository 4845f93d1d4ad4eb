//! Configuration module for Atmo.
//!
//! Configuration is read once from environment variables (optionally seeded
//! from a `.env` file) and is immutable afterwards. It is organized by
//! concern: Sensors, Collector and Metric names.

mod collector_config;
mod metrics_config;
mod parse;
mod sensor_config;

pub use collector_config::CollectorEnvConfig;
pub use metrics_config::MetricNamesEnvConfig;
pub use sensor_config::SensorEnvConfig;

use anyhow::{Context, Result};
use std::env;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub sensors: SensorEnvConfig,
    pub collector: CollectorEnvConfig,
    pub metrics: MetricNamesEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sensors =
            SensorEnvConfig::from_lookup(&lookup).context("Failed to load sensor config")?;
        let collector =
            CollectorEnvConfig::from_lookup(&lookup).context("Failed to load collector config")?;
        let metrics = MetricNamesEnvConfig::from_lookup(&lookup);

        Ok(Self {
            sensors,
            collector,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_from_lookup_defaults() {
        let config = config_from(&[("GRAPHITE_HOST", "10.0.0.2")]).expect("Should parse");
        assert_eq!(config.sensors.sample_interval, Duration::from_secs(5));
        assert_eq!(config.sensors.indoor_i2c_addr, 0x76);
        assert_eq!(config.collector.host, "10.0.0.2");
        assert_eq!(config.collector.port, 8125);
        assert_eq!(config.metrics.prefix, "atmo");
    }

    #[test]
    fn test_config_full_override() {
        let config = config_from(&[
            ("GRAPHITE_HOST", "stats.local"),
            ("GRAPHITE_PORT", "9125"),
            ("GRAPHITE_TIMEOUT", "0.5"),
            ("SENSORS_SAMPLE_INTERVAL", "10"),
            ("SENSOR_INDOOR_I2C_ADDR", "0x77"),
            ("METRICS_PREFIX", "garden"),
            ("METRIC_TEMPERATURE_INDOOR", "t_in"),
        ])
        .expect("Should parse");
        assert_eq!(config.collector.port, 9125);
        assert_eq!(config.collector.timeout, Duration::from_millis(500));
        assert_eq!(config.sensors.sample_interval, Duration::from_secs(10));
        assert_eq!(config.sensors.indoor_i2c_addr, 0x77);
        assert_eq!(config.metrics.prefix, "garden");
        assert_eq!(config.metrics.temperature_indoor, "t_in");
    }

    #[test]
    fn test_config_missing_host_fails() {
        let err = config_from(&[]).unwrap_err();
        assert!(format!("{:#}", err).contains("GRAPHITE_HOST"));
    }

    #[test]
    fn test_config_negative_timeout_fails() {
        assert!(config_from(&[("GRAPHITE_HOST", "h"), ("GRAPHITE_TIMEOUT", "-1")]).is_err());
    }
}
