//! Metric naming configuration.

use super::parse::{self, Lookup};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricNamesEnvConfig {
    pub prefix: String,
    pub temperature_indoor: String,
    pub temperature_outdoor: String,
    pub pressure: String,
    pub humidity: String,
}

impl Default for MetricNamesEnvConfig {
    fn default() -> Self {
        Self {
            prefix: "atmo".to_string(),
            temperature_indoor: "temperature_indoor".to_string(),
            temperature_outdoor: "temperature_outdoor".to_string(),
            pressure: "pressure".to_string(),
            humidity: "humidity".to_string(),
        }
    }
}

impl MetricNamesEnvConfig {
    pub fn from_lookup(lookup: Lookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            prefix: parse::string_or(lookup, "METRICS_PREFIX", &defaults.prefix),
            temperature_indoor: parse::string_or(
                lookup,
                "METRIC_TEMPERATURE_INDOOR",
                &defaults.temperature_indoor,
            ),
            temperature_outdoor: parse::string_or(
                lookup,
                "METRIC_TEMPERATURE_OUTDOOR",
                &defaults.temperature_outdoor,
            ),
            pressure: parse::string_or(lookup, "METRIC_PRESSURE", &defaults.pressure),
            humidity: parse::string_or(lookup, "METRIC_HUMIDITY", &defaults.humidity),
        }
    }
}
