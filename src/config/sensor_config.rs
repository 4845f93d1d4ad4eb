//! Sensor configuration parsing from environment variables.
//!
//! Covers the sampling cadence, the indoor BME680 on I2C and the outdoor
//! 1-Wire thermometer.

use super::parse::{self, Lookup};
use crate::domain::sensor::Oversampling;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_INDOOR_I2C_ADDR: u8 = 0x76;
pub const DEFAULT_INDOOR_I2C_BUS: u8 = 1;
pub const DEFAULT_W1_DEVICES_PATH: &str = "/sys/bus/w1/devices";

#[derive(Debug, Clone)]
pub struct SensorEnvConfig {
    pub sample_interval: Duration,

    // Indoor
    pub indoor_enabled: bool,
    pub indoor_i2c_addr: u8,
    pub indoor_i2c_bus: u8,
    pub indoor_oversampling: Oversampling,
    pub indoor_retry_interval: Duration,

    // Outdoor
    pub outdoor_enabled: bool,
    pub outdoor_w1_path: PathBuf,
}

impl Default for SensorEnvConfig {
    fn default() -> Self {
        Self {
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            indoor_enabled: true,
            indoor_i2c_addr: DEFAULT_INDOOR_I2C_ADDR,
            indoor_i2c_bus: DEFAULT_INDOOR_I2C_BUS,
            indoor_oversampling: Oversampling::default(),
            indoor_retry_interval: DEFAULT_SAMPLE_INTERVAL,
            outdoor_enabled: true,
            outdoor_w1_path: PathBuf::from(DEFAULT_W1_DEVICES_PATH),
        }
    }
}

impl SensorEnvConfig {
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let sample_interval =
            parse::parse_seconds(lookup, "SENSORS_SAMPLE_INTERVAL", DEFAULT_SAMPLE_INTERVAL)?;

        let oversampling_factor = parse::parse_or::<u8>(
            lookup,
            "SENSOR_INDOOR_OVERSAMPLING",
            Oversampling::default().factor(),
        )?;
        let indoor_oversampling = Oversampling::from_factor(oversampling_factor).context(
            format!(
                "SENSOR_INDOOR_OVERSAMPLING must be one of 0, 1, 2, 4, 8, 16, got {}",
                oversampling_factor
            ),
        )?;

        Ok(Self {
            sample_interval,
            indoor_enabled: parse::parse_bool(lookup, "SENSOR_INDOOR_ENABLED", true)?,
            indoor_i2c_addr: parse::parse_u8_auto_radix(
                lookup,
                "SENSOR_INDOOR_I2C_ADDR",
                DEFAULT_INDOOR_I2C_ADDR,
            )?,
            indoor_i2c_bus: parse::parse_or(lookup, "SENSOR_INDOOR_I2C_BUS", DEFAULT_INDOOR_I2C_BUS)?,
            indoor_oversampling,
            // Retry at the sampling cadence unless told otherwise
            indoor_retry_interval: parse::parse_seconds(
                lookup,
                "SENSOR_INDOOR_RETRY_INTERVAL",
                sample_interval,
            )?,
            outdoor_enabled: parse::parse_bool(lookup, "SENSOR_OUTDOOR_ENABLED", true)?,
            outdoor_w1_path: PathBuf::from(parse::string_or(
                lookup,
                "SENSOR_OUTDOOR_W1_PATH",
                DEFAULT_W1_DEVICES_PATH,
            )),
        })
    }
}
