//! DS18B20 thermometer on the Linux 1-Wire sysfs interface.
//!
//! The `w1-therm` kernel module exposes each probe as
//! `<devices>/28-xxxxxxxxxxxx/w1_slave`, whose content looks like:
//!
//! ```text
//! 72 01 4b 46 7f ff 0e 10 57 : crc=57 YES
//! 72 01 4b 46 7f ff 0e 10 57 t=23125
//! ```

use crate::domain::errors::SensorError;
use crate::domain::ports::{OutdoorSensor, OutdoorSensorDriver};
use async_trait::async_trait;
use std::path::PathBuf;

/// 1-Wire family code of the DS18B20
const DS18B20_FAMILY: &str = "28-";
const SLAVE_FILE: &str = "w1_slave";
/// Register content right after power-up, before any conversion
const POWER_ON_RESET_MILLIDEGREES: i64 = 85_000;

pub struct W1ThermDriver {
    devices_path: PathBuf,
}

impl W1ThermDriver {
    pub fn new(devices_path: impl Into<PathBuf>) -> Self {
        Self {
            devices_path: devices_path.into(),
        }
    }
}

#[async_trait]
impl OutdoorSensorDriver for W1ThermDriver {
    /// Picks the first DS18B20 in id order.
    async fn open(&self) -> Result<Box<dyn OutdoorSensor>, SensorError> {
        let mut entries = tokio::fs::read_dir(&self.devices_path)
            .await
            .map_err(SensorError::from_open_error)?;

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(DS18B20_FAMILY) {
                ids.push(name);
            }
        }
        ids.sort();

        let id = ids.into_iter().next().ok_or_else(|| {
            SensorError::not_found(format!(
                "no DS18B20 under {}",
                self.devices_path.display()
            ))
        })?;
        let slave_path = self.devices_path.join(&id).join(SLAVE_FILE);
        Ok(Box::new(W1ThermSensor { id, slave_path }))
    }
}

pub struct W1ThermSensor {
    id: String,
    slave_path: PathBuf,
}

#[async_trait]
impl OutdoorSensor for W1ThermSensor {
    async fn read_temperature(&mut self) -> Result<f64, SensorError> {
        let raw = tokio::fs::read_to_string(&self.slave_path).await?;
        parse_w1_slave(&raw)
    }

    fn describe(&self) -> String {
        format!("DS18B20 {}", self.id)
    }
}

/// Extract degrees Celsius from `w1_slave` content.
pub fn parse_w1_slave(raw: &str) -> Result<f64, SensorError> {
    let mut lines = raw.lines();
    let status = lines
        .next()
        .ok_or_else(|| SensorError::invalid_data("empty w1_slave"))?;
    if !status.trim_end().ends_with("YES") {
        return Err(SensorError::invalid_data("CRC check failed"));
    }

    let data = lines
        .next()
        .ok_or_else(|| SensorError::invalid_data("missing temperature line"))?;
    let (_, value) = data
        .rsplit_once("t=")
        .ok_or_else(|| SensorError::invalid_data("missing t= field"))?;
    let millidegrees: i64 = value
        .trim()
        .parse()
        .map_err(|_| SensorError::invalid_data(format!("bad temperature '{}'", value.trim())))?;

    if millidegrees == POWER_ON_RESET_MILLIDEGREES {
        return Err(SensorError::invalid_data("power-on reset value"));
    }
    Ok(millidegrees as f64 / 1000.0)
}
