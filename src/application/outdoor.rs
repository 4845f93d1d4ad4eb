use crate::domain::errors::SensorError;
use crate::domain::ports::{OutdoorSensor, OutdoorSensorDriver};
use crate::domain::sensor::Sample;
use tracing::{debug, info};

/// Optional outdoor thermometer.
pub struct OutdoorSensorAdapter {
    sensor: Box<dyn OutdoorSensor>,
}

impl OutdoorSensorAdapter {
    pub fn new(sensor: Box<dyn OutdoorSensor>) -> Self {
        Self { sensor }
    }

    /// Single attempt to open the sensor. Absence is a normal configuration,
    /// so failures are not reported as errors.
    pub async fn acquire(driver: &dyn OutdoorSensorDriver) -> Option<Self> {
        match driver.open().await {
            Ok(sensor) => {
                info!("OutdoorSensor: Acquired {}", sensor.describe());
                Some(Self::new(sensor))
            }
            Err(e) => {
                debug!("OutdoorSensor: Not available: {}", e);
                None
            }
        }
    }

    pub async fn read_sample(&mut self) -> Result<Sample, SensorError> {
        let temperature = self.sensor.read_temperature().await?;
        Ok(Sample::temperature_only(temperature))
    }

    pub fn describe(&self) -> String {
        self.sensor.describe()
    }
}
