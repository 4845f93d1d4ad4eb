use crate::domain::errors::SensorError;
use crate::domain::metric::Metric;
use crate::domain::sensor::{IndoorSettings, Sample};
use async_trait::async_trait;

/// Opens the indoor environmental sensor on its bus.
#[async_trait]
pub trait IndoorSensorDriver: Send + Sync {
    async fn open(&self, address: u8) -> Result<Box<dyn IndoorSensor>, SensorError>;
}

/// An open indoor sensor.
#[async_trait]
pub trait IndoorSensor: Send {
    async fn configure(&mut self, settings: &IndoorSettings) -> Result<(), SensorError>;

    /// `Ok(None)` when the device has no new data for this measurement.
    async fn read(&mut self) -> Result<Option<Sample>, SensorError>;

    fn describe(&self) -> String;
}

/// Opens the optional outdoor thermometer.
#[async_trait]
pub trait OutdoorSensorDriver: Send + Sync {
    async fn open(&self) -> Result<Box<dyn OutdoorSensor>, SensorError>;
}

#[async_trait]
pub trait OutdoorSensor: Send {
    async fn read_temperature(&mut self) -> Result<f64, SensorError>;

    fn describe(&self) -> String;
}

/// Destination for metrics. Delivery is best-effort, so there is nothing to
/// report back to the caller.
#[async_trait]
pub trait MetricSink: Send + Sync {
    async fn send(&self, metric: Metric);
}
