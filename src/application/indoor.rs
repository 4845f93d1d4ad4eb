//! Indoor sensor adapter.
//!
//! Owns the indoor sensor handle for the lifetime of the process and turns
//! driver faults into skipped readings, reinitializing the device after a
//! bus fault so the next cycle starts from a known configuration.

use crate::domain::errors::SensorError;
use crate::domain::ports::{IndoorSensor, IndoorSensorDriver};
use crate::domain::sensor::{IndoorSettings, Oversampling, Sample};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Recovery state of the indoor sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndoorState {
    Ready,
    /// Last read hit a bus fault and reinitialization has not succeeded yet
    Faulted,
    Reinitializing,
}

pub struct IndoorSensorAdapter {
    sensor: Box<dyn IndoorSensor>,
    settings: IndoorSettings,
    state: IndoorState,
}

impl IndoorSensorAdapter {
    pub fn new(sensor: Box<dyn IndoorSensor>) -> Self {
        Self {
            sensor,
            settings: IndoorSettings::default(),
            state: IndoorState::Ready,
        }
    }

    /// Open the indoor sensor, waiting for it as long as it takes.
    ///
    /// Missing devices and permission errors are logged and retried every
    /// `retry_interval`. Any other failure is returned.
    pub async fn acquire(
        driver: &dyn IndoorSensorDriver,
        address: u8,
        retry_interval: Duration,
    ) -> Result<Self, SensorError> {
        loop {
            match driver.open(address).await {
                Ok(sensor) => {
                    info!("IndoorSensor: Acquired {} at {:#04x}", sensor.describe(), address);
                    return Ok(Self::new(sensor));
                }
                Err(e) if e.is_recoverable() => {
                    error!(
                        "IndoorSensor: Sensor not found at {:#04x} ({}). Retrying in {:?}...",
                        address, e, retry_interval
                    );
                    tokio::time::sleep(retry_interval).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Disable the gas heater and apply `oversampling` to humidity,
    /// temperature and pressure.
    pub async fn initialize(&mut self, oversampling: Oversampling) -> Result<(), SensorError> {
        let settings = IndoorSettings::with_oversampling(oversampling);
        self.sensor.configure(&settings).await?;
        self.settings = settings;
        self.state = IndoorState::Ready;
        Ok(())
    }

    /// Take one reading. Never fails: faults and missing data yield `None`.
    pub async fn read_sample(&mut self) -> Option<Sample> {
        if self.state != IndoorState::Ready && !self.reinitialize().await {
            return None;
        }

        match self.sensor.read().await {
            Ok(Some(sample)) => Some(sample),
            Ok(None) => {
                debug!("IndoorSensor: No new data available");
                None
            }
            Err(e) => {
                warn!("IndoorSensor: Read fault ({}), reinitializing", e);
                self.state = IndoorState::Faulted;
                self.reinitialize().await;
                None
            }
        }
    }

    /// Faulted -> Reinitializing -> Ready, or back to Faulted on failure.
    async fn reinitialize(&mut self) -> bool {
        self.state = IndoorState::Reinitializing;
        match self.sensor.configure(&self.settings).await {
            Ok(()) => {
                info!("IndoorSensor: Reinitialized");
                self.state = IndoorState::Ready;
                true
            }
            Err(e) => {
                warn!("IndoorSensor: Reinitialization failed: {}", e);
                self.state = IndoorState::Faulted;
                false
            }
        }
    }

    pub fn state(&self) -> IndoorState {
        self.state
    }

    pub fn describe(&self) -> String {
        self.sensor.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::{
        IndoorRead, MockIndoorDriver, MockIndoorSensor, OpenFailure,
    };

    fn sample() -> Sample {
        Sample::new(21.5, 40.2, 1013.0)
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        for level in Oversampling::ALL {
            let mock = MockIndoorSensor::default();
            let mut adapter = IndoorSensorAdapter::new(Box::new(mock.clone()));

            adapter.initialize(level).await.unwrap();
            let first = mock.settings();
            adapter.initialize(level).await.unwrap();

            assert_eq!(mock.settings(), first);
            assert_eq!(mock.settings(), Some(IndoorSettings::with_oversampling(level)));
            assert_eq!(adapter.state(), IndoorState::Ready);
        }
    }

    #[tokio::test]
    async fn test_read_returns_sample() {
        let mock = MockIndoorSensor::scripted(vec![IndoorRead::Sample(sample())]);
        let mut adapter = IndoorSensorAdapter::new(Box::new(mock));
        assert_eq!(adapter.read_sample().await, Some(sample()));
    }

    #[tokio::test]
    async fn test_no_new_data_yields_none_without_reinit() {
        let mock = MockIndoorSensor::scripted(vec![IndoorRead::NoData]);
        let mut adapter = IndoorSensorAdapter::new(Box::new(mock.clone()));

        assert_eq!(adapter.read_sample().await, None);
        assert_eq!(mock.configure_calls(), 0);
        assert_eq!(adapter.state(), IndoorState::Ready);
    }

    #[tokio::test]
    async fn test_fault_reinitializes_once() {
        let mock = MockIndoorSensor::scripted(vec![
            IndoorRead::Fault,
            IndoorRead::Sample(sample()),
        ]);
        let mut adapter = IndoorSensorAdapter::new(Box::new(mock.clone()));

        assert_eq!(adapter.read_sample().await, None);
        assert_eq!(mock.configure_calls(), 1);
        assert_eq!(mock.read_calls(), 1);
        assert_eq!(adapter.state(), IndoorState::Ready);

        // Healed: next cycle reads normally
        assert_eq!(adapter.read_sample().await, Some(sample()));
        assert_eq!(mock.configure_calls(), 1);
    }

    #[tokio::test]
    async fn test_fault_keeps_applied_oversampling() {
        let mock = MockIndoorSensor::scripted(vec![IndoorRead::Fault]);
        let mut adapter = IndoorSensorAdapter::new(Box::new(mock.clone()));
        adapter.initialize(Oversampling::X2).await.unwrap();

        adapter.read_sample().await;

        assert_eq!(mock.configure_calls(), 2);
        assert_eq!(
            mock.settings(),
            Some(IndoorSettings::with_oversampling(Oversampling::X2))
        );
    }

    #[tokio::test]
    async fn test_failed_reinit_is_retried_next_cycle() {
        let mock = MockIndoorSensor::scripted(vec![
            IndoorRead::Fault,
            IndoorRead::Sample(sample()),
        ]);
        mock.fail_configure(true);
        let mut adapter = IndoorSensorAdapter::new(Box::new(mock.clone()));

        assert_eq!(adapter.read_sample().await, None);
        assert_eq!(adapter.state(), IndoorState::Faulted);

        // Still broken: no read attempted
        assert_eq!(adapter.read_sample().await, None);
        assert_eq!(mock.read_calls(), 1);

        mock.fail_configure(false);
        assert_eq!(adapter.read_sample().await, Some(sample()));
        assert_eq!(adapter.state(), IndoorState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_retries_until_present() {
        let driver = MockIndoorDriver::failing_first(
            MockIndoorSensor::default(),
            vec![OpenFailure::NotFound, OpenFailure::PermissionDenied],
        );
        let retry = Duration::from_secs(3);
        let start = tokio::time::Instant::now();

        let adapter = IndoorSensorAdapter::acquire(&driver, 0x76, retry).await;

        assert!(adapter.is_ok());
        assert_eq!(driver.attempts(), 3);
        assert_eq!(driver.addresses(), vec![0x76, 0x76, 0x76]);
        let waited = start.elapsed();
        assert!(waited >= retry * 2);
        assert!(waited < retry * 2 + Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_gives_up_on_unrecoverable_error() {
        let driver = MockIndoorDriver::always_failing(OpenFailure::Broken);
        let result = IndoorSensorAdapter::acquire(&driver, 0x77, Duration::from_secs(1)).await;

        assert!(matches!(result, Err(SensorError::Io(_))));
        assert_eq!(driver.attempts(), 1);
    }
}
