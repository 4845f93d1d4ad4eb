//! Scripted sensors and a recording metric sink.
//!
//! Each mock is `Clone` and shares its state, so a test can keep a copy for
//! inspection after handing the other one to the code under test.

use crate::domain::errors::SensorError;
use crate::domain::metric::Metric;
use crate::domain::ports::{
    IndoorSensor, IndoorSensorDriver, MetricSink, OutdoorSensor, OutdoorSensorDriver,
};
use crate::domain::sensor::{IndoorSettings, Sample};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Outcome of one scripted indoor read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndoorRead {
    Sample(Sample),
    NoData,
    Fault,
}

#[derive(Default)]
struct MockIndoorState {
    script: VecDeque<IndoorRead>,
    fallback: Option<IndoorRead>,
    settings: Option<IndoorSettings>,
    configure_calls: usize,
    read_calls: usize,
    fail_configure: bool,
    latency: Duration,
}

#[derive(Clone, Default)]
pub struct MockIndoorSensor {
    state: Arc<Mutex<MockIndoorState>>,
}

impl MockIndoorSensor {
    /// Plays `script` in order, then reports no new data.
    pub fn scripted(script: Vec<IndoorRead>) -> Self {
        let sensor = Self::default();
        lock(&sensor.state).script = script.into();
        sensor
    }

    /// Returns `sample` on every read.
    pub fn steady(sample: Sample) -> Self {
        let sensor = Self::default();
        lock(&sensor.state).fallback = Some(IndoorRead::Sample(sample));
        sensor
    }

    /// Every read takes `latency` of (tokio) time.
    pub fn with_latency(self, latency: Duration) -> Self {
        lock(&self.state).latency = latency;
        self
    }

    pub fn fail_configure(&self, fail: bool) {
        lock(&self.state).fail_configure = fail;
    }

    pub fn configure_calls(&self) -> usize {
        lock(&self.state).configure_calls
    }

    pub fn read_calls(&self) -> usize {
        lock(&self.state).read_calls
    }

    /// Settings from the last successful `configure`.
    pub fn settings(&self) -> Option<IndoorSettings> {
        lock(&self.state).settings
    }
}

#[async_trait]
impl IndoorSensor for MockIndoorSensor {
    async fn configure(&mut self, settings: &IndoorSettings) -> Result<(), SensorError> {
        let mut state = lock(&self.state);
        state.configure_calls += 1;
        if state.fail_configure {
            return Err(SensorError::Io(io::Error::other("mock configure failure")));
        }
        state.settings = Some(*settings);
        Ok(())
    }

    async fn read(&mut self) -> Result<Option<Sample>, SensorError> {
        let (outcome, latency) = {
            let mut state = lock(&self.state);
            state.read_calls += 1;
            let outcome = state
                .script
                .pop_front()
                .or(state.fallback)
                .unwrap_or(IndoorRead::NoData);
            (outcome, state.latency)
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        match outcome {
            IndoorRead::Sample(sample) => Ok(Some(sample)),
            IndoorRead::NoData => Ok(None),
            IndoorRead::Fault => Err(SensorError::Io(io::Error::other("mock I2C fault"))),
        }
    }

    fn describe(&self) -> String {
        "mock-indoor".to_string()
    }
}

/// Scripted open attempt for [`MockIndoorDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFailure {
    NotFound,
    PermissionDenied,
    Broken,
}

impl OpenFailure {
    fn into_error(self) -> SensorError {
        match self {
            OpenFailure::NotFound => SensorError::not_found("mock sensor absent"),
            OpenFailure::PermissionDenied => SensorError::PermissionDenied {
                reason: "mock permission denied".to_string(),
            },
            OpenFailure::Broken => SensorError::Io(io::Error::other("mock bus failure")),
        }
    }
}

#[derive(Clone)]
pub struct MockIndoorDriver {
    sensor: MockIndoorSensor,
    failures: Arc<Mutex<VecDeque<OpenFailure>>>,
    permanent_failure: Option<OpenFailure>,
    attempts: Arc<Mutex<Vec<u8>>>,
}

impl MockIndoorDriver {
    pub fn new(sensor: MockIndoorSensor) -> Self {
        Self {
            sensor,
            failures: Arc::new(Mutex::new(VecDeque::new())),
            permanent_failure: None,
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail the first opens with `failures`, then hand out the sensor.
    pub fn failing_first(sensor: MockIndoorSensor, failures: Vec<OpenFailure>) -> Self {
        let driver = Self::new(sensor);
        *lock(&driver.failures) = failures.into();
        driver
    }

    /// Every open fails with `failure`.
    pub fn always_failing(failure: OpenFailure) -> Self {
        Self {
            permanent_failure: Some(failure),
            ..Self::new(MockIndoorSensor::default())
        }
    }

    pub fn attempts(&self) -> usize {
        lock(&self.attempts).len()
    }

    /// Addresses passed to `open`, in call order.
    pub fn addresses(&self) -> Vec<u8> {
        lock(&self.attempts).clone()
    }
}

#[async_trait]
impl IndoorSensorDriver for MockIndoorDriver {
    async fn open(&self, address: u8) -> Result<Box<dyn IndoorSensor>, SensorError> {
        lock(&self.attempts).push(address);
        if let Some(failure) = self.permanent_failure {
            return Err(failure.into_error());
        }
        if let Some(failure) = lock(&self.failures).pop_front() {
            return Err(failure.into_error());
        }
        Ok(Box::new(self.sensor.clone()))
    }
}

#[derive(Default)]
struct MockOutdoorState {
    temperature: Option<f64>,
    read_calls: usize,
}

#[derive(Clone, Default)]
pub struct MockOutdoorSensor {
    state: Arc<Mutex<MockOutdoorState>>,
}

impl MockOutdoorSensor {
    pub fn steady(temperature: f64) -> Self {
        let sensor = Self::default();
        lock(&sensor.state).temperature = Some(temperature);
        sensor
    }

    /// Every read fails.
    pub fn faulty() -> Self {
        Self::default()
    }

    pub fn read_calls(&self) -> usize {
        lock(&self.state).read_calls
    }
}

#[async_trait]
impl OutdoorSensor for MockOutdoorSensor {
    async fn read_temperature(&mut self) -> Result<f64, SensorError> {
        let mut state = lock(&self.state);
        state.read_calls += 1;
        state
            .temperature
            .ok_or_else(|| SensorError::invalid_data("mock outdoor fault"))
    }

    fn describe(&self) -> String {
        "mock-outdoor".to_string()
    }
}

#[derive(Clone, Default)]
pub struct MockOutdoorDriver {
    sensor: Option<MockOutdoorSensor>,
    attempts: Arc<Mutex<usize>>,
}

impl MockOutdoorDriver {
    pub fn present(sensor: MockOutdoorSensor) -> Self {
        Self {
            sensor: Some(sensor),
            attempts: Arc::default(),
        }
    }

    pub fn absent() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        *lock(&self.attempts)
    }
}

#[async_trait]
impl OutdoorSensorDriver for MockOutdoorDriver {
    async fn open(&self) -> Result<Box<dyn OutdoorSensor>, SensorError> {
        *lock(&self.attempts) += 1;
        match &self.sensor {
            Some(sensor) => Ok(Box::new(sensor.clone())),
            None => Err(SensorError::not_found("no 1-Wire thermometer")),
        }
    }
}

/// Records every metric instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingSink {
    metrics: Arc<Mutex<Vec<Metric>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> Vec<Metric> {
        lock(&self.metrics).clone()
    }

    /// Wire lines of all recorded metrics under `prefix`.
    pub fn lines(&self, prefix: &str) -> Vec<String> {
        lock(&self.metrics)
            .iter()
            .map(|metric| metric.line(prefix))
            .collect()
    }
}

#[async_trait]
impl MetricSink for RecordingSink {
    async fn send(&self, metric: Metric) {
        lock(&self.metrics).push(metric);
    }
}
