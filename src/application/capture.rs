//! One sampling cycle: read whichever sensors are present and push each
//! reading to the metric sink.

use crate::application::indoor::IndoorSensorAdapter;
use crate::application::outdoor::OutdoorSensorAdapter;
use crate::config::MetricNamesEnvConfig;
use crate::domain::metric::Metric;
use crate::domain::ports::MetricSink;
use std::sync::Arc;
use tracing::{error, warn};

pub struct SampleCapture {
    indoor: Option<IndoorSensorAdapter>,
    outdoor: Option<OutdoorSensorAdapter>,
    sink: Arc<dyn MetricSink>,
    names: MetricNamesEnvConfig,
}

impl SampleCapture {
    pub fn new(
        indoor: Option<IndoorSensorAdapter>,
        outdoor: Option<OutdoorSensorAdapter>,
        sink: Arc<dyn MetricSink>,
        names: MetricNamesEnvConfig,
    ) -> Self {
        Self {
            indoor,
            outdoor,
            sink,
            names,
        }
    }

    pub fn has_indoor(&self) -> bool {
        self.indoor.is_some()
    }

    pub fn has_outdoor(&self) -> bool {
        self.outdoor.is_some()
    }

    pub async fn capture_once(&mut self) {
        // 1. Indoor
        if let Some(indoor) = self.indoor.as_mut() {
            match indoor.read_sample().await {
                Some(sample) => {
                    if let Some(humidity) = sample.humidity {
                        self.sink
                            .send(Metric::gauge(&self.names.humidity, humidity))
                            .await;
                    }
                    if let Some(pressure) = sample.pressure {
                        self.sink
                            .send(Metric::gauge(&self.names.pressure, pressure))
                            .await;
                    }
                    self.sink
                        .send(Metric::gauge(
                            &self.names.temperature_indoor,
                            sample.temperature,
                        ))
                        .await;
                }
                None => error!("Unable to read data from the indoor sensor"),
            }
        }

        // 2. Outdoor, independent of the indoor outcome
        if let Some(outdoor) = self.outdoor.as_mut() {
            match outdoor.read_sample().await {
                Ok(sample) => {
                    self.sink
                        .send(Metric::gauge(
                            &self.names.temperature_outdoor,
                            sample.temperature,
                        ))
                        .await;
                }
                Err(e) => warn!("Unable to read data from the outdoor sensor: {}", e),
            }
        }
    }
}
