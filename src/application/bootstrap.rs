//! Startup: acquire the sensors, then hand them to the scheduler.

use crate::application::capture::SampleCapture;
use crate::application::indoor::IndoorSensorAdapter;
use crate::application::outdoor::OutdoorSensorAdapter;
use crate::application::scheduler::Scheduler;
use crate::config::Config;
use crate::domain::ports::{IndoorSensorDriver, MetricSink, OutdoorSensorDriver};
use anyhow::{Result, bail};
use std::sync::Arc;
use tracing::{info, warn};

/// The running weather station: acquired sensors plus their schedule.
pub struct Station {
    capture: SampleCapture,
    scheduler: Scheduler,
}

impl Station {
    /// Acquire both sensors.
    ///
    /// The outdoor sensor gets a single attempt. The indoor sensor is waited
    /// for indefinitely while it is merely missing. Fails only when neither
    /// sensor ends up usable.
    pub async fn build(
        config: &Config,
        indoor_driver: &dyn IndoorSensorDriver,
        outdoor_driver: &dyn OutdoorSensorDriver,
        sink: Arc<dyn MetricSink>,
    ) -> Result<Self> {
        let sensors = &config.sensors;

        // 1. Outdoor (optional)
        let outdoor = if sensors.outdoor_enabled {
            OutdoorSensorAdapter::acquire(outdoor_driver).await
        } else {
            info!("Station: Outdoor sensor disabled");
            None
        };

        // 2. Indoor (blocks until present)
        let mut indoor = if sensors.indoor_enabled {
            match IndoorSensorAdapter::acquire(
                indoor_driver,
                sensors.indoor_i2c_addr,
                sensors.indoor_retry_interval,
            )
            .await
            {
                Ok(adapter) => Some(adapter),
                Err(e) => {
                    warn!("Station: Indoor sensor unusable: {}", e);
                    None
                }
            }
        } else {
            info!("Station: Indoor sensor disabled");
            None
        };

        if indoor.is_none() && outdoor.is_none() {
            bail!("Unable to acquire any sensor");
        }

        info!(
            outdoor = outdoor.as_ref().map(|s| s.describe()).as_deref().unwrap_or("none"),
            indoor = indoor.as_ref().map(|s| s.describe()).as_deref().unwrap_or("none"),
            "Sensors acquired"
        );

        // 3. Initial configuration; a failure here is healed on the first read
        if let Some(adapter) = indoor.as_mut() {
            if let Err(e) = adapter.initialize(sensors.indoor_oversampling).await {
                warn!("Station: Indoor sensor initialization failed: {}", e);
            }
        }

        Ok(Self {
            capture: SampleCapture::new(indoor, outdoor, sink, config.metrics.clone()),
            scheduler: Scheduler::new(sensors.sample_interval),
        })
    }

    pub fn capture(&self) -> &SampleCapture {
        &self.capture
    }

    /// Sample and emit forever.
    pub async fn run(&mut self) {
        info!("Station: Sampling every {:?}", self.scheduler.interval());
        self.scheduler.run(&mut self.capture).await;
    }
}
