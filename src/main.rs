//! Atmo - headless weather station
//!
//! Samples the indoor BME680 and the outdoor DS18B20 once per interval and
//! pushes the readings as StatsD gauges.
//!
//! # Usage
//! ```sh
//! GRAPHITE_HOST=graphite.local SENSORS_SAMPLE_INTERVAL=60 atmo
//! ```
//!
//! # Environment Variables
//! - `GRAPHITE_HOST` - StatsD collector host (required)
//! - `GRAPHITE_PORT` - StatsD collector port (default: 8125)
//! - `SENSORS_SAMPLE_INTERVAL` - Seconds between samples (default: 5)
//! - `RUST_LOG` - Log filter (default: info)

use anyhow::Result;
use atmo::application::bootstrap::Station;
use atmo::config::Config;
use atmo::domain::ports::MetricSink;
use atmo::infrastructure::bme680::Bme680Driver;
use atmo::infrastructure::{StatsdEmitter, W1ThermDriver};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(e) = run().await {
        error!("{:#}, exiting", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    info!("Atmo {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Collector={}:{}, Interval={:?}, Prefix={}",
        config.collector.host,
        config.collector.port,
        config.sensors.sample_interval,
        config.metrics.prefix
    );

    let sink: Arc<dyn MetricSink> = Arc::new(StatsdEmitter::from_config(
        &config.collector,
        &config.metrics.prefix,
    ));
    let indoor_driver = Bme680Driver::new(config.sensors.indoor_i2c_bus);
    let outdoor_driver = W1ThermDriver::new(&config.sensors.outdoor_w1_path);

    tokio::select! {
        result = async {
            let mut station = Station::build(&config, &indoor_driver, &outdoor_driver, sink).await?;
            info!("Station running. Press Ctrl+C to shutdown.");
            station.run().await;
            Ok::<(), anyhow::Error>(())
        } => result,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown signal received. Exiting...");
            Ok(())
        }
    }
}
