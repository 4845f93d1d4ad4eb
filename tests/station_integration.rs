use atmo::application::bootstrap::Station;
use atmo::application::indoor::IndoorState;
use atmo::config::Config;
use atmo::domain::ports::MetricSink;
use atmo::domain::sensor::Sample;
use atmo::infrastructure::StatsdEmitter;
use atmo::infrastructure::mock::{
    IndoorRead, MockIndoorDriver, MockIndoorSensor, MockOutdoorDriver, MockOutdoorSensor,
    OpenFailure, RecordingSink,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

fn config(pairs: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

fn indoor_sample() -> Sample {
    Sample::new(21.5, 40.2, 1013.0)
}

#[tokio::test]
async fn test_station_pushes_gauges_over_udp() {
    let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = receiver.local_addr().unwrap().port().to_string();
    let config = config(&[
        ("GRAPHITE_HOST", "127.0.0.1"),
        ("GRAPHITE_PORT", &port),
        ("SENSORS_SAMPLE_INTERVAL", "1"),
    ]);

    let sink: Arc<dyn MetricSink> = Arc::new(StatsdEmitter::from_config(
        &config.collector,
        &config.metrics.prefix,
    ));
    let indoor = MockIndoorDriver::new(MockIndoorSensor::steady(indoor_sample()));
    let outdoor = MockOutdoorDriver::present(MockOutdoorSensor::steady(18.0));

    let mut station = Station::build(&config, &indoor, &outdoor, sink)
        .await
        .expect("station should build");

    // First cycle only; the next one is a second away
    let _ = tokio::time::timeout(Duration::from_millis(500), station.run()).await;

    let mut lines = Vec::new();
    let mut buf = [0u8; 512];
    for _ in 0..4 {
        let (len, _) = tokio::time::timeout(Duration::from_secs(1), receiver.recv_from(&mut buf))
            .await
            .expect("datagram should arrive")
            .unwrap();
        lines.push(String::from_utf8_lossy(&buf[..len]).into_owned());
    }

    assert_eq!(
        lines,
        vec![
            "atmo.humidity:40.2|g",
            "atmo.pressure:1013.0|g",
            "atmo.temperature_indoor:21.5|g",
            "atmo.temperature_outdoor:18.0|g",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_station_waits_for_missing_indoor_sensor() {
    let config = config(&[
        ("GRAPHITE_HOST", "127.0.0.1"),
        ("SENSOR_INDOOR_RETRY_INTERVAL", "0.5"),
    ]);
    let mock = MockIndoorSensor::steady(indoor_sample());
    let indoor = MockIndoorDriver::failing_first(
        mock.clone(),
        vec![OpenFailure::NotFound, OpenFailure::PermissionDenied],
    );
    let outdoor = MockOutdoorDriver::absent();

    let start = tokio::time::Instant::now();
    let station = Station::build(&config, &indoor, &outdoor, Arc::new(RecordingSink::new()))
        .await
        .expect("station should build once the sensor appears");

    assert!(start.elapsed() >= Duration::from_secs(1));
    assert_eq!(indoor.attempts(), 3);
    assert_eq!(indoor.addresses(), vec![0x76; 3]);
    assert!(station.capture().has_indoor());
    assert!(!station.capture().has_outdoor());
    assert_eq!(mock.configure_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_indoor_fault_reinitializes_and_outdoor_keeps_flowing() {
    let config = config(&[
        ("GRAPHITE_HOST", "127.0.0.1"),
        ("SENSORS_SAMPLE_INTERVAL", "1"),
    ]);
    let mock = MockIndoorSensor::scripted(vec![
        IndoorRead::Sample(indoor_sample()),
        IndoorRead::Fault,
        IndoorRead::Sample(indoor_sample()),
    ]);
    let indoor = MockIndoorDriver::new(mock.clone());
    let outdoor = MockOutdoorDriver::present(MockOutdoorSensor::steady(18.0));
    let sink = Arc::new(RecordingSink::new());

    let mut station = Station::build(&config, &indoor, &outdoor, sink.clone())
        .await
        .expect("station should build");

    let _ = tokio::time::timeout(Duration::from_millis(2500), station.run()).await;

    let lines = sink.lines("atmo");
    let count = |name: &str| lines.iter().filter(|l| l.starts_with(name)).count();

    assert_eq!(mock.read_calls(), 3);
    assert_eq!(mock.configure_calls(), 2);
    assert_eq!(count("atmo.temperature_indoor:"), 2);
    assert_eq!(count("atmo.humidity:"), 2);
    assert_eq!(count("atmo.temperature_outdoor:"), 3);
}

#[tokio::test]
async fn test_station_refuses_to_start_without_sensors() {
    let config = config(&[
        ("GRAPHITE_HOST", "127.0.0.1"),
        ("SENSOR_INDOOR_ENABLED", "false"),
    ]);
    let indoor = MockIndoorDriver::new(MockIndoorSensor::default());
    let outdoor = MockOutdoorDriver::absent();

    let result = Station::build(&config, &indoor, &outdoor, Arc::new(RecordingSink::new())).await;

    let err = result.err().expect("build should fail");
    assert!(err.to_string().contains("Unable to acquire any sensor"));
    assert_eq!(indoor.attempts(), 0);
    assert_eq!(outdoor.attempts(), 1);
}

#[test]
fn test_indoor_state_starts_ready() {
    let adapter = atmo::application::indoor::IndoorSensorAdapter::new(Box::new(
        MockIndoorSensor::default(),
    ));
    assert_eq!(adapter.state(), IndoorState::Ready);
}
