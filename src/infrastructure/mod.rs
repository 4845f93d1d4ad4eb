//! Concrete adapters: the StatsD transport, sensor drivers and test doubles.

#[cfg(feature = "hardware")]
pub mod bme680;
pub mod mock;
pub mod statsd;
pub mod w1_therm;

pub use statsd::StatsdEmitter;
pub use w1_therm::W1ThermDriver;
