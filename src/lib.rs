//! Atmo, a home weather station for the Raspberry Pi.
//!
//! Samples an indoor environmental sensor (temperature, humidity, pressure) and
//! an optional outdoor 1-Wire thermometer on a fixed cadence, and pushes every
//! reading to a StatsD/Graphite collector as a UDP gauge.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
