pub mod errors;
pub mod metric;
pub mod ports;
pub mod sensor;
