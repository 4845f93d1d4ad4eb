//! Sensor readings and the indoor sensor configuration model.

/// A single reading taken from one sensor.
///
/// Indoor samples carry all three fields; outdoor samples only carry a
/// temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
    /// Hectopascal
    pub pressure: Option<f64>,
}

impl Sample {
    pub fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            temperature,
            humidity: Some(humidity),
            pressure: Some(pressure),
        }
    }

    pub fn temperature_only(temperature: f64) -> Self {
        Self {
            temperature,
            humidity: None,
            pressure: None,
        }
    }
}

/// Hardware oversampling applied to each measured quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Oversampling {
    /// Measurement skipped
    Off,
    X1,
    X2,
    X4,
    #[default]
    X8,
    X16,
}

impl Oversampling {
    pub const ALL: [Oversampling; 6] = [
        Oversampling::Off,
        Oversampling::X1,
        Oversampling::X2,
        Oversampling::X4,
        Oversampling::X8,
        Oversampling::X16,
    ];

    /// Parse a multiplier such as `8`. `0` disables the measurement.
    pub fn from_factor(factor: u8) -> Option<Self> {
        match factor {
            0 => Some(Oversampling::Off),
            1 => Some(Oversampling::X1),
            2 => Some(Oversampling::X2),
            4 => Some(Oversampling::X4),
            8 => Some(Oversampling::X8),
            16 => Some(Oversampling::X16),
            _ => None,
        }
    }

    pub fn factor(self) -> u8 {
        match self {
            Oversampling::Off => 0,
            Oversampling::X1 => 1,
            Oversampling::X2 => 2,
            Oversampling::X4 => 4,
            Oversampling::X8 => 8,
            Oversampling::X16 => 16,
        }
    }
}

/// Settings pushed to the indoor sensor on (re)initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndoorSettings {
    pub humidity_oversampling: Oversampling,
    pub temperature_oversampling: Oversampling,
    pub pressure_oversampling: Oversampling,
    pub gas_measurement: bool,
}

impl IndoorSettings {
    /// Same oversampling for every quantity, gas heater disabled.
    pub fn with_oversampling(oversampling: Oversampling) -> Self {
        Self {
            humidity_oversampling: oversampling,
            temperature_oversampling: oversampling,
            pressure_oversampling: oversampling,
            gas_measurement: false,
        }
    }
}

impl Default for IndoorSettings {
    fn default() -> Self {
        Self::with_oversampling(Oversampling::default())
    }
}
