//! Bosch BME680 environmental sensor on the Raspberry Pi I2C bus.
//!
//! The chip itself is handled by `bosch_bme680` on top of rppal's
//! embedded-hal implementation. Only temperature, humidity and pressure are
//! measured; the gas heater stays off. The driver is blocking, so every
//! device call runs on tokio's blocking pool.

use crate::domain::errors::SensorError;
use crate::domain::ports::{IndoorSensor, IndoorSensorDriver};
use crate::domain::sensor::{IndoorSettings, Oversampling, Sample};
use async_trait::async_trait;
use bosch_bme680::{
    Bme680, BmeError, Configuration, DeviceAddress, Oversampling as ChipOversampling,
};
use rppal::hal::Delay;
use rppal::i2c::{self, I2c};
use std::io;
use std::sync::{Arc, Mutex};

type Device = Bme680<I2c, Delay>;
type DeviceError = BmeError<I2c>;

const PRIMARY_ADDRESS: u8 = 0x76;
const SECONDARY_ADDRESS: u8 = 0x77;
/// Only used for the heater setpoint, and the heater is never enabled
const AMBIENT_TEMPERATURE: i32 = 20;

/// Opens BME680 sensors on one I2C bus (`/dev/i2c-<bus>`).
pub struct Bme680Driver {
    bus: u8,
}

impl Bme680Driver {
    pub fn new(bus: u8) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl IndoorSensorDriver for Bme680Driver {
    async fn open(&self, address: u8) -> Result<Box<dyn IndoorSensor>, SensorError> {
        let bus = self.bus;
        let device = run_blocking(move || open_device(bus, address)).await?;
        Ok(Box::new(Bme680Sensor {
            device: Arc::new(Mutex::new(device)),
            settings: IndoorSettings::default(),
            bus,
            address,
        }))
    }
}

pub struct Bme680Sensor {
    device: Arc<Mutex<Device>>,
    settings: IndoorSettings,
    bus: u8,
    address: u8,
}

impl Bme680Sensor {
    async fn with_device<T, F>(&self, op: F) -> Result<T, SensorError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Device) -> Result<T, SensorError> + Send + 'static,
    {
        let device = Arc::clone(&self.device);
        run_blocking(move || {
            let mut guard = device
                .lock()
                .map_err(|_| SensorError::Io(io::Error::other("BME680 handle poisoned")))?;
            op(&mut *guard)
        })
        .await
    }
}

#[async_trait]
impl IndoorSensor for Bme680Sensor {
    async fn configure(&mut self, settings: &IndoorSettings) -> Result<(), SensorError> {
        let config = configuration(settings)?;
        self.with_device(move |device| device.initialize(&config).map_err(device_error))
            .await?;
        self.settings = *settings;
        Ok(())
    }

    async fn read(&mut self) -> Result<Option<Sample>, SensorError> {
        let settings = self.settings;
        self.with_device(move |device| match device.measure() {
            Ok(data) => Ok(Some(to_sample(
                f64::from(data.temperature),
                f64::from(data.humidity),
                f64::from(data.pressure),
                &settings,
            ))),
            // The chip never flagged new data within the polling window
            Err(BmeError::MeasuringTimeOut) => Ok(None),
            Err(e) => Err(device_error(e)),
        })
        .await
    }

    fn describe(&self) -> String {
        format!("BME680 i2c-{}@{:#04x}", self.bus, self.address)
    }
}

async fn run_blocking<T, F>(op: F) -> Result<T, SensorError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SensorError> + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| SensorError::Io(io::Error::other(e)))?
}

fn open_device(bus: u8, address: u8) -> Result<Device, SensorError> {
    let device_address = device_address(address)?;
    let i2c = I2c::with_bus(bus).map_err(open_error)?;

    Bme680::new(i2c, device_address, Delay::new(), AMBIENT_TEMPERATURE).map_err(|e| match e {
        // A missing device shows up as an unacknowledged transfer
        BmeError::WriteError(err) | BmeError::WriteReadError(err) => {
            SensorError::not_found(format!("no BME680 at {:#04x}: {}", address, err))
        }
        BmeError::UnexpectedChipId(id) => SensorError::not_found(format!(
            "unexpected chip id {:#04x} at {:#04x}",
            id, address
        )),
        other => device_error(other),
    })
}

fn device_address(address: u8) -> Result<DeviceAddress, SensorError> {
    match address {
        PRIMARY_ADDRESS => Ok(DeviceAddress::Primary),
        SECONDARY_ADDRESS => Ok(DeviceAddress::Secondary),
        other => Err(SensorError::Unsupported {
            reason: format!("BME680 answers on 0x76 or 0x77, not {:#04x}", other),
        }),
    }
}

fn configuration(settings: &IndoorSettings) -> Result<Configuration, SensorError> {
    if settings.gas_measurement {
        return Err(SensorError::Unsupported {
            reason: "gas measurement requires a heater profile".to_string(),
        });
    }

    Ok(Configuration {
        temperature_oversampling: chip_oversampling(settings.temperature_oversampling),
        pressure_oversampling: chip_oversampling(settings.pressure_oversampling),
        humidity_oversampling: chip_oversampling(settings.humidity_oversampling),
        gas_config: None,
        ..Configuration::default()
    })
}

fn chip_oversampling(level: Oversampling) -> Option<ChipOversampling> {
    match level {
        Oversampling::Off => None,
        Oversampling::X1 => Some(ChipOversampling::By1),
        Oversampling::X2 => Some(ChipOversampling::By2),
        Oversampling::X4 => Some(ChipOversampling::By4),
        Oversampling::X8 => Some(ChipOversampling::By8),
        Oversampling::X16 => Some(ChipOversampling::By16),
    }
}

/// Quantities measured with oversampling off are left out of the sample.
fn to_sample(temperature: f64, humidity: f64, pressure: f64, settings: &IndoorSettings) -> Sample {
    Sample {
        temperature,
        humidity: (settings.humidity_oversampling != Oversampling::Off).then_some(humidity),
        pressure: (settings.pressure_oversampling != Oversampling::Off).then_some(pressure),
    }
}

fn bus_error(err: i2c::Error) -> SensorError {
    match err {
        i2c::Error::Io(e) => SensorError::Io(e),
        other => SensorError::Io(io::Error::other(other.to_string())),
    }
}

fn open_error(err: i2c::Error) -> SensorError {
    match err {
        i2c::Error::Io(e) => SensorError::from_open_error(e),
        other => SensorError::Unsupported {
            reason: other.to_string(),
        },
    }
}

fn device_error(err: DeviceError) -> SensorError {
    match err {
        BmeError::WriteError(e) | BmeError::WriteReadError(e) => bus_error(e),
        BmeError::UnexpectedChipId(id) => {
            SensorError::invalid_data(format!("unexpected chip id {:#04x}", id))
        }
        BmeError::MeasuringTimeOut => SensorError::invalid_data("measurement timed out"),
        BmeError::Uninitialized => SensorError::Unsupported {
            reason: "BME680 used before initialization".to_string(),
        },
    }
}
