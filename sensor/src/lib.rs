//! Environmental sensor port and its BME280/I2C adapter.

mod bme280_i2c;
pub mod mock;

pub use bme280_i2c::{BME280_I2C_ADDR, Bme280Sensor};

/// One environmental sample as read from the device.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sample {
    /// Temperature in °C.
    pub temperature: f64,
    /// Barometric pressure in hPa.
    pub pressure: f64,
    /// Relative humidity in %.
    pub humidity: f64,
}

/// Abstraction over the sensor peripheral.
///
/// The bus is opened once at startup; `init` re-initializes the logical
/// sensor session and is called before every `read`.
pub trait EnvSensor {
    fn init(&mut self) -> Result<(), SensorError>;
    fn read(&mut self) -> Result<Sample, SensorError>;
}

#[derive(Debug)]
pub enum SensorError {
    /// Failed to open the bus device.
    Bus(String),
    /// Failed to initialize the sensor session.
    Init(String),
    /// Failed to sample the sensor.
    Read(String),
}

impl std::fmt::Display for SensorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorError::Bus(msg) => write!(f, "i2c bus error: {msg}"),
            SensorError::Init(msg) => write!(f, "sensor init error: {msg}"),
            SensorError::Read(msg) => write!(f, "sensor read error: {msg}"),
        }
    }
}

impl std::error::Error for SensorError {}
