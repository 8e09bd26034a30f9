use crate::{EnvSensor, Sample, SensorError};
use bme280::i2c::BME280;
use linux_embedded_hal::{Delay, I2cdev};
use log::debug;

/// Default BME280 I2C address.
pub const BME280_I2C_ADDR: u8 = 0x76;

/// BME280 behind a Linux I2C character device.
pub struct Bme280Sensor {
    device: BME280<I2cdev>,
    delay: Delay,
}

impl Bme280Sensor {
    /// Open the I2C bus once. The device file is never re-opened; only the
    /// sensor session is re-initialized each cycle via [`EnvSensor::init`].
    pub fn open(bus_path: &str, address: u8) -> Result<Self, SensorError> {
        let i2c = I2cdev::new(bus_path).map_err(|err| SensorError::Bus(err.to_string()))?;
        debug!("opened i2c bus {bus_path}, sensor address 0x{address:02x}");

        Ok(Self {
            device: BME280::new(i2c, address),
            delay: Delay,
        })
    }
}

impl EnvSensor for Bme280Sensor {
    fn init(&mut self) -> Result<(), SensorError> {
        self.device
            .init(&mut self.delay)
            .map_err(|err| SensorError::Init(format!("{err:?}")))
    }

    fn read(&mut self) -> Result<Sample, SensorError> {
        let measurements = self
            .device
            .measure(&mut self.delay)
            .map_err(|err| SensorError::Read(format!("{err:?}")))?;

        Ok(Sample {
            temperature: f64::from(measurements.temperature),
            // The driver reports Pa; the rest of the system speaks hPa.
            pressure: f64::from(measurements.pressure) / 100.0,
            humidity: f64::from(measurements.humidity),
        })
    }
}
