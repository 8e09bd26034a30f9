//! Scripted sensor for loop tests.

use crate::{EnvSensor, Sample, SensorError};

pub struct MockSensor {
    sample: Sample,
    fail_init: bool,
    fail_read: bool,
    pub init_calls: usize,
    pub read_calls: usize,
}

impl MockSensor {
    /// A sensor that always returns `sample`.
    pub fn ok(sample: Sample) -> Self {
        Self {
            sample,
            fail_init: false,
            fail_read: false,
            init_calls: 0,
            read_calls: 0,
        }
    }

    /// A sensor whose reads always fail.
    pub fn failing_read(sample: Sample) -> Self {
        Self {
            fail_read: true,
            ..Self::ok(sample)
        }
    }

    /// A sensor whose init always fails.
    pub fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::ok(Sample::default())
        }
    }
}

impl EnvSensor for MockSensor {
    fn init(&mut self) -> Result<(), SensorError> {
        self.init_calls += 1;
        if self.fail_init {
            Err(SensorError::Init("mock init failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn read(&mut self) -> Result<Sample, SensorError> {
        self.read_calls += 1;
        if self.fail_read {
            Err(SensorError::Read("mock read failure".to_string()))
        } else {
            Ok(self.sample)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_sensor_returns_its_sample() {
        let sample = Sample {
            temperature: 21.0,
            pressure: 1010.0,
            humidity: 40.0,
        };
        let mut sensor = MockSensor::ok(sample);
        assert!(sensor.init().is_ok());
        assert_eq!(sensor.read().unwrap(), sample);
        assert_eq!(sensor.init_calls, 1);
        assert_eq!(sensor.read_calls, 1);
    }

    #[test]
    fn failing_read_errors_every_time() {
        let mut sensor = MockSensor::failing_read(Sample::default());
        assert!(sensor.init().is_ok());
        assert!(sensor.read().is_err());
        assert!(sensor.read().is_err());
    }
}
