/// One sensor sample formatted for insertion.
///
/// The display fields (`temperature`, `humidity`, `pressure`) carry 2 decimal
/// places; the `raw_*` fields carry 5. A `Reading` is built once per poll
/// cycle and consumed by exactly one insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub temperature: String,
    pub humidity: String,
    pub pressure: String,
    pub raw_temperature: String,
    pub raw_humidity: String,
    pub raw_pressure: String,
    pub device_hostname: String,
}

impl Reading {
    /// Build a reading from sampled values. Temperature in °C, humidity in
    /// %RH, pressure in hPa.
    pub fn new(device_hostname: &str, temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            temperature: format!("{temperature:.2}"),
            humidity: format!("{humidity:.2}"),
            pressure: format!("{pressure:.2}"),
            raw_temperature: format!("{temperature:.5}"),
            raw_humidity: format!("{humidity:.5}"),
            raw_pressure: format!("{pressure:.5}"),
            device_hostname: device_hostname.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_fields_have_two_decimals() {
        let reading = Reading::new("somewhere", 21.456, 55.7, 1013.2);
        assert_eq!(reading.temperature, "21.46");
        assert_eq!(reading.humidity, "55.70");
        assert_eq!(reading.pressure, "1013.20");
    }

    #[test]
    fn raw_fields_have_five_decimals() {
        let reading = Reading::new("somewhere", 21.456, 55.7, 1013.2);
        assert_eq!(reading.raw_temperature, "21.45600");
        assert_eq!(reading.raw_humidity, "55.70000");
        assert_eq!(reading.raw_pressure, "1013.20000");
    }

    #[test]
    fn zero_values_still_render_fixed_precision() {
        let reading = Reading::new("somewhere", 0.0, 0.0, 0.0);
        assert_eq!(reading.temperature, "0.00");
        assert_eq!(reading.raw_temperature, "0.00000");
        assert_eq!(reading.raw_pressure, "0.00000");
    }

    #[test]
    fn negative_values_keep_their_sign() {
        let reading = Reading::new("balcony", -12.3456789, 40.0, 998.0);
        assert_eq!(reading.temperature, "-12.35");
        assert_eq!(reading.raw_temperature, "-12.34568");
    }

    #[test]
    fn device_label_is_carried_through() {
        let reading = Reading::new("living-room", 20.0, 50.0, 1000.0);
        assert_eq!(reading.device_hostname, "living-room");
    }
}
