use notify::Transport;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub sensor: SensorConfig,
    pub notify: NotifyConfig,
    pub poll: PollConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    #[serde(default = "default_bus")]
    pub bus: String,
    #[serde(default = "default_address")]
    pub address: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// `"webhook"` or `"push"`.
    pub transport: String,
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_service")]
    pub service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    #[serde(default = "default_sql_timeout_seconds")]
    pub sql_timeout_seconds: u64,
    #[serde(default = "default_device_label")]
    pub device_label: String,
}

fn default_bus() -> String {
    "/dev/i2c-1".to_string()
}

fn default_address() -> u8 {
    sensor::BME280_I2C_ADDR
}

fn default_service() -> String {
    "homelogger".to_string()
}

fn default_interval_minutes() -> u64 {
    5
}

fn default_sql_timeout_seconds() -> u64 {
    5
}

fn default_device_label() -> String {
    "somewhere".to_string()
}

impl Config {
    /// Load configuration from a TOML file with a `HOMELOGGER_`-prefixed
    /// environment overlay.
    pub fn load() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("collector/config").required(false))
            .add_source(config::Environment::separator(
                config::Environment::with_prefix("HOMELOGGER"),
                "_",
            ))
            .build()?;

        settings.try_deserialize()
    }
}

impl NotifyConfig {
    /// Resolve the configured transport strategy.
    pub fn transport(&self) -> Result<Transport, config::ConfigError> {
        match self.transport.as_str() {
            "webhook" => Ok(Transport::Webhook {
                url: self.url.clone(),
            }),
            "push" => Ok(Transport::PushApi {
                url: self.url.clone(),
                token: self.token.clone(),
            }),
            other => Err(config::ConfigError::Message(format!(
                "unknown notify transport {other:?}, expected \"webhook\" or \"push\""
            ))),
        }
    }
}

impl PollConfig {
    /// Get the inter-iteration sleep as a Duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }

    /// Get the per-statement timeout as a Duration
    pub fn sql_timeout(&self) -> Duration {
        Duration::from_secs(self.sql_timeout_seconds)
    }
}
