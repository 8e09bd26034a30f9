//! The poll loop: the only orchestrator and the only owner of mutable state.
//!
//! Every recoverable failure is handled inside the iteration that saw it;
//! the loop body is the top-level error boundary. An insert is attempted
//! every cycle no matter what the liveness check or the sensor reported.

use log::{debug, error, warn};
use sensor::{EnvSensor, Sample};
use std::time::Duration;
use store::{Reading, Store, StoreError};

/// Persistence seam the loop drives.
pub trait ReadingStore {
    async fn ping(&self) -> Result<(), StoreError>;
    async fn reconnect(&mut self) -> Result<(), StoreError>;
    async fn insert(&self, reading: &Reading) -> Result<u64, StoreError>;
}

impl ReadingStore for Store {
    async fn ping(&self) -> Result<(), StoreError> {
        Store::ping(self).await
    }

    async fn reconnect(&mut self) -> Result<(), StoreError> {
        Store::reconnect(self).await
    }

    async fn insert(&self, reading: &Reading) -> Result<u64, StoreError> {
        Store::insert(self, reading).await
    }
}

/// Alerting seam the loop drives.
pub trait Alerter {
    async fn notify(&self, service: &str, message: &str) -> bool;
}

impl Alerter for notify::Notifier {
    async fn notify(&self, service: &str, message: &str) -> bool {
        notify::Notifier::notify(self, service, message).await
    }
}

/// Gate one bootstrap step. On failure this sends exactly one notification
/// and hands the error back so the caller can terminate before any loop
/// iteration runs.
pub async fn bootstrap_step<T, E, N>(
    result: Result<T, E>,
    alerter: &N,
    service: &str,
    what: &str,
) -> Result<T, E>
where
    E: std::fmt::Display,
    N: Alerter,
{
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            error!("{what}: {err}");
            if !alerter.notify(service, &format!("{what}: {err}")).await {
                error!("failed to deliver bootstrap-failure notification");
            }
            Err(err)
        }
    }
}

pub struct Poller<S, E, N> {
    store: S,
    sensor: E,
    alerter: N,
    service: String,
    device_label: String,
    interval: Duration,
}

impl<S, E, N> Poller<S, E, N>
where
    S: ReadingStore,
    E: EnvSensor,
    N: Alerter,
{
    pub fn new(
        store: S,
        sensor: E,
        alerter: N,
        service: String,
        device_label: String,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            sensor,
            alerter,
            service,
            device_label,
            interval,
        }
    }

    /// Run forever. Only bootstrap failures terminate the process, and those
    /// happen before a `Poller` ever exists.
    pub async fn run(&mut self) {
        loop {
            self.run_once().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One iteration: liveness check, sample, insert.
    pub async fn run_once(&mut self) {
        if let Err(err) = self.store.ping().await {
            warn!("database ping failed: {err}");
            self.alert("database ping failed, will reconnect").await;

            // Lenient on purpose: a failed reconnect keeps the old pool and
            // the iteration carries on; the next cycle retries.
            if let Err(err) = self.store.reconnect().await {
                error!("database reconnect failed: {err}");
            }
        }

        let sample = self.sample().await;
        debug!(
            "temp: {:.2}C, press: {:.2}hPa, hum: {:.2}%",
            sample.temperature, sample.pressure, sample.humidity
        );

        let reading = Reading::new(
            &self.device_label,
            sample.temperature,
            sample.humidity,
            sample.pressure,
        );

        if let Err(err) = self.store.insert(&reading).await {
            error!("failed to insert reading: {err}");
            self.alert(&format!("failed to insert reading: {err}")).await;
        }
    }

    /// Re-initialize and sample the sensor. A failure is alerted but yields
    /// the zero-valued sample so the insert still happens this cycle.
    async fn sample(&mut self) -> Sample {
        let result = self.sensor.init().and_then(|()| self.sensor.read());
        match result {
            Ok(sample) => sample,
            Err(err) => {
                warn!("{err}");
                self.alert("error initializing/reading bme280 sensor").await;
                Sample::default()
            }
        }
    }

    async fn alert(&self, message: &str) {
        if !self.alerter.notify(&self.service, message).await {
            warn!("failed to deliver notification: {message}");
        }
    }
}
