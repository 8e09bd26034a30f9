mod config;
mod poller;

use crate::config::Config;
use crate::poller::{Poller, bootstrap_step};
use log::info;
use notify::Notifier;
use sensor::Bme280Sensor;
use store::Store;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {}", err);
        eprintln!("Please create a collector/config.toml file or set HOMELOGGER_* variables.");
        eprintln!("See the example config.toml for the required format.");
        std::process::exit(1);
    });

    let transport = config.notify.transport().unwrap_or_else(|err| {
        eprintln!("Invalid notify configuration: {}", err);
        std::process::exit(1);
    });

    let notifier = Notifier::new(transport).unwrap_or_else(|err| {
        eprintln!("Failed to build notification client: {}", err);
        std::process::exit(1);
    });

    let service = config.notify.service.clone();

    // Bootstrap. Either failure below is fatal: without a store or a sensor
    // the loop has nothing to do, so notify the operator once and exit
    // non-zero before any iteration runs.
    let store = match bootstrap_step(
        Store::connect(&config.database.url, config.poll.sql_timeout()).await,
        &notifier,
        &service,
        "failed to connect to database",
    )
    .await
    {
        Ok(store) => store,
        Err(_) => std::process::exit(1),
    };

    let sensor = match bootstrap_step(
        Bme280Sensor::open(&config.sensor.bus, config.sensor.address),
        &notifier,
        &service,
        "failed to open i2c bus",
    )
    .await
    {
        Ok(sensor) => sensor,
        Err(_) => std::process::exit(1),
    };

    info!(
        "polling every {} min, device label {:?}",
        config.poll.interval_minutes, config.poll.device_label
    );

    let mut poller = Poller::new(
        store,
        sensor,
        notifier,
        service,
        config.poll.device_label.clone(),
        config.poll.interval(),
    );

    poller.run().await;
}
