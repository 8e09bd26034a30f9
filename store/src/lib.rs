//! MySQL persistence for sensor readings.
//!
//! `Store` owns the only connection pool in the process. The poll loop holds
//! it for the lifetime of the program and swaps the pool through
//! [`Store::reconnect`] when a liveness check fails.

mod reading;

pub use reading::Reading;

use log::{debug, info};
use sqlx::Connection;
use sqlx::mysql::{MySql, MySqlArguments, MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tokio::time::timeout;

/// Parameterized insert for one reading. Values are bound positionally,
/// never interpolated into the statement text.
pub const INSERT_SQL: &str = "INSERT INTO SENSOR_DATAS (
    temperature, humidity, pressure,
    raw_temperature, raw_humidity, raw_pressure,
    device_hostname
) VALUES (?, ?, ?, ?, ?, ?, ?)";

// Pool sizing: up to 4 open connections, 2 kept idle, no lifetime cap.
const MAX_OPEN_CONNS: u32 = 4;
const MAX_IDLE_CONNS: u32 = 2;

#[derive(Debug)]
pub enum StoreError {
    Sqlx(sqlx::Error),
    /// The operation did not complete within the configured statement timeout.
    Timeout,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Sqlx(err) => write!(f, "database error: {err}"),
            StoreError::Timeout => write!(f, "database operation timed out"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Sqlx(err) => Some(err),
            StoreError::Timeout => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Sqlx(err)
    }
}

/// Handle to the relational store.
pub struct Store {
    pool: MySqlPool,
    url: String,
    sql_timeout: Duration,
}

impl Store {
    /// Open a pool against `url` and verify it with a ping bounded by
    /// `sql_timeout`. Whether a failure here is fatal is the caller's call:
    /// it is during bootstrap, it is not during a loop-time reconnect.
    pub async fn connect(url: &str, sql_timeout: Duration) -> Result<Self, StoreError> {
        let pool = open_pool(url, sql_timeout).await?;
        info!("connected to database");

        Ok(Self {
            pool,
            url: url.to_string(),
            sql_timeout,
        })
    }

    /// Replace the pool with a freshly opened one. On failure the previous
    /// pool stays in place and the caller proceeds with it; the next cycle
    /// retries.
    pub async fn reconnect(&mut self) -> Result<(), StoreError> {
        let pool = open_pool(&self.url, self.sql_timeout).await?;
        let old = std::mem::replace(&mut self.pool, pool);
        old.close().await;
        info!("reconnected to database");
        Ok(())
    }

    /// Lightweight liveness round-trip, once per poll cycle. No timeout
    /// beyond the driver default.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await?;
        Ok(())
    }

    /// Insert one reading under the statement timeout. Returns the affected
    /// row count for diagnostics; exactly 1 is expected but not enforced.
    pub async fn insert(&self, reading: &Reading) -> Result<u64, StoreError> {
        let query = insert_query(reading);

        let result = match timeout(self.sql_timeout, query.execute(&self.pool)).await {
            Ok(result) => result?,
            Err(_) => return Err(StoreError::Timeout),
        };

        debug!("{} rows inserted", result.rows_affected());
        Ok(result.rows_affected())
    }
}

/// Build the insert with its seven positional binds. The statement is scoped
/// to the call: prepared, executed, and released, never cached across
/// iterations.
fn insert_query(reading: &Reading) -> sqlx::query::Query<'_, MySql, MySqlArguments> {
    sqlx::query(INSERT_SQL)
        .bind(&reading.temperature)
        .bind(&reading.humidity)
        .bind(&reading.pressure)
        .bind(&reading.raw_temperature)
        .bind(&reading.raw_humidity)
        .bind(&reading.raw_pressure)
        .bind(&reading.device_hostname)
        .persistent(false)
}

async fn open_pool(url: &str, sql_timeout: Duration) -> Result<MySqlPool, StoreError> {
    let pool = MySqlPoolOptions::new()
        .max_connections(MAX_OPEN_CONNS)
        .min_connections(MAX_IDLE_CONNS)
        .max_lifetime(None)
        .connect_lazy(url)?;

    // connect_lazy does not dial; a bounded ping proves the store reachable
    // before the pool is handed out.
    let verify = async {
        let mut conn = pool.acquire().await?;
        conn.ping().await?;
        Ok::<(), sqlx::Error>(())
    };

    match timeout(sql_timeout, verify).await {
        Ok(Ok(())) => Ok(pool),
        Ok(Err(err)) => Err(StoreError::Sqlx(err)),
        Err(_) => Err(StoreError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_binds_exactly_seven_parameters() {
        assert_eq!(INSERT_SQL.matches('?').count(), 7);
    }

    #[test]
    fn insert_statement_has_no_interpolation() {
        // Values travel through bind parameters only.
        assert!(!INSERT_SQL.contains('{'));
        assert!(!INSERT_SQL.contains('\''));
    }

    #[test]
    fn insert_columns_in_documented_order() {
        let cols = [
            "temperature",
            "humidity",
            "pressure",
            "raw_temperature",
            "raw_humidity",
            "raw_pressure",
            "device_hostname",
        ];
        let mut last = 0;
        for col in cols {
            let pos = INSERT_SQL[last..]
                .find(col)
                .expect("column missing from insert statement");
            last += pos + col.len();
        }
    }

    #[test]
    fn insert_statement_is_not_cached_across_calls() {
        let reading = Reading::new("somewhere", 21.0, 50.0, 1000.0);
        let query = insert_query(&reading);
        assert!(!sqlx::Execute::persistent(&query));
    }

    #[test]
    fn timeout_error_display() {
        let err = StoreError::Timeout;
        assert_eq!(err.to_string(), "database operation timed out");
    }

    #[test]
    fn sqlx_error_is_wrapped_with_source() {
        use std::error::Error;
        let err = StoreError::from(sqlx::Error::PoolClosed);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("database error"));
    }
}
