use chrono::{NaiveDate, NaiveTime};
use log::LevelFilter;
use sqlx::{
    any::{AnyConnectOptions, AnyPoolOptions, AnyRow},
    AnyPool, ConnectOptions, Row,
};
use std::str::FromStr;

use crate::domain::errors::{CalendarError, CalendarResult};

mod holiday;
mod time_off;
mod working_hours;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

pub struct Database {
    pub(crate) pool: AnyPool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        // Ensure drivers are installed for AnyPool
        sqlx::any::install_default_drivers();

        let mut connect_options = AnyConnectOptions::from_str(database_url)?;

        connect_options = connect_options
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, std::time::Duration::from_secs(1));

        let pool = AnyPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .connect_with(connect_options)
            .await?;

        if database_url.starts_with("sqlite") {
            sqlx::query("PRAGMA journal_mode = WAL")
                .execute(&pool)
                .await?;
            sqlx::query("PRAGMA busy_timeout = 5000")
                .execute(&pool)
                .await?;
            sqlx::query("PRAGMA synchronous = NORMAL")
                .execute(&pool)
                .await?;
        }

        tracing::info!("Database pool ready");
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("migrations/sqlite").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

// Column encoding. Dates and times are stored as ISO text so range
// comparisons work lexicographically; flags are stored as integers.

pub(crate) fn encode_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn encode_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub(crate) fn encode_flag(flag: bool) -> i64 {
    i64::from(flag)
}

pub(crate) fn decode_date(column: &str, value: &str) -> CalendarResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| CalendarError::Database(format!("Bad date in {}: '{}' ({})", column, value, e)))
}

pub(crate) fn decode_time(column: &str, value: &str) -> CalendarResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|e| CalendarError::Database(format!("Bad time in {}: '{}' ({})", column, value, e)))
}

/// Read a nullable text column. The `Any` driver refuses to decode SQL NULL
/// into `Option<T>`, so a failed read means NULL.
pub(crate) fn optional_text(row: &AnyRow, column: &str) -> Option<String> {
    row.try_get::<Option<String>, _>(column).ok().flatten()
}

/// Read a nullable integer column, NULL as `None`
pub(crate) fn optional_int(row: &AnyRow, column: &str) -> Option<i64> {
    row.try_get::<Option<i64>, _>(column).ok().flatten()
}

/// Narrow a stored integer, rejecting values outside the target type
pub(crate) fn narrow<T: TryFrom<i64>>(
    column: &str,
    value: Option<i64>,
) -> CalendarResult<Option<T>> {
    value
        .map(|v| {
            T::try_from(v).map_err(|_| {
                CalendarError::Database(format!("Out of range value in {}: {}", column, v))
            })
        })
        .transpose()
}

pub(crate) fn decode_optional_date(
    column: &str,
    value: Option<String>,
) -> CalendarResult<Option<NaiveDate>> {
    value.map(|v| decode_date(column, &v)).transpose()
}

pub(crate) fn decode_optional_time(
    column: &str,
    value: Option<String>,
) -> CalendarResult<Option<NaiveTime>> {
    value.map(|v| decode_time(column, &v)).transpose()
}
