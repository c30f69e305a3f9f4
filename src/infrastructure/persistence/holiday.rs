use crate::domain::entities::{CalendarType, Holiday, HolidayFilter};
use crate::domain::errors::{CalendarError, CalendarResult};
use crate::domain::ports::HolidayRepository;
use crate::infrastructure::persistence::{
    decode_date, encode_date, encode_flag, narrow, optional_int, optional_text, Database,
};
use chrono::NaiveDate;
use sqlx::any::AnyRow;
use sqlx::Row;

const HOLIDAY_COLUMNS: &str = "id, name, date, calendar_type, is_recurring, solar_year, \
     solar_month, solar_day, description, created_by, created_at";

fn holiday_from_row(row: &AnyRow) -> CalendarResult<Holiday> {
    let date: String = row.try_get("date")?;
    let calendar_type: String = row.try_get("calendar_type")?;
    let is_recurring: i64 = row.try_get("is_recurring")?;

    Ok(Holiday {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        date: decode_date("date", &date)?,
        calendar_type: calendar_type
            .parse::<CalendarType>()
            .map_err(CalendarError::Database)?,
        is_recurring: is_recurring != 0,
        solar_year: narrow("solar_year", optional_int(row, "solar_year"))?,
        solar_month: narrow("solar_month", optional_int(row, "solar_month"))?,
        solar_day: narrow("solar_day", optional_int(row, "solar_day"))?,
        description: optional_text(row, "description"),
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
    })
}

impl Database {
    /// Create a new holiday
    pub async fn create_holiday(&self, holiday: &Holiday) -> CalendarResult<()> {
        let sql = format!(
            "INSERT INTO holidays ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            HOLIDAY_COLUMNS
        );
        sqlx::query(&sql)
            .bind(&holiday.id)
            .bind(&holiday.name)
            .bind(encode_date(holiday.date))
            .bind(holiday.calendar_type.to_string())
            .bind(encode_flag(holiday.is_recurring))
            .bind(holiday.solar_year.map(i64::from))
            .bind(holiday.solar_month.map(i64::from))
            .bind(holiday.solar_day.map(i64::from))
            .bind(&holiday.description)
            .bind(&holiday.created_by)
            .bind(&holiday.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err)
                    if db_err.message().contains("UNIQUE")
                        || db_err.message().contains("unique") =>
                {
                    CalendarError::DuplicateHoliday {
                        name: holiday.name.clone(),
                        date: holiday.date,
                    }
                }
                other => other.into(),
            })?;

        tracing::info!(
            "Holiday created: id={}, name={}, date={}",
            holiday.id,
            holiday.name,
            holiday.date
        );
        Ok(())
    }

    /// Insert a holiday, leaving an existing (date, name) row untouched
    pub async fn insert_holiday_if_absent(&self, holiday: &Holiday) -> CalendarResult<bool> {
        let sql = format!(
            "INSERT INTO holidays ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(date, name) DO NOTHING",
            HOLIDAY_COLUMNS
        );
        let result = sqlx::query(&sql)
            .bind(&holiday.id)
            .bind(&holiday.name)
            .bind(encode_date(holiday.date))
            .bind(holiday.calendar_type.to_string())
            .bind(encode_flag(holiday.is_recurring))
            .bind(holiday.solar_year.map(i64::from))
            .bind(holiday.solar_month.map(i64::from))
            .bind(holiday.solar_day.map(i64::from))
            .bind(&holiday.description)
            .bind(&holiday.created_by)
            .bind(&holiday.created_at)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a holiday by ID
    pub async fn get_holiday(&self, id: &str) -> CalendarResult<Option<Holiday>> {
        let sql = format!("SELECT {} FROM holidays WHERE id = ?", HOLIDAY_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(holiday_from_row).transpose()
    }

    pub async fn find_holiday(
        &self,
        date: NaiveDate,
        name: &str,
    ) -> CalendarResult<Option<Holiday>> {
        let sql = format!(
            "SELECT {} FROM holidays WHERE date = ? AND name = ?",
            HOLIDAY_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(encode_date(date))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(holiday_from_row).transpose()
    }

    /// List holidays, optionally restricted to a civil year and calendar type
    pub async fn list_holidays(&self, filter: &HolidayFilter) -> CalendarResult<Vec<Holiday>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some((start, end)) = filter.date_bounds() {
            conditions.push("date >= ? AND date <= ?");
            binds.push(encode_date(start));
            binds.push(encode_date(end));
        }
        if let Some(calendar_type) = filter.calendar_type {
            conditions.push("calendar_type = ?");
            binds.push(calendar_type.to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT {} FROM holidays {} ORDER BY date ASC, name ASC",
            HOLIDAY_COLUMNS, where_clause
        );

        let mut query = sqlx::query(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(holiday_from_row).collect()
    }

    pub async fn list_holidays_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CalendarResult<Vec<Holiday>> {
        let sql = format!(
            "SELECT {} FROM holidays WHERE date >= ? AND date <= ? ORDER BY date ASC, name ASC",
            HOLIDAY_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(encode_date(start))
            .bind(encode_date(end))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(holiday_from_row).collect()
    }

    pub async fn next_holiday_after(&self, date: NaiveDate) -> CalendarResult<Option<Holiday>> {
        let sql = format!(
            "SELECT {} FROM holidays WHERE date > ? ORDER BY date ASC, name ASC LIMIT 1",
            HOLIDAY_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(encode_date(date))
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(holiday_from_row).transpose()
    }

    /// Delete a holiday
    pub async fn delete_holiday(&self, id: &str) -> CalendarResult<bool> {
        let result = sqlx::query("DELETE FROM holidays WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl HolidayRepository for Database {
    async fn create_holiday(&self, holiday: &Holiday) -> CalendarResult<()> {
        self.create_holiday(holiday).await
    }

    async fn insert_holiday_if_absent(&self, holiday: &Holiday) -> CalendarResult<bool> {
        self.insert_holiday_if_absent(holiday).await
    }

    async fn get_holiday(&self, id: &str) -> CalendarResult<Option<Holiday>> {
        self.get_holiday(id).await
    }

    async fn find_holiday(&self, date: NaiveDate, name: &str) -> CalendarResult<Option<Holiday>> {
        self.find_holiday(date, name).await
    }

    async fn list_holidays(&self, filter: &HolidayFilter) -> CalendarResult<Vec<Holiday>> {
        self.list_holidays(filter).await
    }

    async fn list_holidays_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CalendarResult<Vec<Holiday>> {
        self.list_holidays_between(start, end).await
    }

    async fn next_holiday_after(&self, date: NaiveDate) -> CalendarResult<Option<Holiday>> {
        self.next_holiday_after(date).await
    }

    async fn delete_holiday(&self, id: &str) -> CalendarResult<bool> {
        self.delete_holiday(id).await
    }
}
