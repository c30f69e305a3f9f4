use crate::domain::entities::{WeekdayFlags, WorkingHours};
use crate::domain::errors::CalendarResult;
use crate::domain::ports::WorkingHoursRepository;
use crate::infrastructure::persistence::{
    decode_date, decode_optional_date, decode_optional_time, decode_time, encode_date,
    encode_flag, encode_time, optional_text, Database,
};
use chrono::NaiveDate;
use sqlx::any::AnyRow;
use sqlx::Row;

const SCHEDULE_COLUMNS: &str = "id, user_id, start_time, end_time, work_hours_per_day, \
     monday_enabled, tuesday_enabled, wednesday_enabled, thursday_enabled, friday_enabled, \
     saturday_enabled, sunday_enabled, break_start_time, break_end_time, \
     break_duration_minutes, timezone, effective_from, effective_to, set_by, notes, \
     created_at, updated_at";

const SCHEDULE_PLACEHOLDERS: &str =
    "?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?";

/// SQL predicate (on alias `w`) for "range intersects `[from, to)`" and the
/// values it expects, in bind order
fn overlap_predicate(from: NaiveDate, to: Option<NaiveDate>) -> (&'static str, Vec<String>) {
    match to {
        Some(to) => (
            "w.effective_from < ? AND (w.effective_to IS NULL OR w.effective_to > ?)",
            vec![encode_date(to), encode_date(from)],
        ),
        None => (
            "(w.effective_to IS NULL OR w.effective_to > ?)",
            vec![encode_date(from)],
        ),
    }
}

fn schedule_from_row(row: &AnyRow) -> CalendarResult<WorkingHours> {
    let flag = |column: &str| -> CalendarResult<bool> {
        let value: i64 = row.try_get(column)?;
        Ok(value != 0)
    };
    let start_time: String = row.try_get("start_time")?;
    let end_time: String = row.try_get("end_time")?;
    let effective_from: String = row.try_get("effective_from")?;

    Ok(WorkingHours {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        start_time: decode_time("start_time", &start_time)?,
        end_time: decode_time("end_time", &end_time)?,
        work_hours_per_day: row.try_get("work_hours_per_day")?,
        weekdays: WeekdayFlags {
            monday: flag("monday_enabled")?,
            tuesday: flag("tuesday_enabled")?,
            wednesday: flag("wednesday_enabled")?,
            thursday: flag("thursday_enabled")?,
            friday: flag("friday_enabled")?,
            saturday: flag("saturday_enabled")?,
            sunday: flag("sunday_enabled")?,
        },
        break_start: decode_optional_time(
            "break_start_time",
            optional_text(row, "break_start_time"),
        )?,
        break_end: decode_optional_time("break_end_time", optional_text(row, "break_end_time"))?,
        break_duration_minutes: row.try_get("break_duration_minutes")?,
        timezone: row.try_get("timezone")?,
        effective_from: decode_date("effective_from", &effective_from)?,
        effective_to: decode_optional_date("effective_to", optional_text(row, "effective_to"))?,
        set_by: row.try_get("set_by")?,
        notes: optional_text(row, "notes"),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Column values of a schedule in `SCHEDULE_COLUMNS` order
enum Value {
    Text(String),
    OptText(Option<String>),
    Int(i64),
}

fn schedule_values(s: &WorkingHours) -> Vec<Value> {
    vec![
        Value::Text(s.id.clone()),
        Value::Text(s.user_id.clone()),
        Value::Text(encode_time(s.start_time)),
        Value::Text(encode_time(s.end_time)),
        Value::Int(s.work_hours_per_day),
        Value::Int(encode_flag(s.weekdays.monday)),
        Value::Int(encode_flag(s.weekdays.tuesday)),
        Value::Int(encode_flag(s.weekdays.wednesday)),
        Value::Int(encode_flag(s.weekdays.thursday)),
        Value::Int(encode_flag(s.weekdays.friday)),
        Value::Int(encode_flag(s.weekdays.saturday)),
        Value::Int(encode_flag(s.weekdays.sunday)),
        Value::OptText(s.break_start.map(encode_time)),
        Value::OptText(s.break_end.map(encode_time)),
        Value::Int(s.break_duration_minutes),
        Value::Text(s.timezone.clone()),
        Value::Text(encode_date(s.effective_from)),
        Value::OptText(s.effective_to.map(encode_date)),
        Value::Text(s.set_by.clone()),
        Value::OptText(s.notes.clone()),
        Value::Text(s.created_at.clone()),
        Value::Text(s.updated_at.clone()),
    ]
}

fn bind_values<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Any, sqlx::any::AnyArguments<'q>>,
    values: Vec<Value>,
) -> sqlx::query::Query<'q, sqlx::Any, sqlx::any::AnyArguments<'q>> {
    for value in values {
        query = match value {
            Value::Text(v) => query.bind(v),
            Value::OptText(v) => query.bind(v),
            Value::Int(v) => query.bind(v),
        };
    }
    query
}

impl Database {
    /// Insert a schedule unless it overlaps another of the same owner
    pub async fn insert_schedule_exclusive(&self, schedule: &WorkingHours) -> CalendarResult<bool> {
        let (predicate, overlap_binds) =
            overlap_predicate(schedule.effective_from, schedule.effective_to);
        let sql = format!(
            "INSERT INTO working_hours ({columns})
             SELECT {placeholders}
             WHERE NOT EXISTS (
                 SELECT 1 FROM working_hours w WHERE w.user_id = ? AND {predicate}
             )",
            columns = SCHEDULE_COLUMNS,
            placeholders = SCHEDULE_PLACEHOLDERS,
            predicate = predicate,
        );

        let mut query = bind_values(sqlx::query(&sql), schedule_values(schedule));
        query = query.bind(schedule.user_id.clone());
        for value in overlap_binds {
            query = query.bind(value);
        }
        let result = query.execute(&self.pool).await?;

        let written = result.rows_affected() > 0;
        if written {
            tracing::info!(
                "Working hours created: id={}, user_id={}, effective_from={}",
                schedule.id,
                schedule.user_id,
                schedule.effective_from
            );
        }
        Ok(written)
    }

    /// Rewrite a schedule unless the new range overlaps another of the same owner
    pub async fn update_schedule_exclusive(&self, schedule: &WorkingHours) -> CalendarResult<bool> {
        let (predicate, overlap_binds) =
            overlap_predicate(schedule.effective_from, schedule.effective_to);
        let sql = format!(
            "UPDATE working_hours SET
                 start_time = ?, end_time = ?, work_hours_per_day = ?,
                 monday_enabled = ?, tuesday_enabled = ?, wednesday_enabled = ?,
                 thursday_enabled = ?, friday_enabled = ?, saturday_enabled = ?,
                 sunday_enabled = ?, break_start_time = ?, break_end_time = ?,
                 break_duration_minutes = ?, timezone = ?, effective_from = ?,
                 effective_to = ?, notes = ?, updated_at = ?
             WHERE id = ? AND NOT EXISTS (
                 SELECT 1 FROM working_hours w
                 WHERE w.user_id = ? AND w.id <> ? AND {predicate}
             )",
            predicate = predicate,
        );

        // Same order as the SET list: skip id, user_id, set_by and created_at
        let values: Vec<Value> = schedule_values(schedule)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !matches!(i, 0 | 1 | 18 | 20))
            .map(|(_, v)| v)
            .collect();

        let mut query = bind_values(sqlx::query(&sql), values)
            .bind(schedule.id.clone())
            .bind(schedule.user_id.clone())
            .bind(schedule.id.clone());
        for value in overlap_binds {
            query = query.bind(value);
        }
        let result = query.execute(&self.pool).await?;

        let written = result.rows_affected() > 0;
        if written {
            tracing::info!("Working hours updated: id={}", schedule.id);
        }
        Ok(written)
    }

    pub async fn get_schedule(&self, id: &str) -> CalendarResult<Option<WorkingHours>> {
        let sql = format!("SELECT {} FROM working_hours WHERE id = ?", SCHEDULE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(schedule_from_row).transpose()
    }

    pub async fn find_overlapping_schedules(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: Option<NaiveDate>,
        exclude_id: Option<&str>,
    ) -> CalendarResult<Vec<WorkingHours>> {
        let (predicate, overlap_binds) = overlap_predicate(from, to);
        let exclude_clause = if exclude_id.is_some() {
            "AND w.id <> ?"
        } else {
            ""
        };
        let sql = format!(
            "SELECT {} FROM working_hours w WHERE w.user_id = ? AND {} {}
             ORDER BY w.effective_from ASC",
            SCHEDULE_COLUMNS, predicate, exclude_clause
        );

        let mut query = sqlx::query(&sql).bind(user_id);
        for value in overlap_binds {
            query = query.bind(value);
        }
        if let Some(id) = exclude_id {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(schedule_from_row).collect()
    }

    pub async fn list_schedules(
        &self,
        user_id: Option<&str>,
        active_on: Option<NaiveDate>,
    ) -> CalendarResult<Vec<WorkingHours>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(user_id) = user_id {
            conditions.push("user_id = ?");
            binds.push(user_id.to_string());
        }
        if let Some(date) = active_on {
            conditions.push("effective_from <= ? AND (effective_to IS NULL OR effective_to > ?)");
            binds.push(encode_date(date));
            binds.push(encode_date(date));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT {} FROM working_hours {} ORDER BY effective_from DESC",
            SCHEDULE_COLUMNS, where_clause
        );

        let mut query = sqlx::query(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(schedule_from_row).collect()
    }

    pub async fn delete_schedule(&self, id: &str) -> CalendarResult<bool> {
        let result = sqlx::query("DELETE FROM working_hours WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl WorkingHoursRepository for Database {
    async fn insert_schedule_exclusive(&self, schedule: &WorkingHours) -> CalendarResult<bool> {
        self.insert_schedule_exclusive(schedule).await
    }

    async fn update_schedule_exclusive(&self, schedule: &WorkingHours) -> CalendarResult<bool> {
        self.update_schedule_exclusive(schedule).await
    }

    async fn get_schedule(&self, id: &str) -> CalendarResult<Option<WorkingHours>> {
        self.get_schedule(id).await
    }

    async fn find_overlapping_schedules(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: Option<NaiveDate>,
        exclude_id: Option<&str>,
    ) -> CalendarResult<Vec<WorkingHours>> {
        self.find_overlapping_schedules(user_id, from, to, exclude_id)
            .await
    }

    async fn list_schedules(
        &self,
        user_id: Option<&str>,
        active_on: Option<NaiveDate>,
    ) -> CalendarResult<Vec<WorkingHours>> {
        self.list_schedules(user_id, active_on).await
    }

    async fn delete_schedule(&self, id: &str) -> CalendarResult<bool> {
        self.delete_schedule(id).await
    }
}
