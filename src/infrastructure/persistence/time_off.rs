use crate::domain::entities::{TimeOff, TimeOffDecision, TimeOffFilter, TimeOffStatus};
use crate::domain::errors::{CalendarError, CalendarResult};
use crate::domain::ports::TimeOffRepository;
use crate::infrastructure::persistence::{decode_date, encode_date, optional_text, Database};
use chrono::NaiveDate;
use sqlx::any::AnyRow;
use sqlx::Row;

const TIME_OFF_COLUMNS: &str = "id, user_id, start_date, end_date, reason, status, \
     approved_by, approved_at, approval_notes, created_at, updated_at";

/// Pending/approved rows of the same owner intersecting an inclusive range,
/// on alias `t`. Binds: user_id, end, start.
const BLOCKING_PREDICATE: &str = "t.user_id = ? AND t.status IN ('pending', 'approved') \
     AND t.start_date <= ? AND t.end_date >= ?";

fn time_off_from_row(row: &AnyRow) -> CalendarResult<TimeOff> {
    let start_date: String = row.try_get("start_date")?;
    let end_date: String = row.try_get("end_date")?;
    let status: String = row.try_get("status")?;

    Ok(TimeOff {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        start_date: decode_date("start_date", &start_date)?,
        end_date: decode_date("end_date", &end_date)?,
        reason: optional_text(row, "reason"),
        status: status
            .parse::<TimeOffStatus>()
            .map_err(CalendarError::Database)?,
        approved_by: optional_text(row, "approved_by"),
        approved_at: optional_text(row, "approved_at"),
        approval_notes: optional_text(row, "approval_notes"),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    /// Insert a pending request unless it intersects a blocking one
    pub async fn insert_time_off_exclusive(&self, time_off: &TimeOff) -> CalendarResult<bool> {
        let sql = format!(
            "INSERT INTO time_off ({})
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE NOT EXISTS (SELECT 1 FROM time_off t WHERE {})",
            TIME_OFF_COLUMNS, BLOCKING_PREDICATE
        );
        let result = sqlx::query(&sql)
            .bind(&time_off.id)
            .bind(&time_off.user_id)
            .bind(encode_date(time_off.start_date))
            .bind(encode_date(time_off.end_date))
            .bind(&time_off.reason)
            .bind(time_off.status.to_string())
            .bind(&time_off.approved_by)
            .bind(&time_off.approved_at)
            .bind(&time_off.approval_notes)
            .bind(&time_off.created_at)
            .bind(&time_off.updated_at)
            .bind(&time_off.user_id)
            .bind(encode_date(time_off.end_date))
            .bind(encode_date(time_off.start_date))
            .execute(&self.pool)
            .await?;

        let written = result.rows_affected() > 0;
        if written {
            tracing::info!(
                "Time off created: id={}, user_id={}, {}..{}",
                time_off.id,
                time_off.user_id,
                time_off.start_date,
                time_off.end_date
            );
        }
        Ok(written)
    }

    /// Rewrite dates and reason. A rejected request never conflicts, so the
    /// guard only applies while the row itself is blocking.
    pub async fn update_time_off_exclusive(&self, time_off: &TimeOff) -> CalendarResult<bool> {
        let sql = format!(
            "UPDATE time_off SET start_date = ?, end_date = ?, reason = ?, updated_at = ?
             WHERE id = ? AND (
                 status = 'rejected'
                 OR NOT EXISTS (SELECT 1 FROM time_off t WHERE t.id <> ? AND {})
             )",
            BLOCKING_PREDICATE
        );
        let result = sqlx::query(&sql)
            .bind(encode_date(time_off.start_date))
            .bind(encode_date(time_off.end_date))
            .bind(&time_off.reason)
            .bind(&time_off.updated_at)
            .bind(&time_off.id)
            .bind(&time_off.id)
            .bind(&time_off.user_id)
            .bind(encode_date(time_off.end_date))
            .bind(encode_date(time_off.start_date))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_time_off(&self, id: &str) -> CalendarResult<Option<TimeOff>> {
        let sql = format!("SELECT {} FROM time_off WHERE id = ?", TIME_OFF_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(time_off_from_row).transpose()
    }

    pub async fn find_blocking_time_off(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<&str>,
    ) -> CalendarResult<Vec<TimeOff>> {
        let exclude_clause = if exclude_id.is_some() {
            "AND t.id <> ?"
        } else {
            ""
        };
        let sql = format!(
            "SELECT {} FROM time_off t WHERE {} {} ORDER BY t.start_date ASC",
            TIME_OFF_COLUMNS, BLOCKING_PREDICATE, exclude_clause
        );

        let mut query = sqlx::query(&sql)
            .bind(user_id)
            .bind(encode_date(end))
            .bind(encode_date(start));
        if let Some(id) = exclude_id {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(time_off_from_row).collect()
    }

    pub async fn list_approved_between(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CalendarResult<Vec<TimeOff>> {
        let sql = format!(
            "SELECT {} FROM time_off
             WHERE user_id = ? AND status = 'approved' AND start_date <= ? AND end_date >= ?
             ORDER BY start_date ASC",
            TIME_OFF_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(encode_date(end))
            .bind(encode_date(start))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(time_off_from_row).collect()
    }

    /// List requests matching a filter, latest start first
    pub async fn list_time_off(&self, filter: &TimeOffFilter) -> CalendarResult<Vec<TimeOff>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(user_id) = &filter.user_id {
            conditions.push("user_id = ?");
            binds.push(user_id.clone());
        }
        if let Some(status) = filter.status {
            conditions.push("status = ?");
            binds.push(status.to_string());
        }
        if let Some(from) = filter.from {
            conditions.push("start_date >= ?");
            binds.push(encode_date(from));
        }
        if let Some(to) = filter.to {
            conditions.push("end_date <= ?");
            binds.push(encode_date(to));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT {} FROM time_off {} ORDER BY start_date DESC, created_at DESC",
            TIME_OFF_COLUMNS, where_clause
        );

        let mut query = sqlx::query(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(time_off_from_row).collect()
    }

    /// Compare-and-set from pending to the decided status
    pub async fn decide_time_off(
        &self,
        id: &str,
        decision: &TimeOffDecision,
    ) -> CalendarResult<bool> {
        let result = sqlx::query(
            "UPDATE time_off
             SET status = ?, approved_by = ?, approved_at = ?, approval_notes = ?, updated_at = ?
             WHERE id = ? AND status = 'pending'",
        )
        .bind(decision.status.to_string())
        .bind(&decision.decided_by)
        .bind(&decision.decided_at)
        .bind(&decision.notes)
        .bind(&decision.decided_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        let written = result.rows_affected() > 0;
        if written {
            tracing::info!(
                "Time off {}: id={}, by={}",
                decision.status,
                id,
                decision.decided_by
            );
        }
        Ok(written)
    }

    pub async fn delete_time_off(&self, id: &str) -> CalendarResult<bool> {
        let result = sqlx::query("DELETE FROM time_off WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl TimeOffRepository for Database {
    async fn insert_time_off_exclusive(&self, time_off: &TimeOff) -> CalendarResult<bool> {
        self.insert_time_off_exclusive(time_off).await
    }

    async fn update_time_off_exclusive(&self, time_off: &TimeOff) -> CalendarResult<bool> {
        self.update_time_off_exclusive(time_off).await
    }

    async fn get_time_off(&self, id: &str) -> CalendarResult<Option<TimeOff>> {
        self.get_time_off(id).await
    }

    async fn find_blocking_time_off(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<&str>,
    ) -> CalendarResult<Vec<TimeOff>> {
        self.find_blocking_time_off(user_id, start, end, exclude_id)
            .await
    }

    async fn list_approved_between(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CalendarResult<Vec<TimeOff>> {
        self.list_approved_between(user_id, start, end).await
    }

    async fn list_time_off(&self, filter: &TimeOffFilter) -> CalendarResult<Vec<TimeOff>> {
        self.list_time_off(filter).await
    }

    async fn decide_time_off(
        &self,
        id: &str,
        decision: &TimeOffDecision,
    ) -> CalendarResult<bool> {
        self.decide_time_off(id, decision).await
    }

    async fn delete_time_off(&self, id: &str) -> CalendarResult<bool> {
        self.delete_time_off(id).await
    }
}
