use crate::domain::entities::{
    Actor, TimeOff, TimeOffDecision, TimeOffFilter, TimeOffStatus, TimeOffUpdate,
};
use crate::domain::errors::{CalendarError, CalendarResult};
use crate::domain::ports::{Clock, TimeOffRepository};
use crate::domain::services::validate_transition;
use chrono::NaiveDate;
use std::sync::Arc;

const MAX_REASON_LEN: usize = 500;

fn validate_reason(field: &'static str, reason: Option<&String>) -> CalendarResult<()> {
    match reason {
        Some(r) if r.chars().count() > MAX_REASON_LEN => Err(CalendarError::invalid_input(
            field,
            format!("must be at most {} characters", MAX_REASON_LEN),
        )),
        _ => Ok(()),
    }
}

/// Owners may touch their own request while it is pending; privileged
/// actors may touch any request at any status.
fn authorize_edit(actor: &Actor, time_off: &TimeOff) -> CalendarResult<()> {
    if actor.privileged {
        return Ok(());
    }
    if !actor.is_owner_of(&time_off.user_id) {
        return Err(CalendarError::Forbidden(format!(
            "{} cannot modify time off {} of {}",
            actor.user_id, time_off.id, time_off.user_id
        )));
    }
    if time_off.status != TimeOffStatus::Pending {
        return Err(CalendarError::InvalidState {
            id: time_off.id.clone(),
            status: time_off.status,
        });
    }
    Ok(())
}

/// Time off requests and their approval lifecycle
#[derive(Clone)]
pub struct TimeOffLedger {
    time_off_repo: Arc<dyn TimeOffRepository>,
    clock: Arc<dyn Clock>,
}

impl TimeOffLedger {
    pub fn new(time_off_repo: Arc<dyn TimeOffRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            time_off_repo,
            clock,
        }
    }

    pub async fn create(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> CalendarResult<TimeOff> {
        if start_date > end_date {
            return Err(CalendarError::invalid_range(start_date, end_date));
        }
        if start_date < self.clock.today() {
            return Err(CalendarError::PastDate(start_date));
        }
        validate_reason("reason", reason.as_ref())?;

        let mut time_off = TimeOff::new(user_id, start_date, end_date, reason);
        let now = self.clock.now().to_rfc3339();
        time_off.created_at = now.clone();
        time_off.updated_at = now;

        self.ensure_no_overlap(&time_off, None).await?;
        if !self.time_off_repo.insert_time_off_exclusive(&time_off).await? {
            return Err(self.overlap_error(&time_off, None).await);
        }

        Ok(time_off)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        update: TimeOffUpdate,
    ) -> CalendarResult<TimeOff> {
        let current = self.get(id).await?;
        authorize_edit(actor, &current)?;

        let mut time_off = current.clone();
        if let Some(start) = update.start_date {
            time_off.start_date = start;
        }
        if let Some(end) = update.end_date {
            time_off.end_date = end;
        }
        if let Some(reason) = update.reason {
            time_off.reason = reason;
        }

        if time_off.start_date > time_off.end_date {
            return Err(CalendarError::invalid_range(
                time_off.start_date,
                time_off.end_date,
            ));
        }
        if time_off.start_date != current.start_date && time_off.start_date < self.clock.today() {
            return Err(CalendarError::PastDate(time_off.start_date));
        }
        validate_reason("reason", time_off.reason.as_ref())?;
        time_off.updated_at = self.clock.now().to_rfc3339();

        if time_off.status.is_blocking() {
            self.ensure_no_overlap(&time_off, Some(id)).await?;
        }
        if !self.time_off_repo.update_time_off_exclusive(&time_off).await? {
            if self.time_off_repo.get_time_off(id).await?.is_none() {
                return Err(CalendarError::not_found("TimeOff", id));
            }
            return Err(self.overlap_error(&time_off, Some(id)).await);
        }

        tracing::info!("Time off updated: id={}, by={}", id, actor.user_id);
        Ok(time_off)
    }

    pub async fn approve(
        &self,
        approver: &Actor,
        id: &str,
        notes: Option<String>,
    ) -> CalendarResult<TimeOff> {
        validate_reason("approval_notes", notes.as_ref())?;
        self.decide(approver, id, TimeOffStatus::Approved, notes)
            .await
    }

    /// Rejecting always carries a reason, stored as the decision notes
    pub async fn reject(
        &self,
        approver: &Actor,
        id: &str,
        reason: String,
    ) -> CalendarResult<TimeOff> {
        if reason.trim().is_empty() {
            return Err(CalendarError::invalid_input(
                "rejection_reason",
                "must not be blank",
            ));
        }
        validate_reason("rejection_reason", Some(&reason))?;
        self.decide(approver, id, TimeOffStatus::Rejected, Some(reason))
            .await
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> CalendarResult<()> {
        let current = self.get(id).await?;
        authorize_edit(actor, &current)?;

        if !self.time_off_repo.delete_time_off(id).await? {
            return Err(CalendarError::not_found("TimeOff", id));
        }
        tracing::info!("Time off deleted: id={}, by={}", id, actor.user_id);
        Ok(())
    }

    /// Latest start date first
    pub async fn list(&self, filter: &TimeOffFilter) -> CalendarResult<Vec<TimeOff>> {
        self.time_off_repo.list_time_off(filter).await
    }

    pub async fn get(&self, id: &str) -> CalendarResult<TimeOff> {
        self.time_off_repo
            .get_time_off(id)
            .await?
            .ok_or_else(|| CalendarError::not_found("TimeOff", id))
    }

    async fn decide(
        &self,
        approver: &Actor,
        id: &str,
        status: TimeOffStatus,
        notes: Option<String>,
    ) -> CalendarResult<TimeOff> {
        if !approver.privileged {
            return Err(CalendarError::Forbidden(format!(
                "{} cannot decide time off requests",
                approver.user_id
            )));
        }

        let current = self.get(id).await?;
        validate_transition(id, current.status, status)?;

        let decision = TimeOffDecision {
            status,
            decided_by: approver.user_id.clone(),
            decided_at: self.clock.now().to_rfc3339(),
            notes,
        };
        if !self.time_off_repo.decide_time_off(id, &decision).await? {
            // Another decision landed between the read and the write
            let latest = self.get(id).await?;
            tracing::warn!("Time off {} already {}", id, latest.status);
            return Err(CalendarError::InvalidState {
                id: id.to_string(),
                status: latest.status,
            });
        }

        self.get(id).await
    }

    async fn ensure_no_overlap(
        &self,
        time_off: &TimeOff,
        exclude_id: Option<&str>,
    ) -> CalendarResult<()> {
        let blocking = self
            .time_off_repo
            .find_blocking_time_off(
                &time_off.user_id,
                time_off.start_date,
                time_off.end_date,
                exclude_id,
            )
            .await?;

        match blocking.first() {
            Some(other) => {
                tracing::warn!(
                    "Time off for {} {}..{} overlaps {}",
                    time_off.user_id,
                    time_off.start_date,
                    time_off.end_date,
                    other.id
                );
                Err(CalendarError::OverlappingRequest {
                    user_id: time_off.user_id.clone(),
                    existing_id: other.id.clone(),
                })
            }
            None => Ok(()),
        }
    }

    async fn overlap_error(&self, time_off: &TimeOff, exclude_id: Option<&str>) -> CalendarError {
        match self.ensure_no_overlap(time_off, exclude_id).await {
            Err(err) => err,
            Ok(()) => CalendarError::Database(format!("time off {} was not written", time_off.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user_id: &str, status: TimeOffStatus) -> TimeOff {
        let d = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let mut t = TimeOff::new(user_id, d, d, None);
        t.status = status;
        t
    }

    #[test]
    fn test_owner_edits_only_while_pending() {
        let owner = Actor::member("u1");
        assert!(authorize_edit(&owner, &request("u1", TimeOffStatus::Pending)).is_ok());
        assert!(matches!(
            authorize_edit(&owner, &request("u1", TimeOffStatus::Approved)),
            Err(CalendarError::InvalidState { status: TimeOffStatus::Approved, .. })
        ));
    }

    #[test]
    fn test_privileged_actor_edits_any_status() {
        let manager = Actor::privileged("pm");
        assert!(authorize_edit(&manager, &request("u1", TimeOffStatus::Rejected)).is_ok());
    }

    #[test]
    fn test_strangers_are_forbidden() {
        assert!(matches!(
            authorize_edit(&Actor::member("u2"), &request("u1", TimeOffStatus::Pending)),
            Err(CalendarError::Forbidden(_))
        ));
    }

    #[test]
    fn test_reason_length_is_bounded() {
        let long = "x".repeat(MAX_REASON_LEN + 1);
        assert!(validate_reason("reason", Some(&long)).is_err());
        assert!(validate_reason("reason", None).is_ok());
    }
}
