use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOffStatus {
    Pending,
    Approved,
    Rejected,
}

impl TimeOffStatus {
    /// Statuses that take part in the per-owner non-overlap rule
    pub const BLOCKING: [TimeOffStatus; 2] = [TimeOffStatus::Pending, TimeOffStatus::Approved];

    pub fn is_blocking(&self) -> bool {
        Self::BLOCKING.contains(self)
    }
}

impl fmt::Display for TimeOffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeOffStatus::Pending => write!(f, "pending"),
            TimeOffStatus::Approved => write!(f, "approved"),
            TimeOffStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for TimeOffStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TimeOffStatus::Pending),
            "approved" => Ok(TimeOffStatus::Approved),
            "rejected" => Ok(TimeOffStatus::Rejected),
            _ => Err(format!("Invalid time off status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOff {
    pub id: String,
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: TimeOffStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<String>,
    pub approval_notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TimeOff {
    pub fn new(
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            start_date,
            end_date,
            reason,
            status: TimeOffStatus::Pending,
            approved_by: None,
            approved_at: None,
            approval_notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Inclusive number of calendar days covered
    pub fn days_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Inclusive intersection; touching ranges overlap
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }
}

/// Editable fields of a request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeOffUpdate {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason: Option<Option<String>>,
}

/// The approver's verdict on a pending request
#[derive(Debug, Clone)]
pub struct TimeOffDecision {
    pub status: TimeOffStatus,
    pub decided_by: String,
    pub decided_at: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeOffFilter {
    pub user_id: Option<String>,
    pub status: Option<TimeOffStatus>,
    /// Keep requests starting on or after this date
    pub from: Option<NaiveDate>,
    /// Keep requests ending on or before this date
    pub to: Option<NaiveDate>,
}

impl TimeOffFilter {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: TimeOffStatus) -> Self {
        self.status = Some(status);
        self
    }
}
