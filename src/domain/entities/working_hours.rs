use chrono::{NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEZONE: &str = "Asia/Tehran";
pub const DEFAULT_BREAK_MINUTES: i64 = 60;
pub const DEFAULT_HOURS_PER_DAY: i64 = 8;

/// Which weekdays a schedule counts as working days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayFlags {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl Default for WeekdayFlags {
    /// Saturday through Wednesday; Thursday and Friday off
    fn default() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: false,
            friday: false,
            saturday: true,
            sunday: true,
        }
    }
}

impl WeekdayFlags {
    pub fn all() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: true,
            sunday: true,
        }
    }

    pub fn is_enabled(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    pub fn set(&mut self, weekday: Weekday, enabled: bool) {
        let slot = match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        };
        *slot = enabled;
    }

    pub fn enabled_count(&self) -> usize {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ]
        .iter()
        .filter(|d| **d)
        .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub id: String,
    pub user_id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub work_hours_per_day: i64,
    pub weekdays: WeekdayFlags,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    pub break_duration_minutes: i64,
    pub timezone: String,
    pub effective_from: NaiveDate,
    /// Exclusive end of the effective range; open-ended when absent
    pub effective_to: Option<NaiveDate>,
    pub set_by: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl WorkingHours {
    pub fn new(schedule: NewWorkingHours, set_by: &str) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: schedule.user_id,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            work_hours_per_day: schedule.work_hours_per_day,
            weekdays: schedule.weekdays,
            break_start: schedule.break_start,
            break_end: schedule.break_end,
            break_duration_minutes: schedule.break_duration_minutes,
            timezone: schedule.timezone,
            effective_from: schedule.effective_from,
            effective_to: schedule.effective_to,
            set_by: set_by.to_string(),
            notes: schedule.notes,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether `date` falls inside `[effective_from, effective_to)`
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.map_or(true, |to| date < to)
    }

    /// Whether this schedule's effective range intersects `[from, to)`
    pub fn overlaps(&self, from: NaiveDate, to: Option<NaiveDate>) -> bool {
        let starts_before_other_ends = to.map_or(true, |to| self.effective_from < to);
        let ends_after_other_starts = self.effective_to.map_or(true, |own_to| own_to > from);
        starts_before_other_ends && ends_after_other_starts
    }

    /// Apply a partial update, returning the merged record
    pub fn merged(&self, update: &WorkingHoursUpdate) -> Self {
        let mut merged = self.clone();
        if let Some(v) = update.start_time {
            merged.start_time = v;
        }
        if let Some(v) = update.end_time {
            merged.end_time = v;
        }
        if let Some(v) = update.work_hours_per_day {
            merged.work_hours_per_day = v;
        }
        if let Some(v) = update.weekdays {
            merged.weekdays = v;
        }
        if let Some(v) = update.break_start {
            merged.break_start = v;
        }
        if let Some(v) = update.break_end {
            merged.break_end = v;
        }
        if let Some(v) = update.break_duration_minutes {
            merged.break_duration_minutes = v;
        }
        if let Some(v) = &update.timezone {
            merged.timezone = v.clone();
        }
        if let Some(v) = update.effective_from {
            merged.effective_from = v;
        }
        if let Some(v) = update.effective_to {
            merged.effective_to = v;
        }
        if let Some(v) = &update.notes {
            merged.notes = v.clone();
        }
        merged.updated_at = Utc::now().to_rfc3339();
        merged
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkingHours {
    pub user_id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_hours_per_day")]
    pub work_hours_per_day: i64,
    #[serde(default)]
    pub weekdays: WeekdayFlags,
    #[serde(default)]
    pub break_start: Option<NaiveTime>,
    #[serde(default)]
    pub break_end: Option<NaiveTime>,
    #[serde(default = "default_break_minutes")]
    pub break_duration_minutes: i64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewWorkingHours {
    /// Schedule with default week, break and timezone settings
    pub fn new(
        user_id: impl Into<String>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        effective_from: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            start_time,
            end_time,
            work_hours_per_day: DEFAULT_HOURS_PER_DAY,
            weekdays: WeekdayFlags::default(),
            break_start: None,
            break_end: None,
            break_duration_minutes: DEFAULT_BREAK_MINUTES,
            timezone: DEFAULT_TIMEZONE.to_string(),
            effective_from,
            effective_to: None,
            notes: None,
        }
    }
}

fn default_hours_per_day() -> i64 {
    DEFAULT_HOURS_PER_DAY
}

fn default_break_minutes() -> i64 {
    DEFAULT_BREAK_MINUTES
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

/// Partial update. Nullable columns use `Option<Option<_>>`:
/// `None` keeps the stored value, `Some(None)` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkingHoursUpdate {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub work_hours_per_day: Option<i64>,
    pub weekdays: Option<WeekdayFlags>,
    pub break_start: Option<Option<NaiveTime>>,
    pub break_end: Option<Option<NaiveTime>>,
    pub break_duration_minutes: Option<i64>,
    pub timezone: Option<String>,
    pub effective_from: Option<NaiveDate>,
    pub effective_to: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule(from: NaiveDate, to: Option<NaiveDate>) -> WorkingHours {
        let mut new = NewWorkingHours::new(
            "u1",
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            from,
        );
        new.effective_to = to;
        WorkingHours::new(new, "admin")
    }

    #[test]
    fn test_default_week_is_saturday_to_wednesday() {
        let flags = WeekdayFlags::default();
        assert!(flags.is_enabled(Weekday::Sat));
        assert!(flags.is_enabled(Weekday::Wed));
        assert!(!flags.is_enabled(Weekday::Thu));
        assert!(!flags.is_enabled(Weekday::Fri));
        assert_eq!(flags.enabled_count(), 5);
    }

    #[test]
    fn test_effective_range_is_half_open() {
        let s = schedule(date(2024, 1, 1), Some(date(2024, 2, 1)));
        assert!(s.is_effective_on(date(2024, 1, 1)));
        assert!(s.is_effective_on(date(2024, 1, 31)));
        assert!(!s.is_effective_on(date(2024, 2, 1)));
        assert!(!s.is_effective_on(date(2023, 12, 31)));

        let open = schedule(date(2024, 1, 1), None);
        assert!(open.is_effective_on(date(2099, 1, 1)));
    }

    #[test]
    fn test_overlap_rules() {
        let bounded = schedule(date(2024, 1, 1), Some(date(2024, 2, 1)));
        // Adjacent ranges do not overlap
        assert!(!bounded.overlaps(date(2024, 2, 1), None));
        assert!(!bounded.overlaps(date(2023, 12, 1), Some(date(2024, 1, 1))));
        assert!(bounded.overlaps(date(2024, 1, 31), None));
        assert!(bounded.overlaps(date(2023, 1, 1), None));

        let open = schedule(date(2024, 1, 1), None);
        assert!(open.overlaps(date(2030, 1, 1), Some(date(2030, 2, 1))));
        assert!(!open.overlaps(date(2023, 1, 1), Some(date(2024, 1, 1))));
    }

    #[test]
    fn test_merge_keeps_effective_to_unless_supplied() {
        let s = schedule(date(2024, 1, 1), Some(date(2024, 6, 1)));

        let kept = s.merged(&WorkingHoursUpdate {
            effective_from: Some(date(2024, 2, 1)),
            ..Default::default()
        });
        assert_eq!(kept.effective_from, date(2024, 2, 1));
        assert_eq!(kept.effective_to, Some(date(2024, 6, 1)));

        let cleared = s.merged(&WorkingHoursUpdate {
            effective_to: Some(None),
            ..Default::default()
        });
        assert_eq!(cleared.effective_to, None);
    }
}
