use chrono::{NaiveDate, NaiveTime};
use work_calendar::bootstrap::CalendarServices;
use work_calendar::domain::entities::{Actor, NewWorkingHours, WorkingHours};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

pub fn admin() -> Actor {
    Actor::privileged("admin")
}

/// 09:00-17:00, Saturday to Wednesday
pub fn office_hours(user_id: &str, from: NaiveDate, to: Option<NaiveDate>) -> NewWorkingHours {
    let mut schedule = NewWorkingHours::new(user_id, time(9, 0), time(17, 0), from);
    schedule.effective_to = to;
    schedule
}

pub async fn create_office_hours(
    services: &CalendarServices,
    user_id: &str,
    from: NaiveDate,
    to: Option<NaiveDate>,
) -> WorkingHours {
    services
        .schedules
        .create(&admin(), office_hours(user_id, from, to))
        .await
        .expect("Failed to create schedule")
}
