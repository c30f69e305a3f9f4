use crate::application::services::*;
use crate::config::Config;
use crate::domain::entities::Actor;
use crate::domain::ports::{Clock, HolidayRepository, TimeOffRepository, WorkingHoursRepository};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::persistence::Database;
use std::sync::Arc;

/// Everything a caller needs to drive the calendar
#[derive(Clone)]
pub struct CalendarServices {
    pub holidays: HolidayCatalog,
    pub schedules: ScheduleRegistry,
    pub time_off: TimeOffLedger,
    pub day_status: DayStatusResolver,
}

pub fn build_services(db: &Database, config: &Config) -> CalendarServices {
    let clock = Arc::new(SystemClock::new(config.timezone)) as Arc<dyn Clock>;
    build_services_with_clock(db, clock)
}

/// Wire the services over one database with an explicit clock
pub fn build_services_with_clock(db: &Database, clock: Arc<dyn Clock>) -> CalendarServices {
    let holiday_repo = Arc::new(db.clone()) as Arc<dyn HolidayRepository>;
    let schedule_repo = Arc::new(db.clone()) as Arc<dyn WorkingHoursRepository>;
    let time_off_repo = Arc::new(db.clone()) as Arc<dyn TimeOffRepository>;

    let services = CalendarServices {
        holidays: HolidayCatalog::new(holiday_repo.clone()),
        schedules: ScheduleRegistry::new(schedule_repo.clone()),
        time_off: TimeOffLedger::new(time_off_repo.clone(), clock.clone()),
        day_status: DayStatusResolver::new(holiday_repo, schedule_repo, time_off_repo, clock),
    };
    tracing::debug!("Calendar services initialized");
    services
}

/// Privileged actor used for unattended operations such as seeding
pub fn system_actor(config: &Config) -> Actor {
    Actor::privileged(config.system_actor_id.clone())
}
