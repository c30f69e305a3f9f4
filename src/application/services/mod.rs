pub mod day_status_resolver;
pub mod holiday_catalog;
pub mod schedule_registry;
pub mod time_off_ledger;

pub use day_status_resolver::DayStatusResolver;
pub use holiday_catalog::HolidayCatalog;
pub use schedule_registry::ScheduleRegistry;
pub use time_off_ledger::TimeOffLedger;
