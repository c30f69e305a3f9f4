pub mod clock;
pub mod holiday_repository;
pub mod time_off_repository;
pub mod working_hours_repository;

pub use clock::Clock;
pub use holiday_repository::HolidayRepository;
pub use time_off_repository::TimeOffRepository;
pub use working_hours_repository::WorkingHoursRepository;
