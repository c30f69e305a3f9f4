pub mod actor;
pub mod day_status;
pub mod holiday;
pub mod time_off;
pub mod working_hours;

pub use actor::*;
pub use day_status::*;
pub use holiday::*;
pub use time_off::*;
pub use working_hours::*;
