pub mod calendar_converter;
pub mod state_machine;

pub use state_machine::*;
