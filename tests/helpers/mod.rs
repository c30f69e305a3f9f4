#![allow(dead_code)]
pub mod calendar_helpers;
pub mod test_db;

pub use calendar_helpers::*;
pub use test_db::*;
