pub mod analysis;
pub mod day;
pub mod entry;
pub mod planner;
