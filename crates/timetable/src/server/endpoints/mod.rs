pub mod saved;
pub mod status;
pub mod timetable;
