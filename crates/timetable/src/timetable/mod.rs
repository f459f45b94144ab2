//! Timetable core: time arithmetic, slot partitioning, quick drafts and edits.

mod draft;
mod edit;
mod model;
mod partition;
mod time;

pub use draft::DraftScheduler;
pub use edit::EditError;
pub use model::*;
pub use time::TimeOfDay;
