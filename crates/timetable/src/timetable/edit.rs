//! Single-entry edits on a [`ScheduleDocument`].
//!
//! Every edit touches exactly one day and keeps that day's entries ordered by
//! start time. An edit that fails leaves the document untouched. Overlapping
//! entries are allowed: they are concurrent sessions (e.g. parallel batches).

use thiserror::Error;
use uuid::Uuid;

use super::model::{DaySchedule, ScheduleDocument, ScheduleEntry};

/// Errors that can occur while editing a timetable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A required entry field was blank
    #[error("Entry field `{0}` must not be empty")]
    MissingField(&'static str),

    #[error("No day named {0:?} in this timetable")]
    DayNotFound(String),

    #[error("No entry with id {0:?} on this day")]
    EntryNotFound(String),
}

impl ScheduleDocument {
    /// Adds an entry to `day`. An entry without an id, or with an id already
    /// used on that day, is given a fresh one.
    ///
    /// Returns the id of the added entry.
    pub fn add_entry(&mut self, day: &str, mut entry: ScheduleEntry) -> Result<String, EditError> {
        validate(&entry)?;
        let schedule = self.schedule_mut(day)?;

        if entry.id.trim().is_empty() || schedule.entries.iter().any(|e| e.id == entry.id) {
            entry.id = Uuid::new_v4().to_string();
        }
        let id = entry.id.clone();

        schedule.entries.push(entry);
        sort_entries(schedule);
        Ok(id)
    }

    /// Replaces the entry on `day` that has the same id as `entry`.
    pub fn update_entry(&mut self, day: &str, entry: ScheduleEntry) -> Result<(), EditError> {
        validate(&entry)?;
        let schedule = self.schedule_mut(day)?;

        let slot = schedule
            .entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or_else(|| EditError::EntryNotFound(entry.id.clone()))?;
        *slot = entry;

        sort_entries(schedule);
        Ok(())
    }

    /// Removes the entry with `entry_id` from `day` and returns it.
    pub fn delete_entry(&mut self, day: &str, entry_id: &str) -> Result<ScheduleEntry, EditError> {
        let schedule = self.schedule_mut(day)?;

        let position = schedule
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| EditError::EntryNotFound(entry_id.to_string()))?;

        Ok(schedule.entries.remove(position))
    }

    fn schedule_mut(&mut self, day: &str) -> Result<&mut DaySchedule, EditError> {
        self.day_mut(day)
            .ok_or_else(|| EditError::DayNotFound(day.to_string()))
    }
}

fn validate(entry: &ScheduleEntry) -> Result<(), EditError> {
    if entry.subject_name.trim().is_empty() {
        return Err(EditError::MissingField("subjectName"));
    }
    Ok(())
}

// Stable, so concurrent entries keep their relative order.
fn sort_entries(schedule: &mut DaySchedule) {
    schedule.entries.sort_by_key(|e| e.time_start);
}
