//! Timetable data model shared by both generation paths, the editor and the store.
//!
//! Field names serialise in camelCase so that remote planner responses and
//! persisted snapshots share one shape.
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

use super::time::TimeOfDay;

/// Kind of instructional session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LectureType {
    #[default]
    Theory,
    Practical,
}

impl fmt::Display for LectureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LectureType::Theory => write!(f, "Theory"),
            LectureType::Practical => write!(f, "Practical"),
        }
    }
}

/// A break inserted once a given number of lectures has been held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakRule {
    #[serde(default)]
    pub id: String,
    pub label: String,
    /// Length in minutes.
    pub duration: u16,
    /// The break is due right after this many lecture slots.
    pub after_lecture: u32,
}

/// A course session the institution wants scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(rename = "type", default)]
    pub kind: LectureType,
    /// Batch tags; empty means the whole class.
    #[serde(default)]
    pub batches: Vec<String>,
    #[serde(default)]
    pub weekly_hours: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_room: Option<String>,
    /// When set, the session may only be placed on this day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
}

impl Subject {
    /// Returns true if the session may be placed on `day`.
    pub fn is_eligible_on(&self, day: &str) -> bool {
        match self.day.as_deref() {
            None => true,
            Some(bound) => bound.trim().is_empty() || bound == day,
        }
    }
}

/// One row of a day's timetable: a lecture or a break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    #[serde(default)]
    pub id: String,
    pub time_start: TimeOfDay,
    pub time_end: TimeOfDay,
    pub subject_name: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub room: String,
    #[serde(rename = "type", default)]
    pub kind: LectureType,
    #[serde(default)]
    pub batches: Vec<String>,
    pub is_break: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_label: Option<String>,
}

impl ScheduleEntry {
    /// Length of the entry in minutes.
    pub fn duration_minutes(&self) -> i32 {
        self.time_start.minutes_until(self.time_end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: String,
    /// Always ordered by `time_start`.
    pub entries: Vec<ScheduleEntry>,
}

/// A full weekly timetable, one [`DaySchedule`] per working day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    pub days: Vec<DaySchedule>,
}

impl ScheduleDocument {
    pub fn day(&self, name: &str) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.day == name)
    }

    pub fn day_mut(&mut self, name: &str) -> Option<&mut DaySchedule> {
        self.days.iter_mut().find(|d| d.day == name)
    }

    /// Gives every entry without an id, or repeating an id already seen on
    /// its day, a fresh one.
    ///
    /// Returns the number of ids assigned.
    pub fn ensure_entry_ids(&mut self) -> usize {
        let mut assigned = 0;
        for day in &mut self.days {
            let mut seen = HashSet::new();
            for entry in &mut day.entries {
                if entry.id.trim().is_empty() || !seen.insert(entry.id.clone()) {
                    entry.id = Uuid::new_v4().to_string();
                    seen.insert(entry.id.clone());
                    assigned += 1;
                }
            }
        }
        assigned
    }

    /// Total number of entries across all days.
    pub fn entry_count(&self) -> usize {
        self.days.iter().map(|d| d.entries.len()).sum()
    }
}

/// Operating hours for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTiming {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl DayTiming {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }
}

impl Default for DayTiming {
    /// 08:00 to 14:45.
    fn default() -> Self {
        Self::new(
            TimeOfDay::saturating_from_minutes(8 * 60),
            TimeOfDay::saturating_from_minutes(14 * 60 + 45),
        )
    }
}

/// Institution-wide scheduling constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    #[serde(default)]
    pub college_name: String,
    #[serde(default)]
    pub department: String,
    pub working_days: Vec<String>,
    #[serde(default)]
    pub day_timings: HashMap<String, DayTiming>,
    #[serde(default)]
    pub breaks: Vec<BreakRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rules: Option<String>,
}

impl Constraints {
    /// Operating hours configured for `day`, if any.
    pub fn timing_for(&self, day: &str) -> Option<DayTiming> {
        self.day_timings.get(day).copied()
    }
}

impl Default for Constraints {
    fn default() -> Self {
        let days = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
        let timing = DayTiming::default();

        Self {
            college_name: "Chronos Tech Institute".to_string(),
            department: "Computer Science".to_string(),
            working_days: days.iter().map(|d| d.to_string()).collect(),
            day_timings: days.iter().map(|d| (d.to_string(), timing)).collect(),
            breaks: vec![
                BreakRule {
                    id: "1".to_string(),
                    label: "Short Break".to_string(),
                    duration: 15,
                    after_lecture: 2,
                },
                BreakRule {
                    id: "2".to_string(),
                    label: "Lunch Break".to_string(),
                    duration: 30,
                    after_lecture: 4,
                },
            ],
            custom_rules: None,
        }
    }
}

/// An immutable snapshot of a finished timetable and the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTimetable {
    pub id: String,
    pub data: ScheduleDocument,
    pub constraints: Constraints,
    pub subjects: Vec<Subject>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl SavedTimetable {
    /// Snapshots a timetable with a fresh id and the current time.
    pub fn snapshot(data: ScheduleDocument, constraints: Constraints, subjects: Vec<Subject>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            data,
            constraints,
            subjects,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
