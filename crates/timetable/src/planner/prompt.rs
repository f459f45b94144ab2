//! Prompt and response-schema construction for the AI planner.
use serde_json::{json, Value};

use crate::timetable::{Constraints, DayTiming, Subject, TimeOfDay};

/// Builds the planner prompt.
///
/// Custom rules take priority over the structured per-day inventory. Sessions
/// without a day binding are listed separately so they are not lost.
pub fn build_prompt(constraints: &Constraints, subjects: &[Subject]) -> String {
    // Quoted for working days without their own timing.
    let fallback = DayTiming::new(
        TimeOfDay::saturating_from_minutes(8 * 60),
        TimeOfDay::saturating_from_minutes(15 * 60),
    );

    let hours = constraints
        .working_days
        .iter()
        .map(|day| {
            let timing = constraints.timing_for(day).unwrap_or(fallback);
            format!("- {}: {} to {}", day, timing.start, timing.end)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let breaks = if constraints.breaks.is_empty() {
        "None".to_string()
    } else {
        constraints
            .breaks
            .iter()
            .map(|b| format!("- {}: {} mins after lecture {}", b.label, b.duration, b.after_lecture))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut inventory: Vec<String> = constraints
        .working_days
        .iter()
        .map(|day| {
            let day_subjects: Vec<&Subject> = subjects
                .iter()
                .filter(|s| s.day.as_deref() == Some(day.as_str()))
                .collect();

            if day_subjects.is_empty() {
                format!("Day: {} [Use Custom Logic]", day)
            } else {
                format!("Day: {} INV:\n{}", day, inventory_lines(&day_subjects))
            }
        })
        .collect();

    let unbound: Vec<&Subject> = subjects
        .iter()
        .filter(|s| s.day.as_deref().map_or(true, |d| d.trim().is_empty()))
        .collect();
    if !unbound.is_empty() {
        inventory.push(format!("Any Day INV:\n{}", inventory_lines(&unbound)));
    }

    let custom_rules = constraints
        .custom_rules
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or("None");

    format!(
        "Generate Weekly Timetable JSON.\n\
         Days: {days}.\n\
         College: {college}\n\
         Department: {department}\n\
         Hours:\n{hours}\n\
         Breaks:\n{breaks}\n\n\
         CUSTOM LOGIC (PRIORITY 1):\n{custom_rules}\n\n\
         INVENTORY (PRIORITY 2):\n{inventory}\n\n\
         RULES:\n\
         1. Exec Custom Logic exactly.\n\
         2. Parallel batches = separate entries.\n\
         3. Practical=2hr, Theory=1hr.\n\
         4. Times as 24-hour HH:MM.\n\
         5. Output strictly valid JSON.\n",
        days = constraints.working_days.join(", "),
        college = constraints.college_name,
        department = constraints.department,
        hours = hours,
        breaks = breaks,
        custom_rules = custom_rules,
        inventory = inventory.join("\n"),
    )
}

/// One condensed line per session: `- name (type, room, batches)`.
fn inventory_lines(subjects: &[&Subject]) -> String {
    subjects
        .iter()
        .map(|s| {
            let room = s
                .assigned_room
                .as_deref()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or("Any room");
            let batches = if s.batches.is_empty() {
                "All".to_string()
            } else {
                s.batches.join("")
            };
            format!("- {} ({}, {}, {})", s.name, s.kind, room, batches)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON schema the planner must answer with; mirrors `ScheduleDocument`.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "days": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "STRING" },
                        "entries": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "id": { "type": "STRING" },
                                    "timeStart": { "type": "STRING" },
                                    "timeEnd": { "type": "STRING" },
                                    "subjectName": { "type": "STRING" },
                                    "teacher": { "type": "STRING" },
                                    "room": { "type": "STRING" },
                                    "type": { "type": "STRING", "enum": ["Theory", "Practical"] },
                                    "batches": { "type": "ARRAY", "items": { "type": "STRING" } },
                                    "isBreak": { "type": "BOOLEAN" },
                                    "breakLabel": { "type": "STRING" }
                                },
                                "required": ["timeStart", "timeEnd", "subjectName", "room", "isBreak"]
                            }
                        }
                    },
                    "required": ["day", "entries"]
                }
            }
        },
        "required": ["days"]
    })
}
