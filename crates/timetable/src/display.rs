use std::collections::BTreeMap;
use std::fmt;

use crate::timetable::{Constraints, ScheduleDocument, ScheduleEntry, TimeOfDay};

/// Groups a day's entries by identical start and end, in time order.
///
/// Entries inside a group keep their document order.
pub fn group_concurrent(entries: &[ScheduleEntry]) -> Vec<Vec<&ScheduleEntry>> {
    let mut groups: BTreeMap<(TimeOfDay, TimeOfDay), Vec<&ScheduleEntry>> = BTreeMap::new();
    for entry in entries {
        groups
            .entry((entry.time_start, entry.time_end))
            .or_default()
            .push(entry);
    }
    groups.into_values().collect()
}

/// Formats one entry as a single line
pub fn format_entry(entry: &ScheduleEntry) -> String {
    if entry.is_break {
        return entry
            .break_label
            .clone()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| entry.subject_name.clone());
    }

    let line = format!(
        "{} ({}) | {} | {}",
        entry.subject_name, entry.kind, entry.teacher, entry.room
    );
    if entry.batches.is_empty() {
        line
    } else {
        format!("{} | Batches: {}", line, entry.batches.join(", "))
    }
}

/// Plain-text view of a timetable, one section per day.
struct TimetableText<'a> {
    constraints: &'a Constraints,
    document: &'a ScheduleDocument,
}

impl fmt::Display for TimetableText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "** {} | {} **",
            self.constraints.college_name, self.constraints.department
        )?;

        for day in &self.document.days {
            writeln!(f, "\n== {} ==", day.day)?;
            if day.entries.is_empty() {
                writeln!(f, "  [NO SESSIONS]")?;
                continue;
            }

            for group in group_concurrent(&day.entries) {
                let first = group[0];
                let concurrent = if group.len() > 1 { " [Concurrent]" } else { "" };
                writeln!(
                    f,
                    "{} - {}{}",
                    first.time_start.to_12_hour(),
                    first.time_end.to_12_hour(),
                    concurrent
                )?;
                for entry in group {
                    writeln!(f, "  {}", format_entry(entry))?;
                }
            }
        }

        Ok(())
    }
}

/// Renders the whole timetable as plain text with 12-hour times.
pub fn render_timetable(constraints: &Constraints, document: &ScheduleDocument) -> String {
    TimetableText {
        constraints,
        document,
    }
    .to_string()
}

/// File name for an exported timetable, derived from the college name
pub fn export_file_name(college_name: &str) -> String {
    let clean: String = if college_name.is_empty() {
        "timetable".to_string()
    } else {
        college_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect()
    };
    format!("{}_schedule.txt", clean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::{DaySchedule, LectureType};

    fn entry(start: &str, end: &str, name: &str, is_break: bool) -> ScheduleEntry {
        ScheduleEntry {
            id: name.to_lowercase(),
            time_start: start.parse().unwrap(),
            time_end: end.parse().unwrap(),
            subject_name: name.to_string(),
            teacher: "Dr. Smith".to_string(),
            room: "LH-101".to_string(),
            kind: LectureType::Theory,
            batches: Vec::new(),
            is_break,
            break_label: is_break.then(|| name.to_string()),
        }
    }

    #[test]
    fn test_group_concurrent() {
        let entries = vec![
            entry("09:00", "10:00", "B", false),
            entry("08:00", "09:00", "A", false),
            entry("09:00", "10:00", "C", false),
        ];
        let groups = group_concurrent(&entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0][0].subject_name, "A");
        let names: Vec<_> = groups[1].iter().map(|e| e.subject_name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn test_render() {
        let mut lab = entry("13:00", "15:00", "Networks Lab", false);
        lab.kind = LectureType::Practical;
        lab.batches = vec!["X".to_string(), "Y".to_string()];
        let mut parallel = entry("13:00", "15:00", "Compilers Lab", false);
        parallel.kind = LectureType::Practical;

        let document = ScheduleDocument {
            days: vec![
                DaySchedule {
                    day: "Monday".to_string(),
                    entries: vec![
                        entry("08:00", "09:00", "Compilers", false),
                        entry("09:00", "09:15", "Short Break", true),
                        lab,
                        parallel,
                    ],
                },
                DaySchedule {
                    day: "Tuesday".to_string(),
                    entries: Vec::new(),
                },
            ],
        };

        let text = render_timetable(&Constraints::default(), &document);
        assert!(text.starts_with("** Chronos Tech Institute | Computer Science **"));
        assert!(text.contains("8:00 AM - 9:00 AM\n  Compilers (Theory) | Dr. Smith | LH-101\n"));
        assert!(text.contains("9:00 AM - 9:15 AM\n  Short Break\n"));
        assert!(text.contains(
            "1:00 PM - 3:00 PM [Concurrent]\n  Networks Lab (Practical) | Dr. Smith | LH-101 | Batches: X, Y\n"
        ));
        assert!(text.contains("== Tuesday ==\n  [NO SESSIONS]"));
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Chronos Tech Institute"), "chronos_tech_institute_schedule.txt");
        assert_eq!(export_file_name("St. Mary's"), "st__mary_s_schedule.txt");
        assert_eq!(export_file_name(""), "timetable_schedule.txt");
    }
}
