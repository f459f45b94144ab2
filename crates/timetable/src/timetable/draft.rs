//! Quick-draft generation: a round-robin slot filler.
//!
//! For each working day the window is partitioned into slots and the eligible
//! sessions are walked cyclically from a seeded random starting point, one
//! session per lecture slot. No room or teacher conflicts are checked and
//! weekly hour totals are not honoured.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::LazyLock;
use tracing::debug;
use uuid::{Builder, Uuid};

use super::model::{Constraints, DaySchedule, DayTiming, LectureType, ScheduleDocument, ScheduleEntry, Subject};
use super::partition::{partition, TimeSlot};

/// Lecture slots at least this long are always practicals.
pub const PRACTICAL_SLOT_MINUTES: i32 = 120;

const DEFAULT_PRACTICAL_ROOM: &str = "Lab-A";
const DEFAULT_THEORY_ROOM: &str = "LH-101";
const DEFAULT_TEACHER: &str = "Faculty";
const BREAK_PLACEHOLDER: &str = "-";

/// Used when the draft has no sessions at all, so it is never blank.
static PLACEHOLDER_SESSIONS: LazyLock<Vec<Subject>> = LazyLock::new(|| {
    [
        ("Advanced Algorithms", "Dr. Smith", LectureType::Theory),
        ("Database Systems", "Prof. Johnson", LectureType::Practical),
        ("System Design", "Dr. Brown", LectureType::Theory),
        ("Cloud Computing", "Prof. Davis", LectureType::Practical),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, teacher, kind))| Subject {
        id: format!("placeholder-{}", i + 1),
        name: name.to_string(),
        teacher: teacher.to_string(),
        kind,
        batches: Vec::new(),
        weekly_hours: 0,
        assigned_room: None,
        day: None,
    })
    .collect()
});

/// Deterministic local timetable generator.
#[derive(Debug, Clone, Copy)]
pub struct DraftScheduler {
    /// Window used for working days without their own timing.
    fallback: DayTiming,
}

impl DraftScheduler {
    pub fn new(fallback: DayTiming) -> Self {
        Self { fallback }
    }

    /// Builds a draft timetable for every working day, in configured order.
    ///
    /// The same `seed` and inputs always produce the same document, ids included.
    pub fn draft(&self, constraints: &Constraints, sessions: &[Subject], seed: u64) -> ScheduleDocument {
        debug!(seed, sessions = sessions.len(), "Drafting timetable");
        let mut rng = StdRng::seed_from_u64(seed);

        let days = constraints
            .working_days
            .iter()
            .map(|day| {
                let window = constraints.timing_for(day).unwrap_or(self.fallback);
                let slots = partition(window.start, window.end, &constraints.breaks);

                let eligible: Vec<&Subject> = if sessions.is_empty() {
                    PLACEHOLDER_SESSIONS.iter().collect()
                } else {
                    sessions.iter().filter(|s| s.is_eligible_on(day)).collect()
                };

                // Every session is bound to another day.
                if eligible.is_empty() {
                    debug!(day = %day, "No sessions eligible, leaving day empty");
                    return DaySchedule {
                        day: day.clone(),
                        entries: Vec::new(),
                    };
                }

                let start = rng.gen_range(0..eligible.len());
                debug!(day = %day, slots = slots.len(), start, "Filling day");

                DaySchedule {
                    day: day.clone(),
                    entries: fill_slots(&slots, &eligible, start, &mut rng),
                }
            })
            .collect();

        ScheduleDocument { days }
    }
}

impl Default for DraftScheduler {
    fn default() -> Self {
        Self::new(DayTiming::default())
    }
}

/// Assigns sessions to lecture slots round-robin, starting at `start`.
///
/// Break slots become break entries and do not advance the session cursor.
/// `sessions` must not be empty.
pub fn fill_slots<R: Rng>(
    slots: &[TimeSlot],
    sessions: &[&Subject],
    start: usize,
    rng: &mut R,
) -> Vec<ScheduleEntry> {
    let mut session_idx = start;
    let mut entries = Vec::with_capacity(slots.len());

    for slot in slots {
        let id = entry_id(rng);

        if slot.is_break {
            entries.push(ScheduleEntry {
                id,
                time_start: slot.start,
                time_end: slot.end,
                subject_name: slot.label.clone().unwrap_or_else(|| "Break".to_string()),
                teacher: BREAK_PLACEHOLDER.to_string(),
                room: BREAK_PLACEHOLDER.to_string(),
                kind: LectureType::Theory,
                batches: Vec::new(),
                is_break: true,
                break_label: slot.label.clone(),
            });
            continue;
        }

        let session = sessions[session_idx % sessions.len()];
        let kind = if slot.duration_minutes() >= PRACTICAL_SLOT_MINUTES {
            LectureType::Practical
        } else {
            session.kind
        };

        let room = session
            .assigned_room
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(default_room(kind))
            .to_string();

        let subject_name = if session.name.trim().is_empty() {
            match kind {
                LectureType::Practical => "Practical Session".to_string(),
                LectureType::Theory => "Theory Lecture".to_string(),
            }
        } else {
            session.name.clone()
        };

        let teacher = if session.teacher.trim().is_empty() {
            DEFAULT_TEACHER.to_string()
        } else {
            session.teacher.clone()
        };

        entries.push(ScheduleEntry {
            id,
            time_start: slot.start,
            time_end: slot.end,
            subject_name,
            teacher,
            room,
            kind,
            batches: session.batches.clone(),
            is_break: false,
            break_label: None,
        });
        session_idx += 1;
    }

    entries
}

fn default_room(kind: LectureType) -> &'static str {
    match kind {
        LectureType::Practical => DEFAULT_PRACTICAL_ROOM,
        LectureType::Theory => DEFAULT_THEORY_ROOM,
    }
}

/// A v4 UUID drawn from the draft's own generator so drafts stay reproducible.
fn entry_id<R: Rng>(rng: &mut R) -> String {
    let uuid: Uuid = Builder::from_random_bytes(rng.gen()).into_uuid();
    uuid.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::model::BreakRule;
    use crate::timetable::time::TimeOfDay;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn subject(name: &str, kind: LectureType) -> Subject {
        Subject {
            id: name.to_lowercase(),
            name: name.to_string(),
            teacher: format!("Teacher of {}", name),
            kind,
            batches: Vec::new(),
            weekly_hours: 3,
            assigned_room: None,
            day: None,
        }
    }

    fn constraints(days: &[&str], start: &str, end: &str, breaks: Vec<BreakRule>) -> Constraints {
        Constraints {
            college_name: "Test College".to_string(),
            department: "Testing".to_string(),
            working_days: days.iter().map(|d| d.to_string()).collect(),
            day_timings: days
                .iter()
                .map(|d| (d.to_string(), DayTiming::new(t(start), t(end))))
                .collect(),
            breaks,
            custom_rules: None,
        }
    }

    fn lecture_names(day: &DaySchedule) -> Vec<&str> {
        day.entries
            .iter()
            .filter(|e| !e.is_break)
            .map(|e| e.subject_name.as_str())
            .collect()
    }

    #[test]
    fn test_round_robin_is_contiguous_cyclic_walk() {
        let sessions = vec![
            subject("Alpha", LectureType::Theory),
            subject("Beta", LectureType::Theory),
            subject("Gamma", LectureType::Theory),
        ];
        let c = constraints(&["Monday"], "08:00", "12:00", Vec::new());

        for seed in 0..20 {
            let doc = DraftScheduler::default().draft(&c, &sessions, seed);
            let names = lecture_names(&doc.days[0]);
            assert_eq!(names.len(), 4);

            let start = sessions.iter().position(|s| s.name == names[0]).unwrap();
            for (offset, name) in names.iter().enumerate() {
                assert_eq!(*name, sessions[(start + offset) % 3].name);
            }
        }
    }

    #[test]
    fn test_same_seed_same_document() {
        let sessions = vec![
            subject("Alpha", LectureType::Theory),
            subject("Beta", LectureType::Practical),
        ];
        let c = Constraints::default();
        let scheduler = DraftScheduler::default();
        assert_eq!(scheduler.draft(&c, &sessions, 42), scheduler.draft(&c, &sessions, 42));
    }

    #[test]
    fn test_long_slot_forces_practical() {
        let session = subject("Lecture Only", LectureType::Theory);
        let slots = vec![
            TimeSlot::lecture(t("08:00"), t("10:00")),
            TimeSlot::lecture(t("10:00"), t("11:00")),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let entries = fill_slots(&slots, &[&session], 0, &mut rng);

        assert_eq!(entries[0].kind, LectureType::Practical);
        assert_eq!(entries[0].room, "Lab-A");
        assert_eq!(entries[1].kind, LectureType::Theory);
        assert_eq!(entries[1].room, "LH-101");
    }

    #[test]
    fn test_breaks_do_not_advance_cursor() {
        let a = subject("A", LectureType::Theory);
        let b = subject("B", LectureType::Theory);
        let slots = vec![
            TimeSlot::lecture(t("08:00"), t("09:00")),
            TimeSlot::rest(t("09:00"), t("09:15"), "Tea"),
            TimeSlot::lecture(t("09:15"), t("10:15")),
            TimeSlot::lecture(t("10:15"), t("11:15")),
        ];
        let mut rng = StdRng::seed_from_u64(1);
        let entries = fill_slots(&slots, &[&a, &b], 1, &mut rng);

        let names: Vec<_> = entries.iter().map(|e| e.subject_name.as_str()).collect();
        assert_eq!(names, vec!["B", "Tea", "A", "B"]);

        let tea = &entries[1];
        assert!(tea.is_break);
        assert_eq!(tea.teacher, "-");
        assert_eq!(tea.room, "-");
        assert!(tea.batches.is_empty());
        assert_eq!(tea.break_label.as_deref(), Some("Tea"));
    }

    #[test]
    fn test_assigned_room_and_batches_carried() {
        let mut lab = subject("Networks Lab", LectureType::Practical);
        lab.assigned_room = Some("Lab-3".to_string());
        lab.batches = vec!["X".to_string(), "Y".to_string()];

        let slots = vec![TimeSlot::lecture(t("08:00"), t("09:00"))];
        let mut rng = StdRng::seed_from_u64(3);
        let entries = fill_slots(&slots, &[&lab], 0, &mut rng);

        assert_eq!(entries[0].room, "Lab-3");
        assert_eq!(entries[0].kind, LectureType::Practical);
        assert_eq!(entries[0].batches, vec!["X", "Y"]);
    }

    #[test]
    fn test_empty_sessions_use_placeholders() {
        let c = constraints(&["Monday", "Tuesday"], "08:00", "10:00", Vec::new());
        let doc = DraftScheduler::default().draft(&c, &[], 9);

        assert_eq!(doc.days.len(), 2);
        for day in &doc.days {
            assert_eq!(day.entries.len(), 2);
            for name in lecture_names(day) {
                assert!(PLACEHOLDER_SESSIONS.iter().any(|s| s.name == name));
            }
        }
    }

    #[test]
    fn test_day_bound_sessions_only_on_their_day() {
        let mut monday_only = subject("Monday Seminar", LectureType::Theory);
        monday_only.day = Some("Monday".to_string());
        let anywhere = subject("Anywhere", LectureType::Theory);

        let c = constraints(&["Monday", "Tuesday"], "08:00", "12:00", Vec::new());
        let doc = DraftScheduler::default().draft(&c, &[monday_only, anywhere], 11);

        let tuesday = lecture_names(doc.day("Tuesday").unwrap());
        assert!(tuesday.iter().all(|n| *n == "Anywhere"));
        let monday = lecture_names(doc.day("Monday").unwrap());
        assert!(monday.contains(&"Monday Seminar"));
    }

    #[test]
    fn test_day_without_eligible_sessions_stays_empty() {
        let mut monday_only = subject("Monday Seminar", LectureType::Theory);
        monday_only.day = Some("Monday".to_string());

        let c = constraints(&["Monday", "Tuesday"], "08:00", "10:00", Vec::new());
        let doc = DraftScheduler::default().draft(&c, &[monday_only], 4);

        assert_eq!(lecture_names(doc.day("Monday").unwrap()), vec!["Monday Seminar"; 2]);
        assert!(doc.day("Tuesday").unwrap().entries.is_empty());
        assert!(doc
            .days
            .iter()
            .flat_map(|d| d.entries.iter())
            .all(|e| !PLACEHOLDER_SESSIONS.iter().any(|p| p.name == e.subject_name)));
    }

    #[test]
    fn test_fallback_window_when_day_has_no_timing() {
        let mut c = constraints(&["Monday"], "08:00", "09:00", Vec::new());
        c.working_days.push("Saturday".to_string());

        let scheduler = DraftScheduler::new(DayTiming::new(t("10:00"), t("12:00")));
        let doc = scheduler.draft(&c, &[subject("A", LectureType::Theory)], 5);

        assert_eq!(doc.days[0].day, "Monday");
        assert_eq!(doc.days[0].entries.len(), 1);
        let saturday = &doc.days[1];
        assert_eq!(saturday.day, "Saturday");
        assert_eq!(saturday.entries.first().unwrap().time_start, t("10:00"));
        assert_eq!(saturday.entries.last().unwrap().time_end, t("12:00"));
    }

    #[test]
    fn test_days_follow_configured_order_and_entries_sorted() {
        let mut c = Constraints::default();
        c.working_days = vec!["Friday".to_string(), "Monday".to_string()];
        let doc = DraftScheduler::default().draft(&c, &[subject("A", LectureType::Theory)], 0);

        let order: Vec<_> = doc.days.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(order, vec!["Friday", "Monday"]);
        for day in &doc.days {
            assert!(day.entries.windows(2).all(|w| w[0].time_start <= w[1].time_start));
        }
    }

    #[test]
    fn test_entry_ids_unique() {
        let doc = DraftScheduler::default().draft(&Constraints::default(), &[], 123);
        let ids: std::collections::HashSet<_> = doc
            .days
            .iter()
            .flat_map(|d| d.entries.iter().map(|e| e.id.clone()))
            .collect();
        assert_eq!(ids.len(), doc.entry_count());
    }
}
