//! Splits a day's operating window into lecture and break slots.
//!
//! # Algorithm
//!
//! 1. Order break rules by `after_lecture` (stable).
//! 2. From the day start, emit 60-minute lecture slots, clamping the last one
//!    to the day end and stopping once nothing is left.
//! 3. After the k-th lecture, emit every break rule with `after_lecture == k`
//!    that still fits before the day end. A break that does not fit is dropped.
//!
//! The output is contiguous: each slot ends where the next one starts, the
//! first slot starts at the day start and the last ends no later than the day
//! end.

use serde::Serialize;

use super::model::BreakRule;
use super::time::TimeOfDay;

/// Nominal length of a lecture slot in minutes.
pub const LECTURE_MINUTES: i32 = 60;

/// A typed interval produced by [`partition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub is_break: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TimeSlot {
    pub fn lecture(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            start,
            end,
            is_break: false,
            label: None,
        }
    }

    pub fn rest(start: TimeOfDay, end: TimeOfDay, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            is_break: true,
            label: Some(label.into()),
        }
    }

    pub fn duration_minutes(&self) -> i32 {
        self.start.minutes_until(self.end)
    }
}

/// Partitions `[day_start, day_end)` into lecture and break slots.
///
/// A window where `day_start >= day_end` yields no slots.
pub fn partition(day_start: TimeOfDay, day_end: TimeOfDay, breaks: &[BreakRule]) -> Vec<TimeSlot> {
    let mut rules: Vec<&BreakRule> = breaks.iter().collect();
    rules.sort_by_key(|rule| rule.after_lecture);
    let mut fired = vec![false; rules.len()];

    let end = i32::from(day_end.minutes());
    let mut cursor = i32::from(day_start.minutes());
    let mut lecture_count = 0u32;
    let mut slots = Vec::new();

    while cursor < end {
        let block = LECTURE_MINUTES.min(end - cursor);
        if block <= 0 {
            break;
        }

        slots.push(TimeSlot::lecture(at(cursor), at(cursor + block)));
        cursor += block;
        lecture_count += 1;

        for (rule, fired) in rules.iter().zip(fired.iter_mut()) {
            if *fired || rule.after_lecture != lecture_count {
                continue;
            }
            *fired = true;

            let duration = i32::from(rule.duration);
            if duration == 0 || cursor + duration > end {
                continue;
            }

            slots.push(TimeSlot::rest(at(cursor), at(cursor + duration), rule.label.as_str()));
            cursor += duration;
        }
    }

    slots
}

// `cursor` never leaves `[day_start, day_end]`, so clamping never changes the value.
fn at(minutes: i32) -> TimeOfDay {
    TimeOfDay::saturating_from_minutes(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn rule(label: &str, duration: u16, after_lecture: u32) -> BreakRule {
        BreakRule {
            id: label.to_lowercase(),
            label: label.to_string(),
            duration,
            after_lecture,
        }
    }

    fn render(slots: &[TimeSlot]) -> Vec<String> {
        slots
            .iter()
            .map(|s| {
                let suffix = if s.is_break { "(break)" } else { "" };
                format!("{}-{}{}", s.start, s.end, suffix)
            })
            .collect()
    }

    fn assert_contiguous(slots: &[TimeSlot], start: TimeOfDay, end: TimeOfDay) {
        assert_eq!(slots.first().map(|s| s.start), Some(start));
        assert!(slots.last().unwrap().end <= end);
        for slot in slots {
            assert!(slot.start < slot.end, "empty slot {:?}", slot);
        }
        for pair in slots.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_standard_day_with_two_breaks() {
        let breaks = vec![rule("Short Break", 15, 2), rule("Lunch Break", 30, 4)];
        let slots = partition(t("08:00"), t("14:45"), &breaks);

        assert_eq!(
            render(&slots),
            vec![
                "08:00-09:00",
                "09:00-10:00",
                "10:00-10:15(break)",
                "10:15-11:15",
                "11:15-12:15",
                "12:15-12:45(break)",
                "12:45-13:45",
                "13:45-14:45",
            ]
        );
        assert_eq!(slots[2].label.as_deref(), Some("Short Break"));
        assert_eq!(slots[5].label.as_deref(), Some("Lunch Break"));
        assert_contiguous(&slots, t("08:00"), t("14:45"));
    }

    #[test]
    fn test_short_window_yields_single_truncated_slot() {
        let slots = partition(t("08:00"), t("08:40"), &[]);
        assert_eq!(render(&slots), vec!["08:00-08:40"]);
        assert_eq!(slots[0].duration_minutes(), 40);
    }

    #[test]
    fn test_short_window_ignores_breaks() {
        let slots = partition(t("08:00"), t("08:40"), &[rule("Break", 10, 1)]);
        assert_eq!(render(&slots), vec!["08:00-08:40"]);
    }

    #[test]
    fn test_last_lecture_is_truncated() {
        let slots = partition(t("08:00"), t("10:30"), &[]);
        assert_eq!(render(&slots), vec!["08:00-09:00", "09:00-10:00", "10:00-10:30"]);
    }

    #[test]
    fn test_break_that_overflows_is_dropped() {
        let slots = partition(t("08:00"), t("10:20"), &[rule("Long Break", 30, 2)]);
        assert_eq!(render(&slots), vec!["08:00-09:00", "09:00-10:00", "10:00-10:20"]);
        assert!(slots.iter().all(|s| !s.is_break));
    }

    #[test]
    fn test_break_order_does_not_matter_in_input() {
        let ordered = vec![rule("Short Break", 15, 2), rule("Lunch Break", 30, 4)];
        let reversed = vec![rule("Lunch Break", 30, 4), rule("Short Break", 15, 2)];
        assert_eq!(
            partition(t("08:00"), t("14:45"), &ordered),
            partition(t("08:00"), t("14:45"), &reversed)
        );
    }

    #[test]
    fn test_same_position_breaks_fire_back_to_back() {
        let breaks = vec![rule("Tea", 10, 1), rule("Stretch", 5, 1)];
        let slots = partition(t("08:00"), t("10:15"), &breaks);
        assert_eq!(
            render(&slots),
            vec!["08:00-09:00", "09:00-09:10(break)", "09:10-09:15(break)", "09:15-10:15"]
        );
        assert_eq!(slots[1].label.as_deref(), Some("Tea"));
        assert_eq!(slots[2].label.as_deref(), Some("Stretch"));
    }

    #[test]
    fn test_break_after_zero_lectures_never_fires() {
        let slots = partition(t("08:00"), t("10:00"), &[rule("Never", 15, 0)]);
        assert_eq!(render(&slots), vec!["08:00-09:00", "09:00-10:00"]);
    }

    #[test]
    fn test_zero_duration_break_is_skipped() {
        let slots = partition(t("08:00"), t("10:00"), &[rule("Nothing", 0, 1)]);
        assert_eq!(render(&slots), vec!["08:00-09:00", "09:00-10:00"]);
    }

    #[test]
    fn test_empty_or_inverted_window() {
        assert!(partition(t("09:00"), t("09:00"), &[]).is_empty());
        assert!(partition(t("10:00"), t("09:00"), &[]).is_empty());
    }

    #[test]
    fn test_partition_is_pure() {
        let breaks = vec![rule("Short Break", 15, 2), rule("Lunch Break", 30, 4)];
        let first = partition(t("07:10"), t("16:55"), &breaks);
        let second = partition(t("07:10"), t("16:55"), &breaks);
        assert_eq!(first, second);
    }

    #[test]
    fn test_contiguity_over_many_windows() {
        let breaks = vec![rule("A", 15, 1), rule("B", 45, 3), rule("C", 20, 3), rule("D", 5, 6)];
        for start in (0..(20 * 60)).step_by(37) {
            for length in [1u16, 30, 59, 60, 61, 125, 240, 397, 600] {
                let end = start + length;
                if end >= 24 * 60 {
                    continue;
                }
                let (s, e) = (
                    TimeOfDay::from_minutes(start).unwrap(),
                    TimeOfDay::from_minutes(end).unwrap(),
                );
                assert_contiguous(&partition(s, e, &breaks), s, e);
            }
        }
    }

    #[test]
    fn test_break_directly_follows_kth_lecture() {
        let breaks = vec![rule("After three", 20, 3)];
        let slots = partition(t("09:00"), t("15:00"), &breaks);
        let lectures_before = slots.iter().take_while(|s| !s.is_break).count();
        assert_eq!(lectures_before, 3);
        assert!(slots[3].is_break);
        assert_eq!(slots[3].start, t("12:00"));
        assert_eq!(slots[3].end, t("12:20"));
    }
}
