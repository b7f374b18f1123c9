//! Weekly schedule aggregation.
//!
//! Groups flat recurring slots by weekday and orders them for a
//! calendar-style view. Two day orders exist:
//!
//! - `Fixed`: Sunday → Saturday, every day emitted (empty days included),
//!   used for general activity listings.
//! - `FromToday(k)`: starts at weekday `k` and wraps after Saturday; empty days
//!   are omitted, so the first bucket is the next day that has something.
//!
//! Slots with a weekday outside 0..=6 are dropped and logged. When nothing
//! is left, the output is empty in both orders.

use crate::models::Stored;
use crate::models::schedule::ScheduleActivity;
use crate::utils::date::WEEKDAY_LABELS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOrder {
    Fixed,
    /// Weekday index of "today", 0=Sunday
    FromToday(u8),
}

impl DayOrder {
    /// "fixed" or "today"; `today` is the weekday used by the rotating order.
    pub fn parse(s: &str, today: u8) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fixed" | "week" => Some(DayOrder::Fixed),
            "today" | "rotating" => Some(DayOrder::FromToday(today)),
            _ => None,
        }
    }
}

/// Anything that sits on a weekday at a start time.
pub trait Slot: Clone {
    /// Raw weekday index, 0=Sunday. May be out of range.
    fn weekday(&self) -> i64;
    /// Zero-padded "HH:MM"
    fn start(&self) -> &str;
}

impl Slot for ScheduleActivity {
    fn weekday(&self) -> i64 {
        self.weekday
    }
    fn start(&self) -> &str {
        &self.start
    }
}

impl Slot for Stored<ScheduleActivity> {
    fn weekday(&self) -> i64 {
        self.data.weekday
    }
    fn start(&self) -> &str {
        &self.data.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket<T> {
    pub weekday: u8,
    pub label: &'static str,
    pub activities: Vec<T>,
}

/// Group `items` by weekday, sort each day by start time, order the days.
/// The input is only read.
pub fn aggregate<T: Slot>(items: &[T], order: DayOrder) -> Vec<DayBucket<T>> {
    let mut buckets: [Vec<T>; 7] = Default::default();

    for item in items {
        match u8::try_from(item.weekday()).ok().filter(|d| *d < 7) {
            Some(d) => buckets[d as usize].push(item.clone()),
            None => log::warn!(
                "dropping schedule slot at {} with weekday index {}",
                item.start(),
                item.weekday()
            ),
        }
    }

    if buckets.iter().all(Vec::is_empty) {
        return Vec::new();
    }

    // stable: equal start times keep input order
    for b in buckets.iter_mut() {
        b.sort_by(|a, b| a.start().cmp(b.start()));
    }

    let (days, keep_empty) = match order {
        DayOrder::Fixed => ((0..7).collect::<Vec<u8>>(), true),
        DayOrder::FromToday(today) => ((0..7).map(|i| (today % 7 + i) % 7).collect(), false),
    };

    let mut buckets = buckets.map(Some);
    days.into_iter()
        .filter_map(|d| {
            let activities = buckets[d as usize].take().unwrap_or_default();
            if activities.is_empty() && !keep_empty {
                return None;
            }
            Some(DayBucket {
                weekday: d,
                label: WEEKDAY_LABELS[d as usize],
                activities,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: i64, start: &str, subject: &str) -> ScheduleActivity {
        ScheduleActivity {
            weekday: day,
            subject: subject.to_string(),
            start: start.to_string(),
            end: "23:00".to_string(),
            color: "#3366ff".to_string(),
        }
    }

    fn order_of(out: &[DayBucket<ScheduleActivity>]) -> Vec<u8> {
        out.iter().map(|b| b.weekday).collect()
    }

    #[test]
    fn empty_input_is_empty_output() {
        let none: Vec<ScheduleActivity> = Vec::new();
        assert!(aggregate(&none, DayOrder::Fixed).is_empty());
        assert!(aggregate(&none, DayOrder::FromToday(3)).is_empty());
    }

    #[test]
    fn only_invalid_days_is_empty_output() {
        let input = vec![slot(9, "09:00", "bad")];
        assert!(aggregate(&input, DayOrder::Fixed).is_empty());
        assert!(aggregate(&input, DayOrder::FromToday(1)).is_empty());
    }

    #[test]
    fn fixed_order_lists_every_day_sunday_first() {
        let input = vec![slot(5, "19:00", "Youth"), slot(0, "10:00", "Service")];
        let out = aggregate(&input, DayOrder::Fixed);

        assert_eq!(order_of(&out), vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(out[0].label, "Sunday");
        assert_eq!(out[0].activities[0].subject, "Service");
        assert!(out[1].activities.is_empty());
        assert_eq!(out[5].activities[0].subject, "Youth");
    }

    #[test]
    fn sorts_within_a_day_by_start() {
        let input = vec![
            slot(2, "19:30", "c"),
            slot(2, "07:00", "a"),
            slot(2, "12:15", "b"),
        ];
        let out = aggregate(&input, DayOrder::FromToday(0));
        let subjects: Vec<_> = out[0].activities.iter().map(|a| a.subject.as_str()).collect();
        assert_eq!(subjects, ["a", "b", "c"]);
    }

    #[test]
    fn rotating_order_starts_at_next_busy_day() {
        // today = Wednesday, slots on Tuesday and Friday
        let input = vec![slot(2, "18:00", "tue"), slot(5, "18:00", "fri")];
        let out = aggregate(&input, DayOrder::FromToday(3));
        assert_eq!(order_of(&out), vec![5, 2]);
        assert_eq!(out[0].label, "Friday");
    }

    #[test]
    fn rotating_order_puts_today_first_and_wraps() {
        let input: Vec<_> = (0..7).map(|d| slot(d, "09:00", "x")).collect();
        let out = aggregate(&input, DayOrder::FromToday(6));
        assert_eq!(order_of(&out), vec![6, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn out_of_range_days_are_dropped() {
        let input = vec![
            slot(-1, "09:00", "neg"),
            slot(7, "09:00", "seven"),
            slot(1, "09:00", "ok"),
        ];
        let out = aggregate(&input, DayOrder::Fixed);
        let total: usize = out.iter().map(|b| b.activities.len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn aggregation_is_idempotent_and_complete() {
        let input = vec![
            slot(3, "20:00", "a"),
            slot(3, "08:00", "b"),
            slot(0, "11:00", "c"),
            slot(6, "16:00", "d"),
            slot(9, "16:00", "bad"),
        ];
        let snapshot = input.clone();

        for order in [DayOrder::Fixed, DayOrder::FromToday(4)] {
            let first = aggregate(&input, order);
            let second = aggregate(&input, order);
            assert_eq!(first, second);
            assert_eq!(input, snapshot);

            let mut seen: Vec<String> = first
                .iter()
                .flat_map(|b| b.activities.iter().map(|a| a.subject.clone()))
                .collect();
            seen.sort();
            assert_eq!(seen, ["a", "b", "c", "d"]);
        }
    }
}
