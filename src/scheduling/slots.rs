//! Pure slot arithmetic: non-working days, slot generation and conflict
//! filtering. Everything here works on a single calendar day expressed in
//! seconds since midnight, so it never wraps across days.

use time::{Duration, Time};

use super::window::OpenHours;
use super::Weekday;

pub const SECONDS_PER_DAY: u32 = 86_400;

/// Half-open `[start, end)` span within one day, in seconds since midnight.
/// `end` may equal [`SECONDS_PER_DAY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySpan {
    pub start: u32,
    pub end: u32,
}

impl DaySpan {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn starting_at(start: Time, minutes: u32) -> Self {
        let start = seconds_of_day(start);
        Self::new(start, start + minutes * 60)
    }

    pub fn overlaps(&self, other: &DaySpan) -> bool {
        self.start < other.end && self.end > other.start
    }
}

pub fn seconds_of_day(time: Time) -> u32 {
    let (hour, minute, second) = time.as_hms();
    u32::from(hour) * 3600 + u32::from(minute) * 60 + u32::from(second)
}

/// Inverse of [`seconds_of_day`] for values below [`SECONDS_PER_DAY`].
pub fn time_of_day(seconds: u32) -> Time {
    Time::MIDNIGHT + Duration::seconds(i64::from(seconds % SECONDS_PER_DAY))
}

/// Calendar indices (`0 = sunday`) of the weekdays that have no row.
pub fn non_working_days<I>(working: I) -> Vec<u8>
where
    I: IntoIterator<Item = Weekday>,
{
    let mut open = [false; 7];
    for day in working {
        open[usize::from(day.calendar_index())] = true;
    }

    (0..7u8).filter(|index| !open[usize::from(*index)]).collect()
}

/// Start times of every slot of `duration_minutes` that fits the window,
/// stepping by the duration from the opening time. Slots touching the break
/// are kept, slots overlapping it are skipped.
pub fn generate_slots(hours: &OpenHours, duration_minutes: u32) -> Vec<Time> {
    if duration_minutes == 0 {
        return Vec::new();
    }

    let step = duration_minutes * 60;
    let open = hours.span();
    let pause = hours.pause();

    let mut slots = Vec::new();
    let mut cursor = open.start;
    while cursor + step <= open.end {
        let slot = DaySpan::new(cursor, cursor + step);
        if !pause.is_some_and(|pause| slot.overlaps(&pause)) {
            slots.push(time_of_day(cursor));
        }
        cursor += step;
    }

    slots
}

/// Drops every candidate whose `[start, start + duration)` overlaps a busy span.
pub fn filter_conflicts(candidates: Vec<Time>, duration_minutes: u32, busy: &[DaySpan]) -> Vec<Time> {
    candidates
        .into_iter()
        .filter(|start| {
            let slot = DaySpan::starting_at(*start, duration_minutes);
            !busy.iter().any(|taken| slot.overlaps(taken))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::clock::format_hm;
    use time::macros::time;

    fn hours(start: Time, end: Time, pause: Option<(Time, Time)>) -> OpenHours {
        OpenHours::new(start, end, pause.map(|p| p.0), pause.map(|p| p.1)).unwrap()
    }

    fn labels(slots: &[Time]) -> Vec<String> {
        slots.iter().copied().map(format_hm).collect()
    }

    #[test]
    fn non_working_days_is_complement_of_rows() {
        assert_eq!(non_working_days(Vec::new()), vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(non_working_days(Weekday::ALL), Vec::<u8>::new());

        let weekdays = [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
        ];
        assert_eq!(non_working_days(weekdays), vec![0, 6]);
    }

    #[test]
    fn non_working_days_ignores_repeats() {
        let days = [Weekday::Sunday, Weekday::Sunday, Weekday::Saturday];
        assert_eq!(non_working_days(days), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn morning_window_yields_hourly_slots() {
        let slots = generate_slots(&hours(time!(08:00), time!(12:00), None), 60);
        assert_eq!(labels(&slots), ["08:00", "09:00", "10:00", "11:00"]);
    }

    #[test]
    fn slot_overlapping_break_is_skipped() {
        let slots = generate_slots(
            &hours(time!(08:00), time!(12:00), Some((time!(10:00), time!(10:30)))),
            60,
        );
        assert_eq!(labels(&slots), ["08:00", "09:00", "11:00"]);
    }

    #[test]
    fn slot_abutting_break_is_kept() {
        let slots = generate_slots(
            &hours(time!(08:00), time!(12:00), Some((time!(09:30), time!(10:00)))),
            30,
        );
        assert_eq!(labels(&slots), ["08:00", "08:30", "09:00", "10:00", "10:30", "11:00", "11:30"]);
    }

    #[test]
    fn slot_count_without_break_is_floor_of_window_over_duration() {
        let windows = [
            (time!(08:00), time!(12:00)),
            (time!(09:15), time!(17:40)),
            (time!(00:00), time!(23:59)),
            (time!(13:00), time!(13:45)),
        ];
        for (start, end) in windows {
            let window = hours(start, end, None);
            let span = window.span();
            for duration in [15u32, 25, 30, 45, 60, 90, 120] {
                let slots = generate_slots(&window, duration);
                let expected = (span.end - span.start) / (duration * 60);
                assert_eq!(slots.len() as u32, expected, "{start}-{end} / {duration}");
                for (i, slot) in slots.iter().enumerate() {
                    assert_eq!(seconds_of_day(*slot), span.start + i as u32 * duration * 60);
                }
            }
        }
    }

    #[test]
    fn no_slot_ever_intersects_the_break() {
        let pauses = [
            (time!(10:00), time!(10:30)),
            (time!(12:00), time!(13:00)),
            (time!(08:10), time!(08:20)),
        ];
        for pause in pauses {
            let window = hours(time!(08:00), time!(18:00), Some(pause));
            let pause_span = window.pause().unwrap();
            for duration in [10u32, 20, 30, 45, 60] {
                for slot in generate_slots(&window, duration) {
                    assert!(!DaySpan::starting_at(slot, duration).overlaps(&pause_span));
                }
            }
        }
    }

    #[test]
    fn short_window_or_consumed_window_is_empty() {
        assert!(generate_slots(&hours(time!(08:00), time!(08:45), None), 60).is_empty());
        let consumed = hours(time!(08:00), time!(12:00), Some((time!(08:00), time!(12:00))));
        assert!(generate_slots(&consumed, 30).is_empty());
        assert!(generate_slots(&hours(time!(08:00), time!(12:00), None), 0).is_empty());
    }

    #[test]
    fn generation_is_repeatable() {
        let window = hours(time!(09:00), time!(19:00), Some((time!(12:00), time!(13:00))));
        assert_eq!(generate_slots(&window, 40), generate_slots(&window, 40));
    }

    #[test]
    fn reservation_removes_overlapping_slot() {
        let candidates = generate_slots(
            &hours(time!(08:00), time!(12:00), Some((time!(10:00), time!(10:30)))),
            60,
        );
        let busy = [DaySpan::starting_at(time!(09:00), 60)];
        let free = filter_conflicts(candidates, 60, &busy);
        assert_eq!(labels(&free), ["08:00", "11:00"]);
    }

    #[test]
    fn filter_never_returns_overlapping_slots_and_keeps_order() {
        let candidates = generate_slots(&hours(time!(08:00), time!(18:00), None), 30);
        let busy = [
            DaySpan::starting_at(time!(08:45), 30),
            DaySpan::starting_at(time!(12:00), 90),
            DaySpan::starting_at(time!(17:59), 1),
        ];
        let free = filter_conflicts(candidates, 30, &busy);
        for slot in &free {
            let span = DaySpan::starting_at(*slot, 30);
            assert!(busy.iter().all(|taken| !span.overlaps(taken)));
        }
        assert!(free.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(!free.contains(&time!(08:30)));
        assert!(!free.contains(&time!(09:00)));
        assert!(free.contains(&time!(09:30)));
        assert!(free.contains(&time!(13:30)));
        assert!(!free.contains(&time!(17:30)));
    }

    #[test]
    fn back_to_back_reservation_does_not_conflict() {
        let candidates = vec![time!(10:00)];
        let busy = [DaySpan::starting_at(time!(09:00), 60), DaySpan::starting_at(time!(11:00), 60)];
        assert_eq!(filter_conflicts(candidates, 60, &busy), vec![time!(10:00)]);
    }
}
