use crate::entry::LogEntry;
use chrono::NaiveDate;
use serde::Serialize;

/// A maximal run of consecutive calendar days, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }
}

/// Partition entries into runs of consecutive days, in chronological order.
pub fn detect_ranges(entries: &[LogEntry]) -> Vec<DateRange> {
    let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    dates.sort_unstable();
    ranges_of_sorted(&dates)
}

/// Same as [`detect_ranges`] for dates already in ascending order.
/// A repeated date neither extends nor breaks the current run.
pub fn ranges_of_sorted(dates: &[NaiveDate]) -> Vec<DateRange> {
    let mut out = Vec::new();
    let mut current: Option<DateRange> = None;

    for &day in dates {
        current = match current {
            None => Some(DateRange::single(day)),
            Some(r) if day == r.end => Some(r),
            Some(r) if r.end.succ_opt() == Some(day) => Some(DateRange { end: day, ..r }),
            Some(r) => {
                out.push(r);
                Some(DateRange::single(day))
            }
        };
    }

    if let Some(r) = current {
        out.push(r);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{date, sample};

    fn entries(days: &[&str]) -> Vec<LogEntry> {
        days.iter().map(|d| sample(d)).collect()
    }

    #[test]
    fn empty_input_has_no_ranges() {
        assert!(detect_ranges(&[]).is_empty());
    }

    #[test]
    fn single_entry_is_one_day_range() {
        let r = detect_ranges(&entries(&["2024-03-09"]));
        assert_eq!(r, vec![DateRange::single(date("2024-03-09"))]);
    }

    #[test]
    fn splits_on_gaps() {
        let r = detect_ranges(&entries(&[
            "2024-01-05",
            "2024-01-06",
            "2024-01-07",
            "2024-01-20",
        ]));
        assert_eq!(
            r,
            vec![
                DateRange { start: date("2024-01-05"), end: date("2024-01-07") },
                DateRange::single(date("2024-01-20")),
            ]
        );
    }

    #[test]
    fn unordered_input_is_sorted_first() {
        let r = detect_ranges(&entries(&["2024-01-07", "2024-01-20", "2024-01-05", "2024-01-06"]));
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].start, date("2024-01-05"));
        assert_eq!(r[1].end, date("2024-01-20"));
    }

    #[test]
    fn month_boundary_is_continuous() {
        let r = detect_ranges(&entries(&["2024-01-31", "2024-02-01"]));
        assert_eq!(
            r,
            vec![DateRange { start: date("2024-01-31"), end: date("2024-02-01") }]
        );
    }

    #[test]
    fn leap_day_and_year_boundary() {
        let r = detect_ranges(&entries(&["2024-02-28", "2024-02-29", "2024-03-01"]));
        assert_eq!(r.len(), 1);
        let r = detect_ranges(&entries(&["2023-02-28", "2023-03-01"]));
        assert_eq!(r.len(), 1);
        let r = detect_ranges(&entries(&["2023-12-31", "2024-01-01"]));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn repeated_date_does_not_break_run() {
        let dates = [date("2024-05-01"), date("2024-05-01"), date("2024-05-02")];
        assert_eq!(
            ranges_of_sorted(&dates),
            vec![DateRange { start: date("2024-05-01"), end: date("2024-05-02") }]
        );
    }
}
