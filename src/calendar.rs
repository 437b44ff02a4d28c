use crate::entry::{LogEntry, MonthKey};
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

const DAY_LABELS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Sunday-first week rows for a month; cells before day 1 and after the last day are None.
pub fn weeks(month: MonthKey) -> Vec<[Option<NaiveDate>; 7]> {
    let first = month.first_day();
    let offset = first.weekday().num_days_from_sunday() as usize;

    let mut rows = Vec::new();
    let mut row = [None; 7];
    let mut col = offset;
    for day in first.iter_days().take(month.days_in_month() as usize) {
        row[col] = Some(day);
        col += 1;
        if col == 7 {
            rows.push(row);
            row = [None; 7];
            col = 0;
        }
    }
    if col > 0 {
        rows.push(row);
    }
    rows
}

/// Text month grid. Recorded days carry `*`, the selected day is bracketed.
pub fn render_month(month: MonthKey, entries: &[LogEntry], selected: Option<NaiveDate>) -> String {
    let recorded: HashSet<NaiveDate> = entries
        .iter()
        .filter(|e| month.contains(e.date))
        .map(|e| e.date)
        .collect();

    let mut out = format!("{} {}\n", month.name(), month.year());
    for label in DAY_LABELS {
        out.push_str(&format!(" {label}  "));
    }
    out.push('\n');

    for row in weeks(month) {
        let line: String = row
            .iter()
            .map(|cell| match cell {
                None => "     ".to_string(),
                Some(day) => {
                    let mark = if recorded.contains(day) { "*" } else { " " };
                    if Some(*day) == selected {
                        format!("[{:>2}{mark}]", day.day())
                    } else {
                        format!(" {:>2}{mark} ", day.day())
                    }
                }
            })
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&format!("{} day(s) recorded\n", recorded.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{date, sample};

    #[test]
    fn weeks_start_on_sunday_with_offset() {
        // 2024-02-01 is a Thursday.
        let rows = weeks("2024-02".parse().unwrap());
        assert_eq!(rows.len(), 5);
        assert!(rows[0][..4].iter().all(Option::is_none));
        assert_eq!(rows[0][4], Some(date("2024-02-01")));
        assert_eq!(rows[4][4], Some(date("2024-02-29")));
        assert_eq!(rows[4][5], None);
        let filled = rows.iter().flatten().filter(|c| c.is_some()).count();
        assert_eq!(filled, 29);
    }

    #[test]
    fn month_starting_sunday_has_no_leading_blanks() {
        // 2023-10-01 is a Sunday.
        let rows = weeks("2023-10".parse().unwrap());
        assert_eq!(rows[0][0], Some(date("2023-10-01")));
    }

    #[test]
    fn render_marks_recorded_and_selected() {
        let entries = [sample("2024-02-05"), sample("2024-02-06"), sample("2024-03-01")];
        let text = render_month("2024-02".parse().unwrap(), &entries, Some(date("2024-02-06")));
        assert!(text.starts_with("February 2024\n"));
        assert!(text.contains("  5* "));
        assert!(text.contains("[ 6*]"));
        assert!(text.contains("2 day(s) recorded"));
    }
}
