use crate::entry::LogEntry;
use crate::ranges::detect_ranges;
use chrono::{Days, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStats {
    pub average_length: u32,
    pub last_period_date: NaiveDate,
    pub next_period_date: NaiveDate,
    pub periods: usize,
}

/// Cycle length and next-period estimate from the starts of consecutive-day runs
/// across the whole journal. Needs at least two runs.
pub fn cycle_stats(entries: &[LogEntry]) -> Option<CycleStats> {
    let starts: Vec<NaiveDate> = detect_ranges(entries).iter().map(|r| r.start).collect();
    if starts.len() < 2 {
        return None;
    }

    let gaps: Vec<i64> = starts
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .collect();
    let total: i64 = gaps.iter().sum();
    let average = (total as f64 / gaps.len() as f64).round() as u32;

    let last = *starts.last()?;
    let next = last.checked_add_days(Days::new(u64::from(average)))?;

    Some(CycleStats {
        average_length: average,
        last_period_date: last,
        next_period_date: next,
        periods: starts.len(),
    })
}
