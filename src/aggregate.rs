use crate::entry::{FlowColor, FlowVolume, LogEntry, MonthKey};
use crate::ranges::{DateRange, ranges_of_sorted};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Days of flow that fill a month's progress meter.
const FULL_MONTH_DAYS: usize = 7;

/// Summary of all entries sharing a year-month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGroup {
    pub month: MonthKey,
    pub day_count: usize,
    pub dominant_color: FlowColor,
    pub dominant_volume: FlowVolume,
    pub distinct_symptoms: Vec<String>,
    pub distinct_moods: Vec<String>,
    pub ranges: Vec<DateRange>,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

impl MonthGroup {
    pub fn fill_ratio(&self) -> f64 {
        (self.day_count as f64 / FULL_MONTH_DAYS as f64).min(1.0)
    }
}

/// Group entries by month, most recent month first.
pub fn aggregate(entries: &[LogEntry]) -> Vec<MonthGroup> {
    let mut by_month: BTreeMap<MonthKey, Vec<&LogEntry>> = BTreeMap::new();
    for e in entries {
        by_month.entry(e.month()).or_default().push(e);
    }

    by_month
        .into_iter()
        .rev()
        .filter_map(|(month, mut group)| {
            group.sort_by_key(|e| e.date);
            summarize_month(month, &group)
        })
        .collect()
}

/// Summarize one month's entries, given in ascending date order. None only for an empty slice.
fn summarize_month(month: MonthKey, group: &[&LogEntry]) -> Option<MonthGroup> {
    let dates: Vec<NaiveDate> = group.iter().map(|e| e.date).collect();
    let ranges = ranges_of_sorted(&dates);
    let first_day = ranges.first()?.start;
    let last_day = ranges.last()?.end;

    Some(MonthGroup {
        month,
        day_count: group.len(),
        dominant_color: dominant(group.iter().map(|e| e.color))?,
        dominant_volume: dominant(group.iter().map(|e| e.volume))?,
        distinct_symptoms: distinct(group.iter().flat_map(|e| e.symptoms.iter())),
        distinct_moods: distinct(group.iter().flat_map(|e| e.moods.iter())),
        ranges,
        first_day,
        last_day,
    })
}

/// Most frequent value. On a tie, the value that reached the winning count first wins:
/// the leader only changes when another value's running count strictly exceeds it.
pub fn dominant<T: PartialEq + Copy>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut tally: Vec<(T, usize)> = Vec::new();
    let mut leader: Option<(T, usize)> = None;

    for v in values {
        let count = match tally.iter_mut().find(|(k, _)| *k == v) {
            Some((_, n)) => {
                *n += 1;
                *n
            }
            None => {
                tally.push((v, 1));
                1
            }
        };
        if leader.is_none_or(|(_, best)| count > best) {
            leader = Some((v, count));
        }
    }

    leader.map(|(v, _)| v)
}

/// Union of labels in first-seen order.
fn distinct<'a>(labels: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for l in labels {
        if !out.contains(l) {
            out.push(l.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{date, sample};

    fn colored(d: &str, color: FlowColor) -> LogEntry {
        LogEntry { color, ..sample(d) }
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn groups_are_most_recent_first() {
        let groups = aggregate(&[sample("2024-01-03"), sample("2024-02-10")]);
        let keys: Vec<String> = groups.iter().map(|g| g.month.to_string()).collect();
        assert_eq!(keys, vec!["2024-02", "2024-01"]);
    }

    #[test]
    fn year_boundary_orders_by_year_first() {
        let groups = aggregate(&[sample("2024-01-02"), sample("2023-12-30"), sample("2023-11-01")]);
        let keys: Vec<String> = groups.iter().map(|g| g.month.to_string()).collect();
        assert_eq!(keys, vec!["2024-01", "2023-12", "2023-11"]);
    }

    #[test]
    fn summary_fields() {
        let mut a = sample("2024-03-04");
        a.symptoms = vec!["cramps".into(), "headache".into()];
        a.moods = vec!["calm".into()];
        let mut b = sample("2024-03-05");
        b.volume = FlowVolume::Heavy;
        b.symptoms = vec!["headache".into(), "bloating".into()];
        let mut c = sample("2024-03-20");
        c.volume = FlowVolume::Heavy;
        c.moods = vec!["anxious".into(), "calm".into()];

        // Unordered input; summary must not depend on it.
        let groups = aggregate(&[c, a, b]);
        assert_eq!(groups.len(), 1);
        let g = &groups[0];
        assert_eq!(g.day_count, 3);
        assert_eq!(g.dominant_volume, FlowVolume::Heavy);
        assert_eq!(g.dominant_color, FlowColor::BrightRed);
        assert_eq!(g.distinct_symptoms, vec!["cramps", "headache", "bloating"]);
        assert_eq!(g.distinct_moods, vec!["calm", "anxious"]);
        assert_eq!(g.ranges.len(), 2);
        assert_eq!(g.first_day, date("2024-03-04"));
        assert_eq!(g.last_day, date("2024-03-20"));
    }

    #[test]
    fn run_across_month_end_is_split_per_group() {
        let groups = aggregate(&[sample("2024-01-31"), sample("2024-02-01")]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].ranges, vec![DateRange::single(date("2024-02-01"))]);
        assert_eq!(groups[1].ranges, vec![DateRange::single(date("2024-01-31"))]);
    }

    #[test]
    fn tie_goes_to_first_to_reach_max() {
        // dark-red reaches 2 on the 3rd, bright-red only on the 4th.
        let entries = [
            colored("2024-01-01", FlowColor::BrightRed),
            colored("2024-01-02", FlowColor::DarkRed),
            colored("2024-01-03", FlowColor::DarkRed),
            colored("2024-01-04", FlowColor::BrightRed),
        ];
        for _ in 0..5 {
            assert_eq!(aggregate(&entries)[0].dominant_color, FlowColor::DarkRed);
        }
    }

    #[test]
    fn clear_majority_wins_regardless_of_order() {
        assert_eq!(dominant([1, 2, 2, 3, 2, 1]), Some(2));
        assert_eq!(dominant([3]), Some(3));
        assert_eq!(dominant(Vec::<u8>::new()), None);
    }

    #[test]
    fn single_value_ties_keep_first_seen() {
        assert_eq!(dominant(["a", "b", "c"]), Some("a"));
    }

    #[test]
    fn fill_ratio_caps_at_one() {
        let week: Vec<LogEntry> = (1..=9).map(|d| sample(&format!("2024-04-{d:02}"))).collect();
        assert_eq!(aggregate(&week)[0].fill_ratio(), 1.0);
        let short = aggregate(&week[..2]);
        assert!((short[0].fill_ratio() - 2.0 / 7.0).abs() < 1e-9);
    }
}
