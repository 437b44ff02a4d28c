use crate::aggregate::MonthGroup;
use crate::cycle::CycleStats;
use crate::entry::{LogEntry, MOODS, SYMPTOMS};
use crate::view::FormState;
use chrono::NaiveDate;

pub const NO_MONTHS_MESSAGE: &str = "No monthly data yet. Start by logging your first day.";

const SYMPTOM_PREVIEW: usize = 3;
const METER_WIDTH: usize = 14;

fn labels_or(labels: &[String], empty: &str) -> String {
    if labels.is_empty() {
        empty.into()
    } else {
        labels.join(", ")
    }
}

pub fn render_entry(e: &LogEntry) -> String {
    let mut out = format!(
        "{}  {} flow, {} ({}), {} texture, pain {}/5\n",
        e.date,
        e.volume,
        e.color,
        e.color.swatch(),
        e.texture,
        e.pain_level
    );
    out.push_str(&format!("  symptoms: {}\n", labels_or(&e.symptoms, "none")));
    out.push_str(&format!("  moods:    {}\n", labels_or(&e.moods, "none")));
    if let Some(note) = &e.note {
        out.push_str(&format!("  note:     {note}\n"));
    }
    out
}

pub fn render_form(date: NaiveDate, form: &FormState) -> String {
    match form {
        FormState::Existing(e) => render_entry(e),
        FormState::Blank => format!(
            "{date}  no entry\n  suggested symptoms: {}\n  suggested moods:    {}\n",
            SYMPTOMS.join(", "),
            MOODS.join(", ")
        ),
    }
}

fn meter(ratio: f64) -> String {
    let filled = (ratio * METER_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(METER_WIDTH - filled.min(METER_WIDTH)))
}

pub fn render_month_group(g: &MonthGroup) -> String {
    let mut out = format!("{} {}\n", g.month.name(), g.month.year());
    out.push_str(&format!(
        "  recorded:  {} day(s) {}\n",
        g.day_count,
        meter(g.fill_ratio())
    ));
    out.push_str(&format!(
        "  dominant:  {} ({}), {} flow\n",
        g.dominant_color,
        g.dominant_color.swatch(),
        g.dominant_volume
    ));

    let ranges: Vec<String> = g
        .ranges
        .iter()
        .map(|r| {
            if r.start == r.end {
                r.start.format("%m-%d").to_string()
            } else {
                format!("{} → {}", r.start.format("%m-%d"), r.end.format("%m-%d"))
            }
        })
        .collect();
    out.push_str(&format!(
        "  days:      {} (first {}, last {})\n",
        ranges.join(", "),
        g.first_day,
        g.last_day
    ));

    let symptoms = if g.distinct_symptoms.is_empty() {
        "no notable symptoms".to_string()
    } else {
        let mut shown: Vec<String> = g
            .distinct_symptoms
            .iter()
            .take(SYMPTOM_PREVIEW)
            .map(|s| format!("#{s}"))
            .collect();
        if g.distinct_symptoms.len() > SYMPTOM_PREVIEW {
            shown.push("...".into());
        }
        shown.join(" ")
    };
    out.push_str(&format!("  symptoms:  {symptoms}\n"));
    out.push_str(&format!("  moods:     {}\n", labels_or(&g.distinct_moods, "none")));
    out
}

/// Month summaries, most recent first, or an explicit no-data message.
pub fn render_months(groups: &[MonthGroup]) -> String {
    if groups.is_empty() {
        return format!("{NO_MONTHS_MESSAGE}\n");
    }
    groups
        .iter()
        .map(render_month_group)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_cycle(stats: Option<&CycleStats>) -> String {
    match stats {
        None => "Not enough data yet: log at least two periods to estimate your cycle.\n".into(),
        Some(s) => format!(
            "average cycle: {} days over {} periods\nlast period:   {}\nnext expected: {}\n",
            s.average_length, s.periods, s.last_period_date, s.next_period_date
        ),
    }
}
