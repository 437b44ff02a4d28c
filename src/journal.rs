use crate::LunaError;
use crate::advice::{ChatCompletionClient, request_advice};
use crate::aggregate::aggregate;
use crate::calendar::render_month;
use crate::cli::{CalendarArgs, DayArgs, LogArgs, OutputArgs};
use crate::config::LunaConfig;
use crate::cycle::cycle_stats;
use crate::db::SqliteKv;
use crate::entry::MonthKey;
use crate::report::{render_cycle, render_entry, render_form, render_months};
use crate::store::EntryStore;
use crate::view::{EntryDraft, Selection};
use chrono::NaiveDate;
use std::path::Path;

pub type Journal = EntryStore<SqliteKv>;

pub fn open_journal(db_path: &Path, config: &LunaConfig) -> Result<Journal, LunaError> {
    EntryStore::load(SqliteKv::open(db_path, &config.storage)?)
}

fn select(date: Option<NaiveDate>) -> Selection {
    date.map(Selection::new).unwrap_or_else(Selection::today)
}

/// Apply command-line edits on top of the form's starting values.
fn apply_edits(mut draft: EntryDraft, args: &LogArgs) -> EntryDraft {
    if let Some(v) = args.volume {
        draft.volume = v;
    }
    if let Some(c) = args.color {
        draft.color = c;
    }
    if let Some(t) = args.texture {
        draft.texture = t;
    }
    if let Some(p) = args.pain {
        draft.pain_level = p;
    }

    if args.clear_symptoms {
        draft.symptoms.clear();
    } else if !args.symptoms.is_empty() {
        draft.symptoms = dedup(&args.symptoms);
    }
    for s in &args.toggle_symptoms {
        draft.toggle_symptom(s);
    }

    if args.clear_moods {
        draft.moods.clear();
    } else if !args.moods.is_empty() {
        draft.moods = dedup(&args.moods);
    }
    for m in &args.toggle_moods {
        draft.toggle_mood(m);
    }

    if let Some(note) = &args.note {
        draft.note = Some(note.clone());
    }
    draft
}

fn dedup(labels: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for l in labels {
        if !out.contains(l) {
            out.push(l.clone());
        }
    }
    out
}

pub fn handle_log(db_path: &Path, config: &LunaConfig, args: &LogArgs) -> Result<(), LunaError> {
    let mut journal = open_journal(db_path, config)?;
    let selection = select(args.date);
    let draft = apply_edits(selection.form(&journal).draft(), args);
    let entry = selection.save(&mut journal, draft)?;
    eprintln!("luna: saved {}", entry.date);
    print!("{}", render_entry(&entry));
    Ok(())
}

pub fn handle_show(db_path: &Path, config: &LunaConfig, args: &DayArgs) -> Result<(), LunaError> {
    let journal = open_journal(db_path, config)?;
    let selection = select(args.date);
    print!("{}", render_form(selection.date(), &selection.form(&journal)));
    Ok(())
}

pub fn handle_delete(db_path: &Path, config: &LunaConfig, args: &DayArgs) -> Result<(), LunaError> {
    let mut journal = open_journal(db_path, config)?;
    let selection = select(args.date);
    if selection.delete(&mut journal)? {
        eprintln!("luna: deleted {}", selection.date());
    } else {
        eprintln!("luna: no entry for {}", selection.date());
    }
    Ok(())
}

pub fn handle_list(db_path: &Path, config: &LunaConfig, args: &OutputArgs) -> Result<(), LunaError> {
    let journal = open_journal(db_path, config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(journal.all())?);
    } else if journal.is_empty() {
        println!("No entries yet.");
    } else {
        for e in journal.all() {
            print!("{}", render_entry(e));
        }
    }
    Ok(())
}

pub fn handle_stats(db_path: &Path, config: &LunaConfig, args: &OutputArgs) -> Result<(), LunaError> {
    let journal = open_journal(db_path, config)?;
    let groups = aggregate(journal.all());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        print!("{}", render_months(&groups));
    }
    Ok(())
}

pub fn handle_calendar(
    db_path: &Path,
    config: &LunaConfig,
    args: &CalendarArgs,
) -> Result<(), LunaError> {
    let journal = open_journal(db_path, config)?;
    let selection = select(args.select);
    let mut month = args.month.unwrap_or_else(|| MonthKey::of(selection.date()));
    if args.prev {
        month = month
            .prev()
            .ok_or_else(|| LunaError::Config(format!("no month before {month}")))?;
    } else if args.next {
        month = month
            .next()
            .ok_or_else(|| LunaError::Config(format!("no month after {month}")))?;
    }
    print!("{}", render_month(month, journal.all(), Some(selection.date())));
    Ok(())
}

pub fn handle_cycle(db_path: &Path, config: &LunaConfig, args: &OutputArgs) -> Result<(), LunaError> {
    let journal = open_journal(db_path, config)?;
    let stats = cycle_stats(journal.all());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render_cycle(stats.as_ref()));
    }
    Ok(())
}

pub fn handle_advise(db_path: &Path, config: &LunaConfig) -> Result<(), LunaError> {
    let journal = open_journal(db_path, config)?;
    let client = ChatCompletionClient::new(config.advice.clone());
    println!("{}", request_advice(journal.all(), &client));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use crate::entry::{FlowVolume, sample};
    use clap::Parser;

    fn log_args(argv: &[&str]) -> LogArgs {
        let mut full = vec!["luna", "log"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Log(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn edits_keep_unmentioned_fields() {
        let mut existing = sample("2024-01-01");
        existing.symptoms = vec!["cramps".into()];
        existing.note = Some("tired".into());
        let draft = apply_edits(EntryDraft::from(&existing), &log_args(&["--volume", "heavy"]));
        assert_eq!(draft.volume, FlowVolume::Heavy);
        assert_eq!(draft.symptoms, vec!["cramps"]);
        assert_eq!(draft.note.as_deref(), Some("tired"));
    }

    #[test]
    fn symptom_flags_replace_toggle_and_clear() {
        let mut existing = sample("2024-01-01");
        existing.symptoms = vec!["cramps".into(), "acne".into()];
        let base = EntryDraft::from(&existing);

        let replaced = apply_edits(base.clone(), &log_args(&["--symptom", "bloating", "--symptom", "bloating"]));
        assert_eq!(replaced.symptoms, vec!["bloating"]);

        let toggled = apply_edits(
            base.clone(),
            &log_args(&["--toggle-symptom", "acne", "--toggle-symptom", "headache"]),
        );
        assert_eq!(toggled.symptoms, vec!["cramps", "headache"]);

        let cleared = apply_edits(base, &log_args(&["--clear-symptoms"]));
        assert!(cleared.symptoms.is_empty());
    }
}
