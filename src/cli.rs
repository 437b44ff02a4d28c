use crate::entry::{FlowColor, FlowTexture, FlowVolume, MAX_PAIN, MonthKey};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "luna", version, about = "Personal menstrual-cycle journal")]
pub struct Cli {
    /// Database path
    #[arg(long, env = "LUNA_DB", global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Record or replace the entry for a day
    Log(LogArgs),
    /// Show the entry for a day
    Show(DayArgs),
    /// Delete the entry for a day
    Delete(DayArgs),
    /// List all entries, oldest first
    List(OutputArgs),
    /// Monthly summaries, most recent month first
    Stats(OutputArgs),
    /// Month calendar with recorded days marked
    Calendar(CalendarArgs),
    /// Average cycle length and next expected period
    Cycle(OutputArgs),
    /// Ask the configured language model for a short wellness note
    Advise,
    /// Show database health: size, entry counts, encryption
    Status,
}

#[derive(Parser)]
pub struct DayArgs {
    /// Day (YYYY-MM-DD), defaults to today
    pub date: Option<NaiveDate>,
}

#[derive(Parser)]
pub struct LogArgs {
    /// Day (YYYY-MM-DD), defaults to today
    pub date: Option<NaiveDate>,

    #[arg(long, value_enum)]
    pub volume: Option<FlowVolume>,

    #[arg(long, value_enum)]
    pub color: Option<FlowColor>,

    #[arg(long, value_enum)]
    pub texture: Option<FlowTexture>,

    /// Pain level, 0-5
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=MAX_PAIN as i64))]
    pub pain: Option<u8>,

    /// Symptom label (repeatable); replaces the day's symptoms
    #[arg(long = "symptom")]
    pub symptoms: Vec<String>,

    /// Mood label (repeatable); replaces the day's moods
    #[arg(long = "mood")]
    pub moods: Vec<String>,

    /// Toggle a symptom on or off, keeping the others (repeatable)
    #[arg(long = "toggle-symptom", conflicts_with = "symptoms")]
    pub toggle_symptoms: Vec<String>,

    /// Toggle a mood on or off, keeping the others (repeatable)
    #[arg(long = "toggle-mood", conflicts_with = "moods")]
    pub toggle_moods: Vec<String>,

    /// Remove all symptoms
    #[arg(long, conflicts_with_all = ["symptoms", "toggle_symptoms"])]
    pub clear_symptoms: bool,

    /// Remove all moods
    #[arg(long, conflicts_with_all = ["moods", "toggle_moods"])]
    pub clear_moods: bool,

    /// Free-text note; an empty string removes it
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Parser)]
pub struct OutputArgs {
    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM), defaults to the selected day's month
    #[arg(long)]
    pub month: Option<MonthKey>,

    /// Day to highlight (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub select: Option<NaiveDate>,

    /// Show the month before
    #[arg(long, conflicts_with = "next")]
    pub prev: bool,

    /// Show the month after
    #[arg(long)]
    pub next: bool,
}
