use crate::LunaError;
use crate::entry::{FlowColor, FlowTexture, FlowVolume, LogEntry};
use crate::store::{EntryStore, KeyValue};
use chrono::NaiveDate;

/// Editable fields of an entry, everything except the date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub volume: FlowVolume,
    pub color: FlowColor,
    pub texture: FlowTexture,
    pub pain_level: u8,
    pub symptoms: Vec<String>,
    pub moods: Vec<String>,
    pub note: Option<String>,
}

impl Default for EntryDraft {
    fn default() -> Self {
        Self {
            volume: FlowVolume::Medium,
            color: FlowColor::BrightRed,
            texture: FlowTexture::Normal,
            pain_level: 0,
            symptoms: Vec::new(),
            moods: Vec::new(),
            note: None,
        }
    }
}

impl From<&LogEntry> for EntryDraft {
    fn from(e: &LogEntry) -> Self {
        Self {
            volume: e.volume,
            color: e.color,
            texture: e.texture,
            pain_level: e.pain_level,
            symptoms: e.symptoms.clone(),
            moods: e.moods.clone(),
            note: e.note.clone(),
        }
    }
}

impl EntryDraft {
    pub fn toggle_symptom(&mut self, label: &str) {
        toggle(&mut self.symptoms, label);
    }

    pub fn toggle_mood(&mut self, label: &str) {
        toggle(&mut self.moods, label);
    }
}

fn toggle(list: &mut Vec<String>, label: &str) {
    match list.iter().position(|l| l == label) {
        Some(i) => {
            list.remove(i);
        }
        None => list.push(label.to_string()),
    }
}

/// What the editing form shows for the selected date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Existing(LogEntry),
    Blank,
}

impl FormState {
    /// Values the form starts from: the stored entry's, or the blank defaults.
    pub fn draft(&self) -> EntryDraft {
        match self {
            FormState::Existing(e) => EntryDraft::from(e),
            FormState::Blank => EntryDraft::default(),
        }
    }
}

/// A selected date. Saves and deletes always apply to this date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    date: NaiveDate,
}

impl Selection {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn form<K: KeyValue>(&self, store: &EntryStore<K>) -> FormState {
        match store.find_by_date(self.date) {
            Some(e) => FormState::Existing(e.clone()),
            None => FormState::Blank,
        }
    }

    pub fn save<K: KeyValue>(
        &self,
        store: &mut EntryStore<K>,
        draft: EntryDraft,
    ) -> Result<LogEntry, LunaError> {
        let entry = LogEntry {
            date: self.date,
            volume: draft.volume,
            color: draft.color,
            texture: draft.texture,
            pain_level: draft.pain_level,
            symptoms: draft.symptoms,
            moods: draft.moods,
            note: draft.note.filter(|n| !n.trim().is_empty()),
        };
        store.upsert(entry.clone())?;
        Ok(entry)
    }

    pub fn delete<K: KeyValue>(&self, store: &mut EntryStore<K>) -> Result<bool, LunaError> {
        store.delete(self.date)
    }
}
