//! The entry store: one `LogEntry` per date, kept in ascending date order and
//! written through to a key-value backend after every mutation.

use crate::LunaError;
use crate::entry::LogEntry;
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;

pub const ENTRIES_KEY: &str = "entries";
/// Where an unreadable `entries` value is copied before the store starts empty.
pub const CORRUPT_KEY: &str = "entries.corrupt";

/// Persistence port: a single-record key-value store.
pub trait KeyValue {
    fn get(&self, key: &str) -> Result<Option<String>, LunaError>;
    fn put(&self, key: &str, value: &str) -> Result<(), LunaError>;
}

/// In-process backend, nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryKv {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn with(key: &str, value: &str) -> Self {
        let kv = Self::default();
        kv.values.borrow_mut().insert(key.into(), value.into());
        kv
    }
}

impl KeyValue for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, LunaError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), LunaError> {
        self.values.borrow_mut().insert(key.into(), value.into());
        Ok(())
    }
}

pub struct EntryStore<K: KeyValue> {
    kv: K,
    entries: Vec<LogEntry>,
}

impl<K: KeyValue> EntryStore<K> {
    /// Read the stored entries. A missing or malformed value yields an empty store;
    /// a malformed one is first copied to [`CORRUPT_KEY`].
    pub fn load(kv: K) -> Result<Self, LunaError> {
        let entries = match kv.get(ENTRIES_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<LogEntry>>(&raw) {
                Ok(list) => normalize(list),
                Err(e) => {
                    log::warn!("stored entries unreadable ({e}), starting empty; copy kept under {CORRUPT_KEY:?}");
                    if let Err(e) = kv.put(CORRUPT_KEY, &raw) {
                        log::warn!("could not keep unreadable entries: {e}");
                    }
                    Vec::new()
                }
            },
        };
        log::debug!("loaded {} entries", entries.len());
        Ok(Self { kv, entries })
    }

    /// Insert or fully replace the entry for `entry.date`, then persist.
    pub fn upsert(&mut self, entry: LogEntry) -> Result<(), LunaError> {
        entry.validate()?;
        match self.entries.binary_search_by_key(&entry.date, |e| e.date) {
            Ok(i) => self.entries[i] = entry,
            Err(i) => self.entries.insert(i, entry),
        }
        self.persist()
    }

    /// Remove the entry for `date` if present, then persist. Returns whether one was removed.
    pub fn delete(&mut self, date: NaiveDate) -> Result<bool, LunaError> {
        let removed = match self.entries.binary_search_by_key(&date, |e| e.date) {
            Ok(i) => {
                self.entries.remove(i);
                true
            }
            Err(_) => false,
        };
        self.persist()?;
        Ok(removed)
    }

    pub fn all(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn find_by_date(&self, date: NaiveDate) -> Option<&LogEntry> {
        self.entries
            .binary_search_by_key(&date, |e| e.date)
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn backend(&self) -> &K {
        &self.kv
    }

    fn persist(&self) -> Result<(), LunaError> {
        let value = serde_json::to_string(&self.entries)?;
        self.kv.put(ENTRIES_KEY, &value).inspect_err(|e| {
            log::warn!("entries not persisted: {e}");
        })
    }
}

/// Sort by date; of several entries for one date the later one wins.
fn normalize(mut list: Vec<LogEntry>) -> Vec<LogEntry> {
    list.sort_by_key(|e| e.date);
    let mut out: Vec<LogEntry> = Vec::with_capacity(list.len());
    for e in list {
        match out.last_mut() {
            Some(last) if last.date == e.date => *last = e,
            _ => out.push(e),
        }
    }
    out
}
