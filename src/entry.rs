use crate::LunaError;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const MAX_PAIN: u8 = 5;

/// Suggested symptom labels offered by the editing surface. Entries may carry any label.
pub const SYMPTOMS: &[&str] = &[
    "feeling fine",
    "cramps",
    "headache",
    "low energy",
    "tender breasts",
    "breakouts",
    "bloating",
];

/// Suggested mood labels offered by the editing surface.
pub const MOODS: &[&str] = &[
    "sunny",
    "a bit irritable",
    "anxious",
    "teary",
    "calm",
    "energetic",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FlowVolume {
    Spotting,
    Light,
    Medium,
    Heavy,
}

impl FlowVolume {
    pub const ALL: [FlowVolume; 4] = [
        FlowVolume::Spotting,
        FlowVolume::Light,
        FlowVolume::Medium,
        FlowVolume::Heavy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FlowVolume::Spotting => "spotting",
            FlowVolume::Light => "light",
            FlowVolume::Medium => "medium",
            FlowVolume::Heavy => "heavy",
        }
    }
}

/// Ordered from darkest (oldest blood) to lightest. The order is for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FlowColor {
    PurpleBlack,
    Brown,
    DarkRed,
    Red,
    BrightRed,
    PaleRed,
}

impl FlowColor {
    pub const ALL: [FlowColor; 6] = [
        FlowColor::PurpleBlack,
        FlowColor::Brown,
        FlowColor::DarkRed,
        FlowColor::Red,
        FlowColor::BrightRed,
        FlowColor::PaleRed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FlowColor::PurpleBlack => "purple-black",
            FlowColor::Brown => "brown",
            FlowColor::DarkRed => "dark-red",
            FlowColor::Red => "red",
            FlowColor::BrightRed => "bright-red",
            FlowColor::PaleRed => "pale-red",
        }
    }

    /// Display swatch as a hex RGB string.
    pub fn swatch(self) -> &'static str {
        match self {
            FlowColor::PurpleBlack => "#4c1d1d",
            FlowColor::Brown => "#78350f",
            FlowColor::DarkRed => "#991b1b",
            FlowColor::Red => "#dc2626",
            FlowColor::BrightRed => "#ef4444",
            FlowColor::PaleRed => "#fecaca",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FlowTexture {
    Normal,
    Thick,
    Thin,
    Clots,
}

impl FlowTexture {
    pub const ALL: [FlowTexture; 4] = [
        FlowTexture::Normal,
        FlowTexture::Thick,
        FlowTexture::Thin,
        FlowTexture::Clots,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FlowTexture::Normal => "normal",
            FlowTexture::Thick => "thick",
            FlowTexture::Thin => "thin",
            FlowTexture::Clots => "clots",
        }
    }
}

impl fmt::Display for FlowVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for FlowColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for FlowTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One calendar day's record. `date` is the natural key within the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub date: NaiveDate,
    pub volume: FlowVolume,
    pub color: FlowColor,
    pub texture: FlowTexture,
    pub pain_level: u8,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub moods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LogEntry {
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }

    pub fn validate(&self) -> Result<(), LunaError> {
        if self.pain_level > MAX_PAIN {
            return Err(LunaError::Validation(format!(
                "pain level {} on {} is outside 0-{MAX_PAIN}",
                self.pain_level, self.date
            )));
        }
        Ok(())
    }
}

/// A calendar month, stored as its first day so ordering and arithmetic come from `NaiveDate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(MonthKey)
    }

    pub fn of(date: NaiveDate) -> Self {
        // Day 1 always exists in the month of a valid date.
        MonthKey(date - chrono::Days::new(u64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn prev(&self) -> Option<Self> {
        self.0.pred_opt().map(MonthKey::of)
    }

    pub fn next(&self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(MonthKey)
    }

    pub fn days_in_month(&self) -> u32 {
        match self.next() {
            Some(next) => (next.0 - self.0).num_days() as u32,
            None => 31,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        MonthKey::of(date) == *self
    }

    pub fn name(&self) -> &'static str {
        match self.month() {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            _ => "December",
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s
            .split_once('-')
            .filter(|(y, m)| {
                y.len() == 4 && m.len() == 2 && y.chars().chain(m.chars()).all(|c| c.is_ascii_digit())
            })
            .ok_or_else(|| format!("expected YYYY-MM, got {s:?}"))?;
        let year: i32 = y.parse().map_err(|_| format!("invalid year in {s:?}"))?;
        let month: u32 = m.parse().map_err(|_| format!("invalid month in {s:?}"))?;
        MonthKey::new(year, month).ok_or_else(|| format!("no such month: {s:?}"))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
pub(crate) fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[cfg(test)]
pub(crate) fn sample(d: &str) -> LogEntry {
    LogEntry {
        date: date(d),
        volume: FlowVolume::Medium,
        color: FlowColor::BrightRed,
        texture: FlowTexture::Normal,
        pain_level: 0,
        symptoms: Vec::new(),
        moods: Vec::new(),
        note: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_labels_and_camel_case_fields() {
        let mut e = sample("2024-01-05");
        e.color = FlowColor::PurpleBlack;
        e.pain_level = 3;
        e.symptoms = vec!["cramps".into()];
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["date"], "2024-01-05");
        assert_eq!(json["color"], "purple-black");
        assert_eq!(json["volume"], "medium");
        assert_eq!(json["painLevel"], 3);
        assert!(json.get("note").is_none());
    }

    #[test]
    fn deserializes_without_optional_lists() {
        let json = r#"{"date":"2024-02-01","volume":"heavy","color":"dark-red","texture":"clots","painLevel":4}"#;
        let e: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.volume, FlowVolume::Heavy);
        assert_eq!(e.texture, FlowTexture::Clots);
        assert!(e.symptoms.is_empty());
        assert_eq!(e.note, None);
    }

    #[test]
    fn unknown_label_is_rejected() {
        let json = r#"{"date":"2024-02-01","volume":"torrential","color":"red","texture":"thin","painLevel":1}"#;
        assert!(serde_json::from_str::<LogEntry>(json).is_err());
    }

    #[test]
    fn labels_match_serde_names() {
        for c in FlowColor::ALL {
            assert_eq!(serde_json::to_value(c).unwrap(), c.label());
        }
        for v in FlowVolume::ALL {
            assert_eq!(serde_json::to_value(v).unwrap(), v.label());
        }
        for t in FlowTexture::ALL {
            assert_eq!(serde_json::to_value(t).unwrap(), t.label());
        }
    }

    #[test]
    fn validate_rejects_pain_above_five() {
        let mut e = sample("2024-01-01");
        e.pain_level = 5;
        assert!(e.validate().is_ok());
        e.pain_level = 6;
        assert!(matches!(e.validate(), Err(LunaError::Validation(_))));
    }

    #[test]
    fn month_key_parse_and_display() {
        let m: MonthKey = "2024-02".parse().unwrap();
        assert_eq!(m.to_string(), "2024-02");
        assert_eq!(m.days_in_month(), 29);
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("202402".parse::<MonthKey>().is_err());
        assert!("2024-2".parse::<MonthKey>().is_err());
        assert!("24-02".parse::<MonthKey>().is_err());
        assert!("2024-+2".parse::<MonthKey>().is_err());
    }

    #[test]
    fn month_key_navigation_crosses_years() {
        let jan: MonthKey = "2024-01".parse().unwrap();
        assert_eq!(jan.prev().unwrap().to_string(), "2023-12");
        let dec: MonthKey = "2023-12".parse().unwrap();
        assert_eq!(dec.next().unwrap(), jan);
        assert_eq!(MonthKey::of(date("2024-03-31")).to_string(), "2024-03");
        assert!(jan.contains(date("2024-01-31")));
        assert!(!jan.contains(date("2024-02-01")));
    }

    #[test]
    fn month_keys_order_chronologically() {
        let a: MonthKey = "2023-12".parse().unwrap();
        let b: MonthKey = "2024-01".parse().unwrap();
        assert!(a < b);
    }
}
