pub mod advice;
pub mod aggregate;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod cycle;
pub mod db;
pub mod entry;
pub mod journal;
pub mod ranges;
pub mod report;
pub mod schema;
pub mod status;
pub mod store;
pub mod view;

#[derive(Debug)]
pub enum LunaError {
    Database(rusqlite::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(String),
    Validation(String),
    Advice(String),
}

impl std::fmt::Display for LunaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LunaError::Database(e) => write!(f, "database: {e}"),
            LunaError::Io(e) => write!(f, "io: {e}"),
            LunaError::Json(e) => write!(f, "json: {e}"),
            LunaError::Config(msg) => write!(f, "config: {msg}"),
            LunaError::Validation(msg) => write!(f, "invalid entry: {msg}"),
            LunaError::Advice(msg) => write!(f, "advice: {msg}"),
        }
    }
}

impl std::error::Error for LunaError {}

impl From<rusqlite::Error> for LunaError {
    fn from(e: rusqlite::Error) -> Self {
        LunaError::Database(e)
    }
}

impl From<std::io::Error> for LunaError {
    fn from(e: std::io::Error) -> Self {
        LunaError::Io(e)
    }
}

impl From<serde_json::Error> for LunaError {
    fn from(e: serde_json::Error) -> Self {
        LunaError::Json(e)
    }
}

impl From<rusqlite_migration::Error> for LunaError {
    fn from(e: rusqlite_migration::Error) -> Self {
        match e {
            rusqlite_migration::Error::RusqliteError { query: _, err } => LunaError::Database(err),
            other => LunaError::Config(format!("migration: {other}")),
        }
    }
}
