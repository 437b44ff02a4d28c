use crate::LunaError;
use crate::aggregate::aggregate;
use crate::config::StorageConfig;
use crate::db::{SqliteKv, is_db_encrypted, open_db_readonly};
use crate::store::EntryStore;
use std::path::Path;

pub fn handle_status(db_path: &Path, storage: &StorageConfig) -> Result<(), LunaError> {
    if !db_path.exists() {
        eprintln!("luna: no database at {}", db_path.display());
        return Ok(());
    }

    let db_size = std::fs::metadata(db_path)?.len();
    let wal_path = db_path.with_extension("db-wal");
    let wal_size = std::fs::metadata(&wal_path).map(|m| m.len()).ok();

    let store = EntryStore::load(SqliteKv::new(open_db_readonly(db_path, storage)?))?;
    let months = aggregate(store.all());

    match wal_size {
        Some(ws) => eprintln!("luna: database — {} (+{} WAL)", fmt_size(db_size), fmt_size(ws)),
        None => eprintln!("luna: database — {}", fmt_size(db_size)),
    }
    eprintln!("luna: entries — {}", store.len());
    eprintln!("luna: months — {}", months.len());
    if let (Some(first), Some(last)) = (store.all().first(), store.all().last()) {
        eprintln!("luna: span — {} to {}", first.date, last.date);
    }

    let encrypted = is_db_encrypted(db_path);
    eprintln!(
        "luna: encryption — {}",
        if encrypted { "enabled" } else { "disabled" }
    );

    Ok(())
}

fn fmt_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
