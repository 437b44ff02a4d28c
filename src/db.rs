use crate::LunaError;
use crate::config::{StorageConfig, luna_dir};
use crate::schema::MIGRATIONS;
use crate::store::KeyValue;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

#[cfg(unix)]
fn ensure_secure_permissions(db_path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if let Some(dir) = db_path.parent()
        && !dir.as_os_str().is_empty()
        && !dir.exists()
    {
        std::fs::create_dir_all(dir)?;
        // Only set permissions on dirs we created
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
    }
    if db_path.exists() {
        std::fs::set_permissions(db_path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_secure_permissions(db_path: &Path) -> std::io::Result<()> {
    if let Some(dir) = db_path.parent()
        && !dir.as_os_str().is_empty()
        && !dir.exists()
    {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

// --- Key management ---

/// Load encryption key: LUNA_KEY env var > configured key_file > ~/.luna/key > None.
pub fn load_key(storage: &StorageConfig) -> Option<String> {
    if let Ok(k) = std::env::var("LUNA_KEY")
        && !k.is_empty()
    {
        return Some(k);
    }

    let key_path = storage.key_file.clone().unwrap_or_else(default_key_path);
    if key_path.exists()
        && let Ok(k) = std::fs::read_to_string(&key_path)
    {
        let trimmed = k.trim().to_string();
        if !trimmed.is_empty() {
            return Some(trimmed);
        }
    }

    None
}

fn default_key_path() -> PathBuf {
    luna_dir().join("key")
}

/// Apply encryption key to a connection. MUST be the first statement.
fn apply_key(conn: &Connection, key: &str) -> Result<(), LunaError> {
    conn.pragma_update(None, "key", key)?;
    conn.query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(()))
        .map_err(|_| LunaError::Config("wrong encryption key or corrupt database".into()))?;
    Ok(())
}

/// Check if a database file is encrypted (unreadable without key).
pub fn is_db_encrypted(db_path: &Path) -> bool {
    if !db_path.exists() {
        return false;
    }
    if let Ok(conn) = Connection::open_with_flags(
        db_path,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
    ) {
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(()))
            .is_err()
    } else {
        false
    }
}

fn apply_pragmas(conn: &Connection, readonly: bool) -> Result<(), LunaError> {
    conn.pragma_update(None, "busy_timeout", 5000)?;
    if !readonly {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
    }
    Ok(())
}

// --- Public open functions ---

pub fn open_db_readonly(db_path: &Path, storage: &StorageConfig) -> Result<Connection, LunaError> {
    if !db_path.exists() {
        return Err(LunaError::Config(format!(
            "database not found: {}",
            db_path.display()
        )));
    }

    let conn = Connection::open_with_flags(
        db_path,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    if let Some(key) = load_key(storage) {
        apply_key(&conn, &key)?;
    }

    apply_pragmas(&conn, true)?;
    Ok(conn)
}

pub fn open_db(db_path: &Path, storage: &StorageConfig) -> Result<Connection, LunaError> {
    ensure_secure_permissions(db_path)?;

    let mut conn = Connection::open(db_path)?;
    if let Some(key) = load_key(storage) {
        apply_key(&conn, &key)?;
    }

    apply_pragmas(&conn, false)?;
    MIGRATIONS.to_latest(&mut conn)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(db_path, std::fs::Permissions::from_mode(0o600))?;
    }

    log::debug!("opened {}", db_path.display());
    Ok(conn)
}

/// Key-value records in the `kv` table.
pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(db_path: &Path, storage: &StorageConfig) -> Result<Self, LunaError> {
        Ok(Self::new(open_db(db_path, storage)?))
    }
}

impl KeyValue for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, LunaError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), LunaError> {
        let now = chrono::Utc::now().timestamp();
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }
}
