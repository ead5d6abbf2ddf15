use anyhow::Result;
use rusqlite::Connection;
use std::path::PathBuf;
use tracing::debug;

mod kv;
mod schema;
mod settings;

pub use schema::SCHEMA_VERSION;

/// Overrides the default database location.
pub const ENV_DB_PATH: &str = "PARTNERHUB_DB";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database, creating if needed, running migrations
    pub fn open() -> Result<Self> {
        let path = Self::default_path()?;
        Self::open_at(path)
    }

    pub fn open_at(path: PathBuf) -> Result<Self> {
        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        debug!(path = %path.display(), "opening database");
        let conn = Connection::open(&path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open in-memory database for testing
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(ENV_DB_PATH) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join("partnerhub").join("partners.db"))
    }

    fn migrate(&self) -> Result<()> {
        let version = self.get_schema_version()?;

        if version < 1 {
            // Run migration in a transaction for atomicity
            self.conn
                .execute_batch(&format!("BEGIN TRANSACTION; {} COMMIT;", schema::SCHEMA_V1))?;
            self.set_schema_version(1)?;
        }

        if version < 2 {
            self.conn.execute_batch(schema::MIGRATION_V2)?;
            self.set_schema_version(2)?;
        }

        if version < SCHEMA_VERSION {
            debug!(from = version, to = SCHEMA_VERSION, "migrated schema");
        }
        Ok(())
    }

    fn get_schema_version(&self) -> Result<i32> {
        let result: Result<i32, _> =
            self.conn
                .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                    row.get(0)
                });

        match result {
            Ok(v) => Ok(v),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(rusqlite::Error::SqliteFailure(err, msg)) => {
                // "no such table" is error code 1 (SQLITE_ERROR)
                if err.code == rusqlite::ErrorCode::Unknown
                    && msg.as_ref().is_some_and(|m| m.contains("no such table"))
                {
                    Ok(0)
                } else {
                    Err(rusqlite::Error::SqliteFailure(err, msg).into())
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set_schema_version(&self, version: i32) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
            [version],
        )?;
        Ok(())
    }
}
