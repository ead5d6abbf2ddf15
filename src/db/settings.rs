use anyhow::Result;
use rusqlite::params;

use super::Database;

impl Database {
    // ==================== APP SETTINGS ====================

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM app_settings WHERE key = ?",
            [key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO app_settings (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Returns true if a row was removed.
    pub fn delete_setting(&self, key: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM app_settings WHERE key = ?", [key])?;
        Ok(rows > 0)
    }

    /// All stored settings, ordered by key.
    pub fn all_settings(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM app_settings ORDER BY key")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_roundtrip() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.get_setting("ai_model").unwrap(), None);

        db.set_setting("ai_model", "gpt-4o-mini").unwrap();
        db.set_setting("ai_model", "other").unwrap();
        assert_eq!(db.get_setting("ai_model").unwrap().as_deref(), Some("other"));

        assert!(db.delete_setting("ai_model").unwrap());
        assert!(!db.delete_setting("ai_model").unwrap());
        assert_eq!(db.get_setting("ai_model").unwrap(), None);
    }

    #[test]
    fn test_all_settings_sorted() {
        let db = Database::open_memory().unwrap();
        db.set_setting("b", "2").unwrap();
        db.set_setting("a", "1").unwrap();
        assert_eq!(
            db.all_settings().unwrap(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }
}
