use anyhow::Result;
use chrono::Utc;
use rusqlite::params;

use super::Database;
use crate::store::KeyValueStore;

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?",
            [key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
               ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_draft;
    use crate::models::Company;
    use crate::store::{CompanyStore, Repository};
    use chrono::NaiveDate;

    #[test]
    fn test_get_missing_key() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.get("nothing").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let db = Database::open_memory().unwrap();
        db.put("k", "one").unwrap();
        db.put("k", "two").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_repository_over_database() {
        let db = Database::open_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let created: Company = {
            let mut repo = Repository::open(&db).unwrap();
            repo.create(sample_draft(), today).unwrap()
        };

        let repo = Repository::open(&db).unwrap();
        assert_eq!(repo.list(), &[created]);
    }
}
