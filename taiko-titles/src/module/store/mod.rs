///! SQLite-backed title store
///!
///! Every call opens its own connection, makes sure the schema exists,
///! and closes the connection again before returning.

mod query;
mod schema;

pub use query::{TitleOrder, TitleQuery};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use std::path::{Path, PathBuf};
use taiko_common::{DuplicateName, TitleRecord};

use crate::error::Result;

/// What an upsert did to the natural key it was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted(i64),
    Updated(i64),
}

impl Upsert {
    pub fn id(&self) -> i64 {
        match self {
            Upsert::Inserted(id) | Upsert::Updated(id) => *id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TitleStore {
    path: PathBuf,
}

impl TitleStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(schema::SCHEMA)?;
        Ok(conn)
    }

    /// Create the table if absent. Other calls do this too; this exists for start-up logging.
    pub fn init(&self) -> Result<()> {
        self.connect()?;
        tracing::info!("Title database ready: {}", self.path.display());
        Ok(())
    }

    /// Insert a new title or refresh `available`/`tips`/`updated_at` of an existing one
    pub fn upsert(
        &self,
        name: &str,
        available: bool,
        rarity_color: &str,
        obtain_condition: &str,
        tips: &str,
    ) -> Result<Upsert> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let now = Utc::now();

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM titles
                 WHERE title_name = ?1 AND rarity_color = ?2 AND obtain_condition = ?3",
                params![name, rarity_color, obtain_condition],
                |row| row.get(0),
            )
            .optional()?;

        let outcome = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE titles SET is_available = ?1, tips = ?2, updated_at = ?3 WHERE id = ?4",
                    params![available, tips, now, id],
                )?;
                tracing::debug!("Updated title {} ({}, {})", name, rarity_color, id);
                Upsert::Updated(id)
            }
            None => {
                tx.execute(
                    "INSERT INTO titles (title_name, is_available, rarity_color,
                                         obtain_condition, tips, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                    params![name, available, rarity_color, obtain_condition, tips, now],
                )?;
                let id = tx.last_insert_rowid();
                tracing::debug!("Inserted title {} ({}, {})", name, rarity_color, id);
                Upsert::Inserted(id)
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    /// Run an arbitrary predicate combination
    pub fn find(&self, query: &TitleQuery) -> Result<Vec<TitleRecord>> {
        let conn = self.connect()?;
        let (sql, values) = query.to_sql();
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(values.iter()), row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn find_all(&self) -> Result<Vec<TitleRecord>> {
        self.find(&TitleQuery::new())
    }

    pub fn find_available(&self) -> Result<Vec<TitleRecord>> {
        self.find(&TitleQuery::new().available(true))
    }

    pub fn find_by_color(&self, color: &str) -> Result<Vec<TitleRecord>> {
        self.find(&TitleQuery::new().color(color))
    }

    /// Substring match on name and/or exact color; `None` means "no constraint"
    pub fn find_by_name_and_color(
        &self,
        name_pattern: Option<&str>,
        color: Option<&str>,
    ) -> Result<Vec<TitleRecord>> {
        let mut query = TitleQuery::new();
        if let Some(pattern) = name_pattern {
            query = query.name_contains(pattern);
        }
        if let Some(color) = color {
            query = query.color(color);
        }
        self.find(&query)
    }

    /// All versions of one title name
    pub fn find_by_name(&self, name: &str) -> Result<Vec<TitleRecord>> {
        self.find(
            &TitleQuery::new()
                .name_equals(name)
                .order_by(TitleOrder::ByColorThenCondition),
        )
    }

    /// Names stored more than once, most versions first
    pub fn find_duplicate_names(&self) -> Result<Vec<DuplicateName>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT title_name, COUNT(*) AS count
             FROM titles
             GROUP BY title_name
             HAVING COUNT(*) > 1
             ORDER BY count DESC, title_name",
        )?;
        let duplicates = stmt
            .query_map([], |row| {
                Ok(DuplicateName {
                    name: row.get(0)?,
                    count: row.get::<_, i64>(1)? as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(duplicates)
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM titles", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<TitleRecord> {
    Ok(TitleRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        available: row.get(2)?,
        rarity_color: row.get(3)?,
        obtain_condition: row.get(4)?,
        tips: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        created_at: row.get::<_, DateTime<Utc>>(6)?,
        updated_at: row.get::<_, DateTime<Utc>>(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, TitleStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TitleStore::new(dir.path().join("titles.db"));
        (dir, store)
    }

    #[test]
    fn test_upsert_same_key_updates_in_place() {
        let (_dir, store) = temp_store();

        let first = store
            .upsert("太鼓の達人", true, "#ded523", "おにで10曲クリア", "")
            .unwrap();
        assert!(matches!(first, Upsert::Inserted(_)));
        let before = store.find_all().unwrap().remove(0);

        let second = store
            .upsert("太鼓の達人", false, "#ded523", "おにで10曲クリア", "期間限定")
            .unwrap();
        assert_eq!(second, Upsert::Updated(first.id()));

        let all = store.find_all().unwrap();
        assert_eq!(all.len(), 1);
        let after = &all[0];
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
        assert!(!after.available);
        assert_eq!(after.tips, "期間限定");
    }

    #[test]
    fn test_color_variants_are_distinct_records() {
        let (_dir, store) = temp_store();
        store.upsert("月下打人", true, "#ded523", "条件A", "").unwrap();
        store.upsert("月下打人", true, "#c0c0c0", "条件A", "").unwrap();

        let versions = store.find_by_name("月下打人").unwrap();
        assert_eq!(versions.len(), 2);
        assert_ne!(versions[0].id, versions[1].id);
        // ordered by color
        assert_eq!(versions[0].rarity_color, "#c0c0c0");
        assert_eq!(versions[1].rarity_color, "#ded523");
    }

    #[test]
    fn test_ids_increase_and_find_all_is_ordered() {
        let (_dir, store) = temp_store();
        let a = store.upsert("A", true, "gold", "x", "").unwrap().id();
        let b = store.upsert("B", true, "gold", "x", "").unwrap().id();
        let c = store.upsert("C", true, "gold", "x", "").unwrap().id();
        assert!(a < b && b < c);

        let names: Vec<String> = store.find_all().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_find_available_and_by_color() {
        let (_dir, store) = temp_store();
        store.upsert("A", true, "#ded523", "x", "").unwrap();
        store.upsert("B", false, "#ded523", "x", "").unwrap();
        store.upsert("C", true, "#c0c0c0", "x", "").unwrap();

        let available: Vec<String> = store
            .find_available()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(available, vec!["A", "C"]);

        let gold: Vec<String> = store
            .find_by_color("#ded523")
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(gold, vec!["A", "B"]);
        assert!(store.find_by_color("#DED523").unwrap().is_empty());
    }

    #[test]
    fn test_find_by_name_and_color_filters() {
        let (_dir, store) = temp_store();
        store.upsert("太鼓の達人", true, "#ded523", "x", "").unwrap();
        store.upsert("太鼓の達人 極", true, "#c0c0c0", "y", "").unwrap();
        store.upsert("Drum Master", true, "#ded523", "z", "").unwrap();
        store.upsert("100%達成", true, "#ded523", "w", "").unwrap();

        assert_eq!(store.find_by_name_and_color(None, None).unwrap().len(), 4);
        assert_eq!(store.find_by_name_and_color(Some("達人"), None).unwrap().len(), 2);
        assert_eq!(
            store
                .find_by_name_and_color(Some("達人"), Some("#c0c0c0"))
                .unwrap()
                .len(),
            1
        );
        assert_eq!(store.find_by_name_and_color(None, Some("#ded523")).unwrap().len(), 3);
        // case-sensitive
        assert!(store.find_by_name_and_color(Some("drum"), None).unwrap().is_empty());
        assert_eq!(store.find_by_name_and_color(Some("Drum"), None).unwrap().len(), 1);
        // LIKE wildcards are literal
        assert_eq!(store.find_by_name_and_color(Some("%"), None).unwrap().len(), 1);
        assert!(store.find_by_name_and_color(Some("_"), None).unwrap().is_empty());
    }

    #[test]
    fn test_find_duplicate_names_counts() {
        let (_dir, store) = temp_store();
        store.upsert("A", true, "gold", "1", "").unwrap();
        store.upsert("A", true, "silver", "1", "").unwrap();
        store.upsert("A", true, "gold", "2", "").unwrap();
        store.upsert("B", true, "gold", "1", "").unwrap();
        store.upsert("B", true, "gold", "2", "").unwrap();
        store.upsert("C", true, "gold", "1", "").unwrap();
        // re-sighting does not add a version
        store.upsert("C", false, "gold", "1", "note").unwrap();

        let dups = store.find_duplicate_names().unwrap();
        assert_eq!(
            dups,
            vec![
                DuplicateName { name: "A".to_string(), count: 3 },
                DuplicateName { name: "B".to_string(), count: 2 },
            ]
        );
        assert_eq!(store.count().unwrap(), 6);
    }

    #[test]
    fn test_persisted_across_store_instances() {
        let (dir, store) = temp_store();
        store.upsert("A", true, "gold", "1", "tip").unwrap();

        let reopened = TitleStore::new(dir.path().join("titles.db"));
        let all = reopened.find_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].tips, "tip");
    }
}
