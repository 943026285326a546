//! SQLite category-assignment backend
//!
//! Reads the externally-produced `Category` table: one row per
//! (journal, category, area) triple, with a comma-joined `journal-ids`
//! string and a nullable quartile. The table is written by an external ETL
//! step; this adapter is read-only.

use super::traits::{BackendError, BackendResult, CategoryLookup, CategoryRow, IdColumn};
use crate::catalog::{split_ids, Quartile};
use async_trait::async_trait;
use rusqlite::{params_from_iter, Connection};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;

const SELECT_ROWS: &str = r#"SELECT "journal-ids", category, quartile, area FROM Category"#;

/// SQLite-backed category lookup.
///
/// Thread-safe via an internal mutex on the connection.
pub struct SqliteCategoryBackend {
    label: String,
    conn: Mutex<Connection>,
}

impl SqliteCategoryBackend {
    /// Open a relational database file.
    pub fn open(path: impl AsRef<Path>) -> BackendResult<Self> {
        let label = format!("sqlite:{}", path.as_ref().display());
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            label,
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (useful for testing).
    pub fn open_in_memory() -> BackendResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            label: "sqlite::memory:".to_string(),
            conn: Mutex::new(conn),
        })
    }

    /// Create the `Category` table if the ETL step has not run yet, so that
    /// reads against a fresh database return empty rather than erroring.
    fn init_schema(conn: &Connection) -> BackendResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS Category (
                "internal-id" TEXT,
                "journal-ids" TEXT NOT NULL,
                category TEXT NOT NULL,
                quartile TEXT,
                area TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn query(&self, sql: &str, params: &[String]) -> BackendResult<Vec<CategoryRow>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| BackendError::Unavailable("connection mutex poisoned".to_string()))?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            let ids: String = row.get(0)?;
            let quartile: Option<String> = row.get(2)?;
            Ok(CategoryRow {
                journal_ids: split_ids(&ids),
                category: row.get(1)?,
                // Values outside Q1-Q4 are treated as "no quartile".
                quartile: quartile.and_then(|q| q.parse::<Quartile>().ok()),
                area: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Build an OR chain of case-insensitive substring conditions over one
    /// column, one placeholder per needle.
    fn substring_clause(column: &str, count: usize) -> String {
        let conditions: Vec<String> = (1..=count)
            .map(|n| format!("INSTR(LOWER({column}), LOWER(?{n})) > 0"))
            .collect();
        format!("{SELECT_ROWS} WHERE {}", conditions.join(" OR "))
    }
}

#[async_trait]
impl CategoryLookup for SqliteCategoryBackend {
    fn label(&self) -> &str {
        &self.label
    }

    async fn by_id(&self, id: &str, column: IdColumn) -> BackendResult<Vec<CategoryRow>> {
        let id = id.trim();
        match column {
            IdColumn::Category => self.query(
                &format!("{SELECT_ROWS} WHERE LOWER(category) = LOWER(?1)"),
                &[id.to_string()],
            ),
            IdColumn::Area => self.query(
                &format!("{SELECT_ROWS} WHERE LOWER(area) = LOWER(?1)"),
                &[id.to_string()],
            ),
            IdColumn::JournalIds => {
                let tokens = split_ids(id);
                if tokens.is_empty() {
                    return Ok(Vec::new());
                }
                let sql = Self::substring_clause(r#""journal-ids""#, tokens.len());
                self.query(&sql, &tokens)
            }
        }
    }

    async fn all(&self) -> BackendResult<Vec<CategoryRow>> {
        self.query(SELECT_ROWS, &[])
    }

    async fn with_quartile(&self, quartiles: &BTreeSet<Quartile>) -> BackendResult<Vec<CategoryRow>> {
        if quartiles.is_empty() {
            return self.all().await;
        }
        let placeholders: Vec<String> = (1..=quartiles.len()).map(|n| format!("?{n}")).collect();
        let sql = format!(
            "{SELECT_ROWS} WHERE UPPER(quartile) IN ({})",
            placeholders.join(", ")
        );
        let params: Vec<String> = quartiles.iter().map(|q| q.to_string()).collect();
        self.query(&sql, &params)
    }

    async fn assigned_to_areas(
        &self,
        area_ids: &BTreeSet<String>,
    ) -> BackendResult<Vec<CategoryRow>> {
        if area_ids.is_empty() {
            return self.all().await;
        }
        let sql = Self::substring_clause("area", area_ids.len());
        let params: Vec<String> = area_ids.iter().cloned().collect();
        self.query(&sql, &params)
    }

    async fn assigned_to_categories(
        &self,
        category_ids: &BTreeSet<String>,
    ) -> BackendResult<Vec<CategoryRow>> {
        if category_ids.is_empty() {
            return self.all().await;
        }
        let sql = Self::substring_clause("category", category_ids.len());
        let params: Vec<String> = category_ids.iter().cloned().collect();
        self.query(&sql, &params)
    }
}
