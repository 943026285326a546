//! Backend capability traits and row types

use crate::catalog::{Area, Category, Journal, Quartile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur inside a backend adapter.
///
/// These never reach engine callers: the federation layer absorbs them into
/// empty results and reports them on the log channel, so a flaky backend
/// degrades query completeness instead of aborting the whole query.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("endpoint error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed query response: {0}")]
    Protocol(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for backend adapter operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// One journal attribute row, typed at the adapter boundary.
///
/// Multi-valued storage fields (identifiers, languages) arrive as
/// comma-joined strings and become lists here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalRow {
    pub ids: Vec<String>,
    pub title: String,
    pub languages: Vec<String>,
    pub publisher: Option<String>,
    pub seal: bool,
    pub license: String,
    pub apc: bool,
}

impl From<JournalRow> for Journal {
    /// A journal built from a raw row has empty classification lists; the
    /// resolver fills them after the cross-backend join.
    fn from(row: JournalRow) -> Self {
        Journal {
            ids: row.ids,
            title: row.title,
            languages: row.languages,
            publisher: row.publisher,
            seal: row.seal,
            license: row.license,
            apc: row.apc,
            categories: Vec::new(),
            areas: Vec::new(),
        }
    }
}

/// One (journal, category, area) assignment row from the relational table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub journal_ids: Vec<String>,
    pub category: String,
    pub quartile: Option<Quartile>,
    pub area: String,
}

impl CategoryRow {
    pub fn to_category(&self) -> Category {
        Category {
            id: self.category.clone(),
            quartile: self.quartile,
        }
    }

    pub fn to_area(&self) -> Area {
        Area {
            id: self.area.clone(),
        }
    }
}

/// Which relational column an identifier is matched against.
///
/// The same identifier string means different things depending on what the
/// caller believes it is; the producing column, never the name alone,
/// disambiguates category/area collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdColumn {
    Category,
    Area,
    JournalIds,
}

/// Journal-attribute lookup over a graph-pattern backend.
///
/// Text predicates filter by case-insensitive substring containment; the
/// license predicate is case-insensitive set membership; flag predicates
/// are exact. An empty filter set means "no filter".
#[async_trait]
pub trait JournalLookup: Send + Sync {
    /// Backend label used for log attribution.
    fn label(&self) -> &str;

    /// Rows whose identifier matches `id` exactly (case-insensitive).
    async fn by_id(&self, id: &str) -> BackendResult<Vec<JournalRow>>;

    async fn all(&self) -> BackendResult<Vec<JournalRow>>;

    async fn with_title(&self, partial_title: &str) -> BackendResult<Vec<JournalRow>>;

    async fn published_by(&self, partial_name: &str) -> BackendResult<Vec<JournalRow>>;

    /// Rows whose license is in `licenses`; all rows when the set is empty.
    async fn with_license(&self, licenses: &BTreeSet<String>) -> BackendResult<Vec<JournalRow>>;

    async fn with_apc(&self) -> BackendResult<Vec<JournalRow>>;

    async fn with_doaj_seal(&self) -> BackendResult<Vec<JournalRow>>;
}

/// Category/area assignment lookup over a relational backend.
///
/// By-id lookups on the category and area columns match exactly
/// (case-insensitive); the assignment-filter methods match by
/// case-insensitive substring. The asymmetry is intentional disambiguation
/// against near-duplicate names — do not unify the two.
#[async_trait]
pub trait CategoryLookup: Send + Sync {
    /// Backend label used for log attribution.
    fn label(&self) -> &str;

    /// Rows where `id` matches the given column. For
    /// [`IdColumn::JournalIds`] a row matches when any comma-separated
    /// token of `id` appears among the row's journal identifiers.
    async fn by_id(&self, id: &str, column: IdColumn) -> BackendResult<Vec<CategoryRow>>;

    /// Match `id` against the category, then area, then journal-ids
    /// columns, in that fixed order, returning the first non-empty match.
    async fn by_id_any(&self, id: &str) -> BackendResult<Vec<CategoryRow>> {
        for column in [IdColumn::Category, IdColumn::Area, IdColumn::JournalIds] {
            let rows = self.by_id(id, column).await?;
            if !rows.is_empty() {
                return Ok(rows);
            }
        }
        Ok(Vec::new())
    }

    async fn all(&self) -> BackendResult<Vec<CategoryRow>>;

    /// Rows whose quartile is in `quartiles`; all rows (including
    /// null-quartile rows) when the set is empty.
    async fn with_quartile(&self, quartiles: &BTreeSet<Quartile>) -> BackendResult<Vec<CategoryRow>>;

    /// Rows whose area name contains any of `area_ids` (case-insensitive
    /// substring); all rows when the set is empty.
    async fn assigned_to_areas(&self, area_ids: &BTreeSet<String>)
        -> BackendResult<Vec<CategoryRow>>;

    /// Rows whose category name contains any of `category_ids`
    /// (case-insensitive substring); all rows when the set is empty.
    async fn assigned_to_categories(
        &self,
        category_ids: &BTreeSet<String>,
    ) -> BackendResult<Vec<CategoryRow>>;
}
