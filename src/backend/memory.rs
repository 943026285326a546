//! In-memory backends
//!
//! Row-vector implementations of both capabilities with the same matching
//! semantics as the network-backed adapters. Useful for tests and demos the
//! same way an in-memory store stands in for a persistent one.

use super::traits::{
    BackendResult, CategoryLookup, CategoryRow, IdColumn, JournalLookup, JournalRow,
};
use crate::catalog::{split_ids, Quartile};
use async_trait::async_trait;
use std::collections::BTreeSet;

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// In-memory journal-attribute backend.
pub struct MemoryJournalBackend {
    label: String,
    rows: Vec<JournalRow>,
}

impl MemoryJournalBackend {
    pub fn new(label: impl Into<String>, rows: Vec<JournalRow>) -> Self {
        Self {
            label: label.into(),
            rows,
        }
    }
}

#[async_trait]
impl JournalLookup for MemoryJournalBackend {
    fn label(&self) -> &str {
        &self.label
    }

    async fn by_id(&self, id: &str) -> BackendResult<Vec<JournalRow>> {
        Ok(self
            .rows
            .iter()
            .filter(|r| r.ids.iter().any(|i| i.eq_ignore_ascii_case(id.trim())))
            .cloned()
            .collect())
    }

    async fn all(&self) -> BackendResult<Vec<JournalRow>> {
        Ok(self.rows.clone())
    }

    async fn with_title(&self, partial_title: &str) -> BackendResult<Vec<JournalRow>> {
        Ok(self
            .rows
            .iter()
            .filter(|r| contains_ci(&r.title, partial_title))
            .cloned()
            .collect())
    }

    async fn published_by(&self, partial_name: &str) -> BackendResult<Vec<JournalRow>> {
        Ok(self
            .rows
            .iter()
            .filter(|r| {
                r.publisher
                    .as_deref()
                    .is_some_and(|p| contains_ci(p, partial_name))
            })
            .cloned()
            .collect())
    }

    async fn with_license(&self, licenses: &BTreeSet<String>) -> BackendResult<Vec<JournalRow>> {
        if licenses.is_empty() {
            return self.all().await;
        }
        Ok(self
            .rows
            .iter()
            .filter(|r| licenses.iter().any(|l| l.eq_ignore_ascii_case(&r.license)))
            .cloned()
            .collect())
    }

    async fn with_apc(&self) -> BackendResult<Vec<JournalRow>> {
        Ok(self.rows.iter().filter(|r| r.apc).cloned().collect())
    }

    async fn with_doaj_seal(&self) -> BackendResult<Vec<JournalRow>> {
        Ok(self.rows.iter().filter(|r| r.seal).cloned().collect())
    }
}

/// In-memory category-assignment backend.
pub struct MemoryCategoryBackend {
    label: String,
    rows: Vec<CategoryRow>,
}

impl MemoryCategoryBackend {
    pub fn new(label: impl Into<String>, rows: Vec<CategoryRow>) -> Self {
        Self {
            label: label.into(),
            rows,
        }
    }
}

#[async_trait]
impl CategoryLookup for MemoryCategoryBackend {
    fn label(&self) -> &str {
        &self.label
    }

    async fn by_id(&self, id: &str, column: IdColumn) -> BackendResult<Vec<CategoryRow>> {
        let id = id.trim();
        let rows = match column {
            // Exact case-insensitive match on the name columns.
            IdColumn::Category => self
                .rows
                .iter()
                .filter(|r| r.category.eq_ignore_ascii_case(id))
                .cloned()
                .collect(),
            IdColumn::Area => self
                .rows
                .iter()
                .filter(|r| r.area.eq_ignore_ascii_case(id))
                .cloned()
                .collect(),
            // Token containment: any token of the queried id among the
            // row's journal identifiers.
            IdColumn::JournalIds => {
                let tokens = split_ids(id);
                self.rows
                    .iter()
                    .filter(|r| {
                        r.journal_ids
                            .iter()
                            .any(|jid| tokens.iter().any(|t| jid.eq_ignore_ascii_case(t)))
                    })
                    .cloned()
                    .collect()
            }
        };
        Ok(rows)
    }

    async fn all(&self) -> BackendResult<Vec<CategoryRow>> {
        Ok(self.rows.clone())
    }

    async fn with_quartile(&self, quartiles: &BTreeSet<Quartile>) -> BackendResult<Vec<CategoryRow>> {
        if quartiles.is_empty() {
            return self.all().await;
        }
        Ok(self
            .rows
            .iter()
            .filter(|r| r.quartile.is_some_and(|q| quartiles.contains(&q)))
            .cloned()
            .collect())
    }

    async fn assigned_to_areas(
        &self,
        area_ids: &BTreeSet<String>,
    ) -> BackendResult<Vec<CategoryRow>> {
        if area_ids.is_empty() {
            return self.all().await;
        }
        Ok(self
            .rows
            .iter()
            .filter(|r| area_ids.iter().any(|a| contains_ci(&r.area, a)))
            .cloned()
            .collect())
    }

    async fn assigned_to_categories(
        &self,
        category_ids: &BTreeSet<String>,
    ) -> BackendResult<Vec<CategoryRow>> {
        if category_ids.is_empty() {
            return self.all().await;
        }
        Ok(self
            .rows
            .iter()
            .filter(|r| category_ids.iter().any(|c| contains_ci(&r.category, c)))
            .cloned()
            .collect())
    }
}
