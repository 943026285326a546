//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use folio::{BackendError, BackendResult, CategoryRow, JournalLookup, JournalRow, Quartile};
use std::collections::BTreeSet;

pub fn journal_row(
    ids: &[&str],
    title: &str,
    publisher: Option<&str>,
    license: &str,
    apc: bool,
    seal: bool,
) -> JournalRow {
    JournalRow {
        ids: ids.iter().map(|s| s.to_string()).collect(),
        title: title.to_string(),
        languages: vec!["English".to_string()],
        publisher: publisher.map(|p| p.to_string()),
        seal,
        license: license.to_string(),
        apc,
    }
}

pub fn category_row(
    journal_ids: &[&str],
    category: &str,
    quartile: Option<Quartile>,
    area: &str,
) -> CategoryRow {
    CategoryRow {
        journal_ids: journal_ids.iter().map(|s| s.to_string()).collect(),
        category: category.to_string(),
        quartile,
        area: area.to_string(),
    }
}

pub fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn refused<T>() -> BackendResult<Vec<T>> {
    Err(BackendError::Unavailable("connection refused".to_string()))
}

/// Journal backend that fails every call, for exercising error absorption.
pub struct BrokenJournalBackend;

#[async_trait::async_trait]
impl JournalLookup for BrokenJournalBackend {
    fn label(&self) -> &str {
        "broken"
    }

    async fn by_id(&self, _id: &str) -> BackendResult<Vec<JournalRow>> {
        refused()
    }

    async fn all(&self) -> BackendResult<Vec<JournalRow>> {
        refused()
    }

    async fn with_title(&self, _partial_title: &str) -> BackendResult<Vec<JournalRow>> {
        refused()
    }

    async fn published_by(&self, _partial_name: &str) -> BackendResult<Vec<JournalRow>> {
        refused()
    }

    async fn with_license(&self, _licenses: &BTreeSet<String>) -> BackendResult<Vec<JournalRow>> {
        refused()
    }

    async fn with_apc(&self) -> BackendResult<Vec<JournalRow>> {
        refused()
    }

    async fn with_doaj_seal(&self) -> BackendResult<Vec<JournalRow>> {
        refused()
    }
}

/// Journal backend that hangs long enough to trip any short test timeout.
pub struct StalledJournalBackend;

impl StalledJournalBackend {
    async fn stall<T>(&self) -> BackendResult<Vec<T>> {
        tokio::time::sleep(std::time::Duration::from_secs(600)).await;
        Ok(Vec::new())
    }
}

#[async_trait::async_trait]
impl JournalLookup for StalledJournalBackend {
    fn label(&self) -> &str {
        "stalled"
    }

    async fn by_id(&self, _id: &str) -> BackendResult<Vec<JournalRow>> {
        self.stall().await
    }

    async fn all(&self) -> BackendResult<Vec<JournalRow>> {
        self.stall().await
    }

    async fn with_title(&self, _partial_title: &str) -> BackendResult<Vec<JournalRow>> {
        self.stall().await
    }

    async fn published_by(&self, _partial_name: &str) -> BackendResult<Vec<JournalRow>> {
        self.stall().await
    }

    async fn with_license(&self, _licenses: &BTreeSet<String>) -> BackendResult<Vec<JournalRow>> {
        self.stall().await
    }

    async fn with_apc(&self) -> BackendResult<Vec<JournalRow>> {
        self.stall().await
    }

    async fn with_doaj_seal(&self) -> BackendResult<Vec<JournalRow>> {
        self.stall().await
    }
}
