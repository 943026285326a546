//! SQLite adapter tests against a real database file, seeded the way the
//! external ETL step writes it.

mod common;

use common::set;
use folio::{CategoryLookup, IdColumn, Quartile, SqliteCategoryBackend};
use rusqlite::Connection;
use std::collections::BTreeSet;
use tempfile::TempDir;

fn seeded_backend(dir: &TempDir) -> SqliteCategoryBackend {
    let path = dir.path().join("relational.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE Category (
            "internal-id" TEXT,
            "journal-ids" TEXT NOT NULL,
            category TEXT NOT NULL,
            quartile TEXT,
            area TEXT NOT NULL
        );
        INSERT INTO Category VALUES
            ('0', '1234-5678', 'Medicine', 'Q1', 'Health Sciences'),
            ('1', '2049-3630, 2049-363X', 'Oncology', 'Q2', 'Health Sciences'),
            ('2', '2049-3630, 2049-363X', 'Medicine (miscellaneous)', NULL, 'Health Sciences'),
            ('3', '3333-4444', 'History', 'not-a-quartile', 'Arts and Humanities');
        "#,
    )
    .unwrap();
    drop(conn);
    SqliteCategoryBackend::open(&path).unwrap()
}

#[tokio::test]
async fn all_returns_every_assignment_row() {
    let dir = TempDir::new().unwrap();
    let backend = seeded_backend(&dir);
    assert_eq!(backend.all().await.unwrap().len(), 4);
}

#[tokio::test]
async fn by_id_on_name_columns_is_exact_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let backend = seeded_backend(&dir);

    let rows = backend.by_id("medicine", IdColumn::Category).await.unwrap();
    // Exact match: "Medicine (miscellaneous)" must not ride along.
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Medicine");

    let rows = backend.by_id("HEALTH SCIENCES", IdColumn::Area).await.unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn by_id_on_journal_ids_matches_individual_tokens() {
    let dir = TempDir::new().unwrap();
    let backend = seeded_backend(&dir);

    let rows = backend.by_id("2049-363X", IdColumn::JournalIds).await.unwrap();
    assert_eq!(rows.len(), 2);

    let rows = backend
        .by_id("2049-3630, 2049-363X", IdColumn::JournalIds)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn by_id_any_prefers_category_over_area() {
    let dir = TempDir::new().unwrap();
    let backend = seeded_backend(&dir);

    let rows = backend.by_id_any("Medicine").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Medicine");

    let rows = backend.by_id_any("Arts and Humanities").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].area, "Arts and Humanities");
}

#[tokio::test]
async fn quartile_values_parse_and_malformed_become_null() {
    let dir = TempDir::new().unwrap();
    let backend = seeded_backend(&dir);

    let rows = backend.by_id("History", IdColumn::Category).await.unwrap();
    assert_eq!(rows[0].quartile, None);

    let q1: BTreeSet<Quartile> = [Quartile::Q1].into();
    let rows = backend.with_quartile(&q1).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Medicine");

    // Empty set keeps the null-quartile rows too.
    assert_eq!(backend.with_quartile(&BTreeSet::new()).await.unwrap().len(), 4);
}

#[tokio::test]
async fn assignment_filters_match_by_substring() {
    let dir = TempDir::new().unwrap();
    let backend = seeded_backend(&dir);

    let rows = backend.assigned_to_areas(&set(&["health"])).await.unwrap();
    assert_eq!(rows.len(), 3);

    // Substring here, unlike by_id: "medicine" pulls in the
    // miscellaneous variant as well.
    let rows = backend
        .assigned_to_categories(&set(&["medicine"]))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let rows = backend
        .assigned_to_categories(&set(&["oncology", "history"]))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn comma_joined_ids_round_trip_as_lists() {
    let dir = TempDir::new().unwrap();
    let backend = seeded_backend(&dir);

    let rows = backend.by_id("Oncology", IdColumn::Category).await.unwrap();
    assert_eq!(
        rows[0].journal_ids,
        vec!["2049-3630".to_string(), "2049-363X".to_string()]
    );
}

#[tokio::test]
async fn fresh_database_reads_empty() {
    let backend = SqliteCategoryBackend::open_in_memory().unwrap();
    assert!(backend.all().await.unwrap().is_empty());
    assert!(backend
        .by_id("Medicine", IdColumn::Category)
        .await
        .unwrap()
        .is_empty());
}
