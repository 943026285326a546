//! Full query engine
//!
//! Compound queries that cut across both backend families. Each one fetches
//! the resolved journal set from the basic engine and filters on the
//! attached classification lists, so the set algebra runs over already
//! joined entities rather than raw rows.

use super::basic::BasicQueryEngine;
use super::EngineConfig;
use crate::catalog::{Journal, Quartile};
use std::collections::BTreeSet;
use std::ops::Deref;

/// Extends [`BasicQueryEngine`] with cross-backend compound queries.
///
/// Derefs to the basic engine, so registration and the primitive queries
/// are available on it directly.
pub struct FullQueryEngine {
    basic: BasicQueryEngine,
}

impl FullQueryEngine {
    pub fn new() -> Self {
        Self {
            basic: BasicQueryEngine::new(),
        }
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            basic: BasicQueryEngine::with_config(config),
        }
    }

    /// Journals with at least one assigned category in `category_ids`
    /// carrying a quartile in `quartiles`. Either set empty means "all".
    ///
    /// A category with no quartile never excludes a journal: unknown rank
    /// is not evidence of the wrong rank.
    pub async fn get_journals_in_categories_with_quartile(
        &self,
        category_ids: &BTreeSet<String>,
        quartiles: &BTreeSet<Quartile>,
    ) -> Vec<Journal> {
        let targets = lowercase_set(category_ids);
        self.basic
            .get_all_journals()
            .await
            .into_iter()
            .filter(|j| category_quartile_match(j, &targets, quartiles))
            .collect()
    }

    /// Journals with at least one assigned area in `area_ids` whose license
    /// is in `licenses`. Either set empty means "all".
    pub async fn get_journals_in_areas_with_license(
        &self,
        area_ids: &BTreeSet<String>,
        licenses: &BTreeSet<String>,
    ) -> Vec<Journal> {
        let area_targets = lowercase_set(area_ids);
        self.basic
            .get_journals_with_license(licenses)
            .await
            .into_iter()
            .filter(|j| area_match(j, &area_targets))
            .collect()
    }

    /// Diamond journals (no author-facing publication fee) matching either
    /// leg: an assigned area in `area_ids`, or an assigned category in
    /// `category_ids` with a quartile in `quartiles`. Empty sets mean "all"
    /// within their leg.
    pub async fn get_diamond_journals_in_areas_and_categories_with_quartile(
        &self,
        area_ids: &BTreeSet<String>,
        category_ids: &BTreeSet<String>,
        quartiles: &BTreeSet<Quartile>,
    ) -> Vec<Journal> {
        let area_targets = lowercase_set(area_ids);
        let category_targets = lowercase_set(category_ids);
        self.basic
            .get_all_journals()
            .await
            .into_iter()
            .filter(|j| {
                !j.apc
                    && (area_match(j, &area_targets)
                        || category_quartile_match(j, &category_targets, quartiles))
            })
            .collect()
    }
}

impl Default for FullQueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for FullQueryEngine {
    type Target = BasicQueryEngine;

    fn deref(&self) -> &Self::Target {
        &self.basic
    }
}

fn lowercase_set(values: &BTreeSet<String>) -> BTreeSet<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

/// At least one attached category whose name is in `targets` (all names
/// when empty) and whose quartile is in `quartiles` (any quartile when
/// empty; a null quartile always passes).
fn category_quartile_match(
    journal: &Journal,
    targets: &BTreeSet<String>,
    quartiles: &BTreeSet<Quartile>,
) -> bool {
    journal.categories.iter().any(|c| {
        (targets.is_empty() || targets.contains(&c.id.to_lowercase()))
            && (quartiles.is_empty() || c.quartile.map_or(true, |q| quartiles.contains(&q)))
    })
}

/// At least one attached area whose name is in `targets`, or any attached
/// area when `targets` is empty.
fn area_match(journal: &Journal, targets: &BTreeSet<String>) -> bool {
    journal
        .areas
        .iter()
        .any(|a| targets.is_empty() || targets.contains(&a.id.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CategoryRow, JournalRow, MemoryCategoryBackend, MemoryJournalBackend};
    use std::sync::Arc;

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn quartiles(values: &[Quartile]) -> BTreeSet<Quartile> {
        values.iter().copied().collect()
    }

    /// Three journals: a diamond Q1-medicine journal, an APC-charging
    /// engineering journal, and a diamond journal with no assignments.
    fn engine_with_fixture() -> FullQueryEngine {
        let engine = FullQueryEngine::new();
        engine.add_journal_handler(Arc::new(MemoryJournalBackend::new(
            "journals",
            vec![
                JournalRow {
                    ids: vec!["1234-5678".into()],
                    title: "Clinical Trials Quarterly".into(),
                    languages: vec!["English".into()],
                    publisher: Some("Acme Press".into()),
                    seal: true,
                    license: "CC BY".into(),
                    apc: false,
                },
                JournalRow {
                    ids: vec!["2049-3630".into()],
                    title: "Applied Gearworks".into(),
                    languages: vec!["German".into()],
                    publisher: None,
                    seal: false,
                    license: "CC BY-NC".into(),
                    apc: true,
                },
                JournalRow {
                    ids: vec!["1111-2222".into()],
                    title: "Unfiled Letters".into(),
                    languages: vec!["English".into()],
                    publisher: None,
                    seal: false,
                    license: "CC0".into(),
                    apc: false,
                },
            ],
        )));
        engine.add_category_handler(Arc::new(MemoryCategoryBackend::new(
            "categories",
            vec![
                CategoryRow {
                    journal_ids: vec!["1234-5678".into()],
                    category: "Medicine".into(),
                    quartile: Some(Quartile::Q1),
                    area: "Health Sciences".into(),
                },
                CategoryRow {
                    journal_ids: vec!["2049-3630".into()],
                    category: "Mechanical Engineering".into(),
                    quartile: Some(Quartile::Q3),
                    area: "Physical Sciences".into(),
                },
            ],
        )));
        engine
    }

    #[tokio::test]
    async fn categories_with_quartile_filters_both_legs() {
        let engine = engine_with_fixture();
        let journals = engine
            .get_journals_in_categories_with_quartile(
                &ids(&["medicine"]),
                &quartiles(&[Quartile::Q1]),
            )
            .await;
        assert_eq!(journals.len(), 1);
        assert_eq!(journals[0].title, "Clinical Trials Quarterly");

        let none = engine
            .get_journals_in_categories_with_quartile(
                &ids(&["medicine"]),
                &quartiles(&[Quartile::Q4]),
            )
            .await;
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn empty_sets_mean_no_filter() {
        let engine = engine_with_fixture();
        let journals = engine
            .get_journals_in_categories_with_quartile(&BTreeSet::new(), &BTreeSet::new())
            .await;
        // The unclassified journal has no category to match at all.
        assert_eq!(journals.len(), 2);
    }

    #[tokio::test]
    async fn null_quartile_never_excludes() {
        let engine = FullQueryEngine::new();
        engine.add_journal_handler(Arc::new(MemoryJournalBackend::new(
            "journals",
            vec![JournalRow {
                ids: vec!["3333-4444".into()],
                title: "Unranked Review".into(),
                languages: vec!["English".into()],
                publisher: None,
                seal: false,
                license: "CC BY".into(),
                apc: false,
            }],
        )));
        engine.add_category_handler(Arc::new(MemoryCategoryBackend::new(
            "categories",
            vec![CategoryRow {
                journal_ids: vec!["3333-4444".into()],
                category: "Philosophy".into(),
                quartile: None,
                area: "Humanities".into(),
            }],
        )));
        let journals = engine
            .get_journals_in_categories_with_quartile(
                &ids(&["Philosophy"]),
                &quartiles(&[Quartile::Q2]),
            )
            .await;
        assert_eq!(journals.len(), 1);
    }

    #[tokio::test]
    async fn areas_with_license_intersects() {
        let engine = engine_with_fixture();
        let journals = engine
            .get_journals_in_areas_with_license(&ids(&["Health Sciences"]), &ids(&["cc by"]))
            .await;
        assert_eq!(journals.len(), 1);
        assert_eq!(journals[0].license, "CC BY");

        let none = engine
            .get_journals_in_areas_with_license(&ids(&["Health Sciences"]), &ids(&["CC0"]))
            .await;
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn diamond_requires_no_apc_and_either_leg() {
        let engine = engine_with_fixture();
        // The engineering journal matches the category leg but charges an
        // APC; the medicine journal matches both and is free.
        let journals = engine
            .get_diamond_journals_in_areas_and_categories_with_quartile(
                &ids(&["Physical Sciences"]),
                &ids(&["Medicine"]),
                &quartiles(&[Quartile::Q1]),
            )
            .await;
        assert_eq!(journals.len(), 1);
        assert_eq!(journals[0].title, "Clinical Trials Quarterly");
    }

    #[tokio::test]
    async fn diamond_legs_are_disjunctive() {
        let engine = engine_with_fixture();
        // Area leg alone carries the match; the category leg is empty here
        // because no Q4 assignment exists.
        let journals = engine
            .get_diamond_journals_in_areas_and_categories_with_quartile(
                &ids(&["Health Sciences"]),
                &ids(&["Mechanical Engineering"]),
                &quartiles(&[Quartile::Q4]),
            )
            .await;
        assert_eq!(journals.len(), 1);
        assert_eq!(journals[0].title, "Clinical Trials Quarterly");
    }

    #[tokio::test]
    async fn primitive_queries_reach_through_deref() {
        let engine = engine_with_fixture();
        let journals = engine.get_journals_with_title("gearworks").await;
        assert_eq!(journals.len(), 1);
        assert_eq!(journals[0].title, "Applied Gearworks");
    }
}
