//! Basic query engine
//!
//! Holds the two handler registries, fans raw predicate calls out across
//! every registered backend concurrently, and resolves the resulting rows
//! into deduplicated catalog entities. `get_entity_by_id` is the structural
//! core: an explicit decision procedure that classifies an identifier,
//! queries the right capability, and stitches the cross-backend join.
//!
//! Failure semantics: backend errors and timeouts never propagate. They are
//! absorbed into empty row sets at the fan-out boundary and reported via
//! `tracing`, so one flaky backend degrades query completeness instead of
//! aborting the whole federated query. "Not found" is `None`, not an error.

use super::registry::HandlerRegistry;
use super::EngineConfig;
use crate::backend::{
    BackendResult, CategoryLookup, CategoryRow, IdColumn, JournalLookup, JournalRow,
};
use crate::catalog::{
    classify, collapse_quartiles, dedup_by_identity, join_ids, split_ids, Area, Category, Entity,
    IdKind, Journal, Quartile,
};
use futures::future::{join_all, BoxFuture};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Federated query engine over any number of registered backends.
pub struct BasicQueryEngine {
    journal_handlers: HandlerRegistry<dyn JournalLookup>,
    category_handlers: HandlerRegistry<dyn CategoryLookup>,
    config: EngineConfig,
}

impl BasicQueryEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            journal_handlers: HandlerRegistry::new(),
            category_handlers: HandlerRegistry::new(),
            config,
        }
    }

    // --- Registration API ---

    pub fn add_journal_handler(&self, handler: Arc<dyn JournalLookup>) -> bool {
        self.journal_handlers.add(handler)
    }

    pub fn add_category_handler(&self, handler: Arc<dyn CategoryLookup>) -> bool {
        self.category_handlers.add(handler)
    }

    pub fn clean_journal_handlers(&self) -> bool {
        self.journal_handlers.clear()
    }

    pub fn clean_category_handlers(&self) -> bool {
        self.category_handlers.clear()
    }

    // --- Fan-out plumbing ---

    async fn journal_rows<F>(&self, method: &'static str, call: F) -> Vec<JournalRow>
    where
        F: Fn(Arc<dyn JournalLookup>) -> BoxFuture<'static, BackendResult<Vec<JournalRow>>>,
    {
        let snapshot = self.journal_handlers.snapshot();
        let calls: Vec<_> = snapshot
            .iter()
            .map(|h| (h.label().to_string(), call(h.clone())))
            .collect();
        collect_rows(method, self.config.backend_timeout, calls).await
    }

    async fn category_rows<F>(&self, method: &'static str, call: F) -> Vec<CategoryRow>
    where
        F: Fn(Arc<dyn CategoryLookup>) -> BoxFuture<'static, BackendResult<Vec<CategoryRow>>>,
    {
        let snapshot = self.category_handlers.snapshot();
        let calls: Vec<_> = snapshot
            .iter()
            .map(|h| (h.label().to_string(), call(h.clone())))
            .collect();
        collect_rows(method, self.config.backend_timeout, calls).await
    }

    // --- Entity resolution ---

    /// Resolve one identifier into a fully-populated entity.
    ///
    /// `None` is the sole failure signal; backend trouble surfaces here
    /// only as "not found".
    pub async fn get_entity_by_id(&self, id: &str) -> Option<Entity> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        match classify(id) {
            IdKind::Journal => self
                .resolve_journal("get_entity_by_id", id)
                .await
                .map(Entity::Journal),
            IdKind::Opaque => {
                if let Some(category) = self.resolve_category("get_entity_by_id", id).await {
                    return Some(Entity::Category(category));
                }
                self.resolve_area("get_entity_by_id", id)
                    .await
                    .map(Entity::Area)
            }
        }
    }

    /// Resolve a journal-shaped identifier: try the full comma-joined form,
    /// then each individual token, as an ordered candidate list (bounded,
    /// no recursion). First non-empty row in registration order wins.
    pub(crate) async fn resolve_journal(&self, method: &'static str, id: &str) -> Option<Journal> {
        let tokens = split_ids(id);
        let mut candidates = vec![join_ids(&tokens)];
        if tokens.len() > 1 {
            candidates.extend(tokens);
        }

        let mut row: Option<JournalRow> = None;
        for candidate in candidates {
            let rows = self
                .journal_rows(method, move |h| {
                    let candidate = candidate.clone();
                    Box::pin(async move { h.by_id(&candidate).await })
                })
                .await;
            if let Some(first) = rows.into_iter().next() {
                row = Some(first);
                break;
            }
        }
        let row = row?;

        // Cross-backend join: attach categories/areas by journal identity.
        // No assignment data is a partial success, not a failure.
        let joined = join_ids(&row.ids);
        let assignments = self
            .category_rows(method, move |h| {
                let joined = joined.clone();
                Box::pin(async move { h.by_id(&joined, IdColumn::JournalIds).await })
            })
            .await;

        let mut journal = Journal::from(row);
        attach_assignments(&mut journal, &assignments);
        Some(journal)
    }

    /// Resolve an opaque token against the category column, collapsing the
    /// quartiles observed across all backends and rows.
    pub(crate) async fn resolve_category(
        &self,
        method: &'static str,
        name: &str,
    ) -> Option<Category> {
        let query = name.trim().to_string();
        let rows = self
            .category_rows(method, move |h| {
                let query = query.clone();
                Box::pin(async move { h.by_id(&query, IdColumn::Category).await })
            })
            .await;
        let first = rows.first()?;
        Some(Category {
            // Canonical spelling comes from the store, not the caller.
            id: first.category.clone(),
            quartile: collapse_quartiles(rows.iter().map(|r| r.quartile)),
        })
    }

    /// Resolve an opaque token against the area column.
    pub(crate) async fn resolve_area(&self, method: &'static str, name: &str) -> Option<Area> {
        let query = name.trim().to_string();
        let rows = self
            .category_rows(method, move |h| {
                let query = query.clone();
                Box::pin(async move { h.by_id(&query, IdColumn::Area).await })
            })
            .await;
        rows.first().map(CategoryRow::to_area)
    }

    // --- Journal collections ---

    pub async fn get_all_journals(&self) -> Vec<Journal> {
        let rows = self
            .journal_rows("get_all_journals", |h| {
                Box::pin(async move { h.all().await })
            })
            .await;
        self.resolve_journal_rows("get_all_journals", rows).await
    }

    pub async fn get_journals_with_title(&self, partial_title: &str) -> Vec<Journal> {
        let partial = partial_title.to_string();
        let rows = self
            .journal_rows("get_journals_with_title", move |h| {
                let partial = partial.clone();
                Box::pin(async move { h.with_title(&partial).await })
            })
            .await;
        self.resolve_journal_rows("get_journals_with_title", rows)
            .await
    }

    pub async fn get_journals_published_by(&self, partial_name: &str) -> Vec<Journal> {
        let partial = partial_name.to_string();
        let rows = self
            .journal_rows("get_journals_published_by", move |h| {
                let partial = partial.clone();
                Box::pin(async move { h.published_by(&partial).await })
            })
            .await;
        self.resolve_journal_rows("get_journals_published_by", rows)
            .await
    }

    /// Journals whose license is in `licenses`; all journals when the set
    /// is empty.
    pub async fn get_journals_with_license(&self, licenses: &BTreeSet<String>) -> Vec<Journal> {
        let licenses = licenses.clone();
        let rows = self
            .journal_rows("get_journals_with_license", move |h| {
                let licenses = licenses.clone();
                Box::pin(async move { h.with_license(&licenses).await })
            })
            .await;
        self.resolve_journal_rows("get_journals_with_license", rows)
            .await
    }

    pub async fn get_journals_with_apc(&self) -> Vec<Journal> {
        let rows = self
            .journal_rows("get_journals_with_apc", |h| {
                Box::pin(async move { h.with_apc().await })
            })
            .await;
        self.resolve_journal_rows("get_journals_with_apc", rows)
            .await
    }

    pub async fn get_journals_with_doaj_seal(&self) -> Vec<Journal> {
        let rows = self
            .journal_rows("get_journals_with_doaj_seal", |h| {
                Box::pin(async move { h.with_doaj_seal().await })
            })
            .await;
        self.resolve_journal_rows("get_journals_with_doaj_seal", rows)
            .await
    }

    // --- Category / area collections ---

    pub async fn get_all_categories(&self) -> Vec<Category> {
        let rows = self
            .category_rows("get_all_categories", |h| {
                Box::pin(async move { h.all().await })
            })
            .await;
        self.resolve_categories_from("get_all_categories", rows)
            .await
    }

    pub async fn get_all_areas(&self) -> Vec<Area> {
        let rows = self
            .category_rows("get_all_areas", |h| Box::pin(async move { h.all().await }))
            .await;
        self.resolve_areas_from("get_all_areas", rows).await
    }

    /// Categories appearing with any of `quartiles`; all categories
    /// (including null-quartile ones) when the set is empty.
    ///
    /// The returned quartile is still the catalog-wide collapsed value, so
    /// a category matching the filter through one journal may still carry
    /// `None` if its assignments disagree overall.
    pub async fn get_categories_with_quartile(
        &self,
        quartiles: &BTreeSet<Quartile>,
    ) -> Vec<Category> {
        let quartiles = quartiles.clone();
        let rows = self
            .category_rows("get_categories_with_quartile", move |h| {
                let quartiles = quartiles.clone();
                Box::pin(async move { h.with_quartile(&quartiles).await })
            })
            .await;
        self.resolve_categories_from("get_categories_with_quartile", rows)
            .await
    }

    /// Categories assigned to journals in any of `area_ids` (substring
    /// match); all categories when the set is empty.
    pub async fn get_categories_assigned_to_areas(
        &self,
        area_ids: &BTreeSet<String>,
    ) -> Vec<Category> {
        let area_ids = area_ids.clone();
        let rows = self
            .category_rows("get_categories_assigned_to_areas", move |h| {
                let area_ids = area_ids.clone();
                Box::pin(async move { h.assigned_to_areas(&area_ids).await })
            })
            .await;
        self.resolve_categories_from("get_categories_assigned_to_areas", rows)
            .await
    }

    /// Areas assigned to journals in any of `category_ids` (substring
    /// match); all areas when the set is empty.
    pub async fn get_areas_assigned_to_categories(
        &self,
        category_ids: &BTreeSet<String>,
    ) -> Vec<Area> {
        let category_ids = category_ids.clone();
        let rows = self
            .category_rows("get_areas_assigned_to_categories", move |h| {
                let category_ids = category_ids.clone();
                Box::pin(async move { h.assigned_to_categories(&category_ids).await })
            })
            .await;
        self.resolve_areas_from("get_areas_assigned_to_categories", rows)
            .await
    }

    // --- Shared resolution templates ---

    /// Raw rows -> distinct identifier lists -> resolver -> dedup.
    async fn resolve_journal_rows(
        &self,
        method: &'static str,
        rows: Vec<JournalRow>,
    ) -> Vec<Journal> {
        let mut seen: Vec<Vec<String>> = Vec::new();
        let mut journals = Vec::new();
        for row in rows {
            if seen.contains(&row.ids) {
                continue;
            }
            seen.push(row.ids.clone());
            if let Some(journal) = self.resolve_journal(method, &join_ids(&row.ids)).await {
                journals.push(journal);
            }
        }
        dedup_by_identity(journals)
    }

    async fn resolve_categories_from(
        &self,
        method: &'static str,
        rows: Vec<CategoryRow>,
    ) -> Vec<Category> {
        let mut categories = Vec::new();
        for name in distinct_ci(rows.into_iter().map(|r| r.category)) {
            if let Some(category) = self.resolve_category(method, &name).await {
                categories.push(category);
            }
        }
        dedup_by_identity(categories)
    }

    async fn resolve_areas_from(&self, method: &'static str, rows: Vec<CategoryRow>) -> Vec<Area> {
        let mut areas = Vec::new();
        for name in distinct_ci(rows.into_iter().map(|r| r.area)) {
            if let Some(area) = self.resolve_area(method, &name).await {
                areas.push(area);
            }
        }
        dedup_by_identity(areas)
    }
}

impl Default for BasicQueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Run all backend calls concurrently, each under the per-call timeout, and
/// merge results in registration order. Failures and timeouts collapse to
/// empty row sets and are reported with the originating method and backend.
async fn collect_rows<R>(
    method: &'static str,
    timeout: Duration,
    calls: Vec<(String, BoxFuture<'static, BackendResult<Vec<R>>>)>,
) -> Vec<R> {
    let futures = calls.into_iter().map(|(backend, fut)| async move {
        match tokio::time::timeout(timeout, fut).await {
            Ok(Ok(rows)) => rows,
            Ok(Err(error)) => {
                warn!(method, backend = %backend, error = %error, "backend call failed, treating as empty");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    method,
                    backend = %backend,
                    timeout_ms = timeout.as_millis() as u64,
                    "backend call timed out, treating as empty"
                );
                Vec::new()
            }
        }
    });
    join_all(futures).await.into_iter().flatten().collect()
}

/// Attach one `Category` per distinct (name, quartile) pair and one `Area`
/// per distinct area name, in first-seen row order.
fn attach_assignments(journal: &mut Journal, rows: &[CategoryRow]) {
    for row in rows {
        let category = row.to_category();
        if !journal.categories.contains(&category) {
            journal.categories.push(category);
        }
        let area = row.to_area();
        if !journal.areas.contains(&area) {
            journal.areas.push(area);
        }
    }
}

/// Distinct strings, case-insensitively, preserving first-seen spelling
/// and order.
fn distinct_ci(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let key = value.to_lowercase();
        if !keys.contains(&key) {
            keys.push(key);
            out.push(value);
        }
    }
    out
}
