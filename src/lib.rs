//! Folio: federated catalog engine for scholarly journals
//!
//! Journal attributes live in a SPARQL triple store; category and subject
//! area assignments live in a relational table. The two share nothing but
//! ISSN/EISSN identifiers. Folio federates any number of backends of either
//! kind behind a query engine that classifies identifiers, fans queries out
//! concurrently, joins the results into whole entities, and deduplicates by
//! identity.
//!
//! # Example
//!
//! ```no_run
//! use folio::{FullQueryEngine, SparqlJournalBackend, SqliteCategoryBackend};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), folio::BackendError> {
//! let engine = FullQueryEngine::new();
//! engine.add_journal_handler(Arc::new(SparqlJournalBackend::new(
//!     "http://127.0.0.1:9999/blazegraph/sparql",
//! )));
//! engine.add_category_handler(Arc::new(SqliteCategoryBackend::open("relational.db")?));
//!
//! let entity = engine.get_entity_by_id("2049-3630").await;
//! # let _ = entity;
//! # Ok(())
//! # }
//! ```

mod catalog;

pub mod backend;
pub mod engine;

pub use backend::{
    BackendError, BackendResult, CategoryLookup, CategoryRow, IdColumn, JournalLookup, JournalRow,
    MemoryCategoryBackend, MemoryJournalBackend, SparqlJournalBackend, SqliteCategoryBackend,
};
pub use catalog::{
    classify, join_ids, split_ids, Area, Category, Entity, IdKind, Identifiable, Journal,
    ParseQuartileError, Quartile,
};
pub use engine::{BasicQueryEngine, EngineConfig, FullQueryEngine, HandlerRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
