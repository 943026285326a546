//! Backend query adapters
//!
//! Two disjoint backends hold the catalog: a triple store with journal
//! attributes, reachable through SPARQL, and a relational table with
//! category/quartile/area assignments, reachable through SQL. Neither has
//! the full picture; the ISSN/EISSN identifiers are the only shared key.
//! Each capability is a trait so the engine can federate any number of
//! registered backends.

mod memory;
mod sparql;
mod sqlite;
mod traits;

pub use memory::{MemoryCategoryBackend, MemoryJournalBackend};
pub use sparql::SparqlJournalBackend;
pub use sqlite::SqliteCategoryBackend;
pub use traits::{
    BackendError, BackendResult, CategoryLookup, CategoryRow, IdColumn, JournalLookup, JournalRow,
};
