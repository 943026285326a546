//! Core catalog data structures

mod entity;
mod ident;

pub use entity::{Area, Category, Entity, Identifiable, Journal, ParseQuartileError, Quartile};
pub use ident::{classify, join_ids, split_ids, IdKind};

pub(crate) use entity::{collapse_quartiles, dedup_by_identity};
