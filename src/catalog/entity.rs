//! Catalog entity types
//!
//! The catalog holds three kinds of value objects: journals (identified by
//! one or two ISSN/EISSN codes), categories (a name plus an optional
//! quartile), and subject areas (a bare name). They are constructed fresh
//! per resolution call and never mutated afterwards, except for a journal's
//! classification lists being appended during cross-backend resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Quartile ranking tier of a category within a subject ranking system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quartile {
    Q1,
    Q2,
    Q3,
    Q4,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("not a quartile: {0}")]
pub struct ParseQuartileError(String);

impl FromStr for Quartile {
    type Err = ParseQuartileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Q1" => Ok(Quartile::Q1),
            "Q2" => Ok(Quartile::Q2),
            "Q3" => Ok(Quartile::Q3),
            "Q4" => Ok(Quartile::Q4),
            _ => Err(ParseQuartileError(s.to_string())),
        }
    }
}

impl fmt::Display for Quartile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Quartile::Q1 => "Q1",
            Quartile::Q2 => "Q2",
            Quartile::Q3 => "Q3",
            Quartile::Q4 => "Q4",
        };
        write!(f, "{s}")
    }
}

/// Anything addressable by one or more string identifiers.
///
/// Identity equality is order-sensitive equality of the identifier list.
/// Collection deduplication keys on `ids()`, not on full value equality.
pub trait Identifiable {
    fn ids(&self) -> &[String];

    fn same_identity(&self, other: &dyn Identifiable) -> bool {
        self.ids() == other.ids()
    }
}

/// A scholarly journal as assembled by the resolver.
///
/// A journal freshly constructed from a backend attribute row carries empty
/// `categories`/`areas`; they are filled only after a successful
/// cross-backend join on the journal's identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    /// Print ISSN and/or electronic ISSN.
    pub ids: Vec<String>,
    pub title: String,
    /// Languages in which the journal accepts manuscripts.
    pub languages: Vec<String>,
    pub publisher: Option<String>,
    /// DOAJ quality seal.
    pub seal: bool,
    pub license: String,
    /// Whether the journal charges an author-facing publication fee.
    pub apc: bool,
    /// Categories attached by the resolver; empty until resolution.
    pub categories: Vec<Category>,
    /// Subject areas attached by the resolver; empty until resolution.
    pub areas: Vec<Area>,
}

impl Identifiable for Journal {
    fn ids(&self) -> &[String] {
        &self.ids
    }
}

/// A category assignment.
///
/// The same category name may carry different quartiles for different
/// journals, so a `Category` is only meaningful in the context of the
/// association that produced it. A catalog-wide listing collapses the
/// quartiles per name via [`collapse_quartiles`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub quartile: Option<Quartile>,
}

impl Identifiable for Category {
    fn ids(&self) -> &[String] {
        std::slice::from_ref(&self.id)
    }
}

/// A subject area. An area name may coincide with a category name
/// ("Multidisciplinary"); callers disambiguate by which backend column
/// produced the row, never by the name alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
}

impl Identifiable for Area {
    fn ids(&self) -> &[String] {
        std::slice::from_ref(&self.id)
    }
}

/// The closed set of entity kinds a catalog identifier can resolve to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Journal(Journal),
    Category(Category),
    Area(Area),
}

impl Entity {
    pub fn as_journal(&self) -> Option<&Journal> {
        match self {
            Entity::Journal(j) => Some(j),
            _ => None,
        }
    }

    pub fn as_category(&self) -> Option<&Category> {
        match self {
            Entity::Category(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_area(&self) -> Option<&Area> {
        match self {
            Entity::Area(a) => Some(a),
            _ => None,
        }
    }
}

impl Identifiable for Entity {
    fn ids(&self) -> &[String] {
        match self {
            Entity::Journal(j) => j.ids(),
            Entity::Category(c) => c.ids(),
            Entity::Area(a) => a.ids(),
        }
    }
}

/// Collapse the quartiles observed for one category name across rows.
///
/// Exactly one distinct value (including "no quartile") yields that value;
/// any disagreement yields `None` — an unknown quartile never excludes, and
/// conflicting assignments are not guessed at.
pub(crate) fn collapse_quartiles<I>(quartiles: I) -> Option<Quartile>
where
    I: IntoIterator<Item = Option<Quartile>>,
{
    let mut distinct: Vec<Option<Quartile>> = Vec::new();
    for q in quartiles {
        if !distinct.contains(&q) {
            distinct.push(q);
        }
    }
    match distinct.as_slice() {
        [only] => *only,
        _ => None,
    }
}

/// Drop later elements whose identifier list equals an earlier one,
/// preserving first-seen order.
pub(crate) fn dedup_by_identity<T: Identifiable>(items: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.iter().any(|seen| seen.ids() == item.ids()) {
            out.push(item);
        }
    }
    out
}
