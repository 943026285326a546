//! Identifier classification
//!
//! Decides whether a caller-supplied string names a journal (one or more
//! ISSN-shaped tokens, comma-separated) or is an opaque category/area token.
//! Opaque tokens are disambiguated later by which backend returns a
//! non-empty result — never here.

use regex::Regex;
use std::sync::LazyLock;

/// ISSN/EISSN token shape: 4 digits, hyphen, 3-4 digits with an optional
/// trailing check character `X`.
static ISSN_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{3,4}X?$").unwrap());

/// What kind of entity an identifier string points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// One or more comma-separated ISSN-shaped tokens.
    Journal,
    /// Anything else: a category or area name, told apart downstream.
    Opaque,
}

/// Classify an identifier string. Never fails; unclassifiable input is
/// simply [`IdKind::Opaque`].
pub fn classify(id: &str) -> IdKind {
    let tokens = split_ids(id);
    if !tokens.is_empty() && tokens.iter().all(|t| ISSN_TOKEN.is_match(t)) {
        IdKind::Journal
    } else {
        IdKind::Opaque
    }
}

/// Split a comma-joined identifier field into trimmed, non-empty tokens.
/// Multi-valued fields are comma-separated strings at the storage boundary.
pub fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join identifier tokens back into the storage-boundary form.
pub fn join_ids(ids: &[String]) -> String {
    ids.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_issn_is_journal() {
        assert_eq!(classify("2049-3630"), IdKind::Journal);
    }

    #[test]
    fn issn_with_check_character_is_journal() {
        assert_eq!(classify("2049-363X"), IdKind::Journal);
        assert_eq!(classify("1234-5678X"), IdKind::Journal);
    }

    #[test]
    fn comma_separated_issns_are_journal() {
        assert_eq!(classify("2049-3630, 1234-5678X"), IdKind::Journal);
        assert_eq!(classify("2049-3630,1234-5678"), IdKind::Journal);
    }

    #[test]
    fn names_are_opaque() {
        assert_eq!(classify("Computer Science"), IdKind::Opaque);
        assert_eq!(classify("Multidisciplinary"), IdKind::Opaque);
    }

    #[test]
    fn partially_issn_shaped_input_is_opaque() {
        assert_eq!(classify("2049-3630, Medicine"), IdKind::Opaque);
        assert_eq!(classify("20493630"), IdKind::Opaque);
        assert_eq!(classify("2049-36300"), IdKind::Opaque);
        assert_eq!(classify(""), IdKind::Opaque);
        assert_eq!(classify("  ,  "), IdKind::Opaque);
    }

    #[test]
    fn lowercase_check_character_is_opaque() {
        // The token grammar is `\d{4}-\d{3,4}X?` with an uppercase X only.
        assert_eq!(classify("2049-363x"), IdKind::Opaque);
    }

    #[test]
    fn split_trims_and_drops_empties() {
        assert_eq!(
            split_ids(" 2049-3630 , 1234-5678, "),
            vec!["2049-3630".to_string(), "1234-5678".to_string()]
        );
        assert!(split_ids("").is_empty());
    }

    #[test]
    fn join_uses_storage_separator() {
        let ids = vec!["2049-3630".to_string(), "1234-5678".to_string()];
        assert_eq!(join_ids(&ids), "2049-3630, 1234-5678");
    }
}
