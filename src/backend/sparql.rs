//! SPARQL journal-attribute backend
//!
//! Queries a triple store over its SPARQL endpoint. Journals are
//! `schema:Periodical` resources with the properties `identifier`, `name`,
//! `inLanguage`, `publisher`, `hasDOAJSeal`, `license`, and `hasAPC`.
//! Identifiers and languages are multi-valued triples, collapsed per
//! journal with GROUP_CONCAT so each binding row maps to one journal row.

use super::traits::{BackendError, BackendResult, JournalLookup, JournalRow};
use crate::catalog::split_ids;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};

const PREFIXES: &str = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX schema: <https://schema.org/>
";

/// SPARQL-endpoint journal lookup.
pub struct SparqlJournalBackend {
    label: String,
    endpoint: String,
    client: reqwest::Client,
}

impl SparqlJournalBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            label: format!("sparql:{endpoint}"),
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    async fn select(&self, query: String) -> BackendResult<Vec<JournalRow>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/sparql-results+json")
            .form(&[("query", query.as_str())])
            .send()
            .await?
            .error_for_status()?;
        let document: SelectResults = response.json().await?;
        document
            .results
            .bindings
            .into_iter()
            .map(row_from_binding)
            .collect()
    }
}

#[async_trait]
impl JournalLookup for SparqlJournalBackend {
    fn label(&self) -> &str {
        &self.label
    }

    async fn by_id(&self, id: &str) -> BackendResult<Vec<JournalRow>> {
        // A second identifier pattern so the FILTER does not thin out the
        // GROUP_CONCAT aggregation over ?identifier.
        let clause = format!(
            "?journal schema:identifier ?matchId .\n    FILTER (LCASE(STR(?matchId)) = \"{}\")",
            escape_literal(&id.trim().to_lowercase())
        );
        self.select(journal_select(Some(&clause))).await
    }

    async fn all(&self) -> BackendResult<Vec<JournalRow>> {
        self.select(journal_select(None)).await
    }

    async fn with_title(&self, partial_title: &str) -> BackendResult<Vec<JournalRow>> {
        let clause = format!(
            "FILTER (CONTAINS(LCASE(STR(?title)), \"{}\"))",
            escape_literal(&partial_title.to_lowercase())
        );
        self.select(journal_select(Some(&clause))).await
    }

    async fn published_by(&self, partial_name: &str) -> BackendResult<Vec<JournalRow>> {
        let clause = format!(
            "?journal schema:publisher ?matchPublisher .\n    FILTER (CONTAINS(LCASE(STR(?matchPublisher)), \"{}\"))",
            escape_literal(&partial_name.to_lowercase())
        );
        self.select(journal_select(Some(&clause))).await
    }

    async fn with_license(&self, licenses: &BTreeSet<String>) -> BackendResult<Vec<JournalRow>> {
        if licenses.is_empty() {
            return self.all().await;
        }
        let values: Vec<String> = licenses
            .iter()
            .map(|l| format!("\"{}\"", escape_literal(&l.to_lowercase())))
            .collect();
        let clause = format!("FILTER (LCASE(STR(?license)) IN ({}))", values.join(", "));
        self.select(journal_select(Some(&clause))).await
    }

    async fn with_apc(&self) -> BackendResult<Vec<JournalRow>> {
        self.select(journal_select(Some("FILTER (LCASE(STR(?apc)) = \"true\")")))
            .await
    }

    async fn with_doaj_seal(&self) -> BackendResult<Vec<JournalRow>> {
        self.select(journal_select(Some("FILTER (LCASE(STR(?seal)) = \"true\")")))
            .await
    }
}

/// Build the journal SELECT pattern, with an optional extra filter clause.
fn journal_select(filter: Option<&str>) -> String {
    let filter = filter.unwrap_or("");
    format!(
        r#"{PREFIXES}
SELECT ?journal
       (GROUP_CONCAT(DISTINCT ?identifier; separator=", ") AS ?ids)
       ?title
       (GROUP_CONCAT(DISTINCT ?language; separator=", ") AS ?languages)
       (SAMPLE(?publisherValue) AS ?publisher)
       ?seal ?license ?apc
WHERE {{
    ?journal rdf:type schema:Periodical .
    ?journal schema:identifier ?identifier .
    ?journal schema:name ?title .
    ?journal schema:inLanguage ?language .
    ?journal schema:hasDOAJSeal ?seal .
    ?journal schema:license ?license .
    ?journal schema:hasAPC ?apc .
    OPTIONAL {{ ?journal schema:publisher ?publisherValue . }}
    {filter}
}}
GROUP BY ?journal ?title ?seal ?license ?apc"#
    )
}

/// Escape a string for inclusion in a double-quoted SPARQL literal.
fn escape_literal(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

// --- SPARQL 1.1 JSON results ---

#[derive(Debug, Deserialize)]
struct SelectResults {
    results: Bindings,
}

#[derive(Debug, Deserialize)]
struct Bindings {
    bindings: Vec<HashMap<String, Term>>,
}

#[derive(Debug, Deserialize)]
struct Term {
    value: String,
}

fn required<'a>(binding: &'a HashMap<String, Term>, name: &str) -> BackendResult<&'a str> {
    binding
        .get(name)
        .map(|t| t.value.as_str())
        .ok_or_else(|| BackendError::Protocol(format!("missing binding: ?{name}")))
}

/// Boolean literals arrive as strings; ETL variants write `true`/`Yes`/`1`.
fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "yes" | "1")
}

fn row_from_binding(binding: HashMap<String, Term>) -> BackendResult<JournalRow> {
    Ok(JournalRow {
        ids: split_ids(required(&binding, "ids")?),
        title: required(&binding, "title")?.to_string(),
        languages: split_ids(required(&binding, "languages")?),
        publisher: binding.get("publisher").map(|t| t.value.clone()),
        seal: parse_flag(required(&binding, "seal")?),
        license: required(&binding, "license")?.to_string(),
        apc: parse_flag(required(&binding, "apc")?),
    })
}
