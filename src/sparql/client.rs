//! HTTP client for the SPARQL protocol.
//!
//! Issues SELECT queries over GET and decodes the SPARQL 1.1 JSON
//! results format. Transport failures are typed but never retried or
//! caught downstream; the first one aborts the run.

use crate::config::EndpointConfig;
use crate::driver::RecordSource;
use crate::error::SparqlError;
use crate::models::Record;
use crate::sparql::query;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// A SPARQL 1.1 JSON results document, reduced to the parts SELECT
/// responses carry.
#[derive(Debug, Deserialize)]
struct SelectResults {
    results: BindingSet,
}

#[derive(Debug, Deserialize)]
struct BindingSet {
    bindings: Vec<HashMap<String, RdfTerm>>,
}

/// One bound RDF term. The term type (`uri`, `literal`, `bnode`) is
/// carried by the document but irrelevant here; only the value is used.
#[derive(Debug, Deserialize)]
struct RdfTerm {
    value: String,
}

/// Client for one SPARQL endpoint.
///
/// Construct once at process start from the endpoint configuration and
/// use read-only for the duration of the run.
pub struct SparqlClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SparqlClient {
    /// Builds a client for the configured endpoint.
    pub fn new(config: &EndpointConfig) -> Result<Self, SparqlError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            endpoint: config.url.clone(),
        })
    }

    /// Runs a SELECT query and decodes the JSON results document.
    async fn select(&self, sparql: &str) -> Result<SelectResults, SparqlError> {
        debug!(endpoint = %self.endpoint, "issuing SPARQL SELECT");

        let response = self
            .http
            .get(&self.endpoint)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .query(&[("query", sparql)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SparqlError::Endpoint { status, body });
        }

        Ok(response.json().await?)
    }
}

impl RecordSource for SparqlClient {
    async fn list_entities(&self, concept: &str) -> anyhow::Result<Vec<String>> {
        let results = self.select(&query::entities_by_type(concept)).await?;
        Ok(entities_from(results)?)
    }

    async fn field_usage(&self, entity: &str) -> anyhow::Result<Record> {
        let results = self.select(&query::predicate_counts(entity)).await?;
        Ok(record_from(results)?)
    }
}

/// Extracts the entity identifiers from a listing result document.
fn entities_from(results: SelectResults) -> Result<Vec<String>, SparqlError> {
    results
        .results
        .bindings
        .into_iter()
        .map(|mut row| {
            row.remove("entity")
                .map(|term| term.value)
                .ok_or(SparqlError::MissingBinding("entity"))
        })
        .collect()
}

/// Extracts one entity's usage record from a predicate-count result
/// document. Counts for a predicate bound more than once accumulate.
fn record_from(results: SelectResults) -> Result<Record, SparqlError> {
    let mut record = Record::new();

    for mut row in results.results.bindings {
        let predicate = row
            .remove("predicate")
            .map(|term| term.value)
            .ok_or(SparqlError::MissingBinding("predicate"))?;
        let occurrences = row
            .remove("occurrences")
            .map(|term| term.value)
            .ok_or(SparqlError::MissingBinding("occurrences"))?;

        let count: u64 = occurrences
            .parse()
            .map_err(|_| SparqlError::BadCount { value: occurrences })?;

        *record.entry(predicate).or_default() += count;
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(document: &str) -> SelectResults {
        serde_json::from_str(document).unwrap()
    }

    #[test]
    fn test_entities_from_listing_document() {
        let results = parse(
            r#"{
                "head": { "vars": ["entity"] },
                "results": { "bindings": [
                    { "entity": { "type": "uri", "value": "http://vocab.getty.edu/tgn/1000063" } },
                    { "entity": { "type": "uri", "value": "http://vocab.getty.edu/tgn/7002445" } }
                ] }
            }"#,
        );

        let entities = entities_from(results).unwrap();
        assert_eq!(
            entities,
            vec![
                "http://vocab.getty.edu/tgn/1000063",
                "http://vocab.getty.edu/tgn/7002445",
            ]
        );
    }

    #[test]
    fn test_empty_listing_is_not_an_error() {
        let results = parse(r#"{ "head": { "vars": ["entity"] }, "results": { "bindings": [] } }"#);
        assert!(entities_from(results).unwrap().is_empty());
    }

    #[test]
    fn test_listing_row_without_entity_variable_is_rejected() {
        let results = parse(
            r#"{
                "head": { "vars": ["entity"] },
                "results": { "bindings": [ { "other": { "type": "uri", "value": "x" } } ] }
            }"#,
        );
        assert!(matches!(
            entities_from(results),
            Err(SparqlError::MissingBinding("entity"))
        ));
    }

    #[test]
    fn test_record_from_count_document() {
        let results = parse(
            r#"{
                "head": { "vars": ["predicate", "occurrences"] },
                "results": { "bindings": [
                    { "predicate": { "type": "uri", "value": "http://schema.org/name" },
                      "occurrences": { "type": "literal", "value": "3" } },
                    { "predicate": { "type": "uri", "value": "http://schema.org/birthDate" },
                      "occurrences": { "type": "literal", "value": "1" } }
                ] }
            }"#,
        );

        let record = record_from(results).unwrap();
        assert_eq!(record.get("http://schema.org/name"), Some(&3));
        assert_eq!(record.get("http://schema.org/birthDate"), Some(&1));
    }

    #[test]
    fn test_duplicate_predicate_bindings_accumulate() {
        let results = parse(
            r#"{
                "head": { "vars": ["predicate", "occurrences"] },
                "results": { "bindings": [
                    { "predicate": { "type": "uri", "value": "http://schema.org/name" },
                      "occurrences": { "type": "literal", "value": "2" } },
                    { "predicate": { "type": "uri", "value": "http://schema.org/name" },
                      "occurrences": { "type": "literal", "value": "5" } }
                ] }
            }"#,
        );

        let record = record_from(results).unwrap();
        assert_eq!(record.get("http://schema.org/name"), Some(&7));
    }

    #[test]
    fn test_non_numeric_count_is_rejected() {
        let results = parse(
            r#"{
                "head": { "vars": ["predicate", "occurrences"] },
                "results": { "bindings": [
                    { "predicate": { "type": "uri", "value": "http://schema.org/name" },
                      "occurrences": { "type": "literal", "value": "many" } }
                ] }
            }"#,
        );
        assert!(matches!(
            record_from(results),
            Err(SparqlError::BadCount { .. })
        ));
    }
}
