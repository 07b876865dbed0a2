//! Error types for the assessment pipeline.
//!
//! Transport failures are fatal: nothing in the pipeline catches a
//! `SparqlError`, so the first one aborts the run. `StatsError` is the
//! one guarded condition; callers skip the report instead of computing
//! averages over an empty aggregate.

use thiserror::Error;

/// Errors from the SPARQL endpoint collaborator.
#[derive(Debug, Error)]
pub enum SparqlError {
    /// Failed to reach the endpoint or decode its response body.
    #[error("SPARQL request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("SPARQL endpoint returned {status}: {body}")]
    Endpoint {
        status: reqwest::StatusCode,
        body: String,
    },

    /// A result row is missing a variable the query selected.
    #[error("result binding is missing variable `{0}`")]
    MissingBinding(&'static str),

    /// An occurrence count did not parse as a non-negative integer.
    #[error("occurrence count `{value}` is not a non-negative integer")]
    BadCount { value: String },
}

/// Errors from the statistics core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    /// Averages were requested before any record was collected.
    #[error("cannot compute averages over an empty aggregate")]
    EmptyAggregate,
}
