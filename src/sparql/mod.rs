//! SPARQL endpoint collaborator.
//!
//! Thin I/O wrapper around a remote SPARQL service: query construction
//! and the HTTP client that turns query results into entity lists and
//! usage records.

pub mod client;
pub mod query;

pub use client::SparqlClient;
