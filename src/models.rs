//! Data models for the vocabulary assessor.
//!
//! This module contains the core data structures shared across the
//! pipeline: one entity's property-usage profile, the running
//! aggregate, and its derived averaged view.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One entity's property-usage profile: field identifier to the number
/// of times that property occurs on the entity. Produced by the record
/// source, consumed once by the aggregator.
///
/// Only properties that occur at least once appear; absence means
/// "not used", not zero.
pub type Record = HashMap<String, u64>;

/// Per-field accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStats {
    /// Number of records that contained this field at all.
    pub field_count: u64,
    /// Sum of this field's occurrence counts over those records.
    pub field_count_total: u64,
}

/// The running tally of all records processed so far.
///
/// Created once at process start and mutated incrementally by the
/// aggregator. By default it is never cleared between concept classes,
/// so later reports carry the totals of earlier classes; `reset`
/// switches to per-class isolated statistics when the caller wants
/// them.
#[derive(Debug, Clone, Default)]
pub struct AggregateState {
    /// Number of records collected so far.
    pub record_count: u64,
    /// Per-field accumulators, keyed by field identifier.
    pub field_info: BTreeMap<String, FieldStats>,
}

impl AggregateState {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the accumulator for `field`, creating it with both
    /// counters at zero if this is the first record to mention it.
    pub fn field_entry(&mut self, field: &str) -> &mut FieldStats {
        self.field_info.entry(field.to_string()).or_default()
    }

    /// Clears all counters, returning the aggregate to its initial
    /// state.
    pub fn reset(&mut self) {
        self.record_count = 0;
        self.field_info.clear();
    }

    /// Number of distinct fields observed so far.
    pub fn distinct_fields(&self) -> usize {
        self.field_info.len()
    }
}

/// Read-only derived view of a `FieldStats`, extended with the two
/// per-field averages. Recomputed fresh from a snapshot on every
/// request; never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AveragedFieldStats {
    pub field_count: u64,
    pub field_count_total: u64,
    /// `field_count_total / record_count`: mean occurrences per record,
    /// counting records that lack the field as zero.
    pub field_count_total_average: f64,
    /// `field_count_total / field_count`: mean occurrences per record
    /// that actually carries the field.
    pub field_count_element_average: f64,
}

/// A concept class to assess, optionally paired with the schema class
/// of its real-world counterpart. The pairing is documentation only and
/// never drives logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptClass {
    /// IRI of the concept class whose instances are assessed.
    pub concept: String,
    /// IRI of the corresponding real-world-object class, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_world_type: Option<String>,
}

impl ConceptClass {
    /// Creates a concept class with a documented real-world pairing.
    pub fn paired(concept: &str, real_world_type: &str) -> Self {
        Self {
            concept: concept.to_string(),
            real_world_type: Some(real_world_type.to_string()),
        }
    }

    /// Creates a concept class with no documented pairing.
    pub fn bare(concept: &str) -> Self {
        Self {
            concept: concept.to_string(),
            real_world_type: None,
        }
    }
}
