//! Streaming field-usage statistics.
//!
//! The aggregator mutates a single running `AggregateState` one record
//! at a time; the averages module derives a read-only view from a
//! snapshot of it.

pub mod aggregator;
pub mod averages;

pub use aggregator::collect;
pub use averages::compute;
