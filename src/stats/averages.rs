//! Derived per-field averages.

use crate::error::StatsError;
use crate::models::{AggregateState, AveragedFieldStats};
use std::collections::BTreeMap;

/// Derives the averaged view of every field in the aggregate.
///
/// Fails with [`StatsError::EmptyAggregate`] when nothing has been
/// collected yet; callers are expected to skip the report in that case
/// rather than divide by zero. The per-field division by `field_count`
/// cannot fail: an accumulator only exists once at least one record
/// carried the field.
///
/// This is a full recomputation over a snapshot, linear in the number
/// of distinct fields. Repeated calls against the same snapshot yield
/// identical results.
pub fn compute(
    state: &AggregateState,
) -> Result<BTreeMap<String, AveragedFieldStats>, StatsError> {
    if state.record_count == 0 {
        return Err(StatsError::EmptyAggregate);
    }

    let record_count = state.record_count as f64;

    let averaged = state
        .field_info
        .iter()
        .map(|(field, stats)| {
            let total = stats.field_count_total as f64;
            let view = AveragedFieldStats {
                field_count: stats.field_count,
                field_count_total: stats.field_count_total,
                field_count_total_average: total / record_count,
                field_count_element_average: total / stats.field_count as f64,
            };
            (field.clone(), view)
        })
        .collect();

    Ok(averaged)
}
