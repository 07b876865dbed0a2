//! Record aggregation.
//!
//! The single mutation point of the pipeline: every record pulled from
//! the record source passes through `collect` exactly once.

use crate::models::{AggregateState, Record};

/// Folds one record into the running aggregate.
///
/// Increments `record_count` by exactly one, then for every field in
/// the record bumps that field's accumulator: `field_count` by one,
/// `field_count_total` by the record's occurrence count. Fields seen
/// for the first time start from zeroed counters.
pub fn collect(state: &mut AggregateState, record: &Record) {
    state.record_count += 1;

    for (field, occurrences) in record {
        let entry = state.field_entry(field);
        entry.field_count += 1;
        entry.field_count_total += occurrences;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldStats;

    fn record(fields: &[(&str, u64)]) -> Record {
        fields
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect()
    }

    #[test]
    fn test_record_count_matches_records_fed() {
        let mut state = AggregateState::new();
        for _ in 0..17 {
            collect(&mut state, &record(&[("name", 1)]));
        }
        assert_eq!(state.record_count, 17);
    }

    #[test]
    fn test_empty_record_still_counts() {
        let mut state = AggregateState::new();
        collect(&mut state, &Record::new());
        assert_eq!(state.record_count, 1);
        assert_eq!(state.distinct_fields(), 0);
    }

    #[test]
    fn test_documented_two_record_example() {
        let mut state = AggregateState::new();
        collect(&mut state, &record(&[("name", 1), ("birth", 2)]));
        collect(&mut state, &record(&[("name", 3)]));

        assert_eq!(state.record_count, 2);
        assert_eq!(
            state.field_info.get("name"),
            Some(&FieldStats {
                field_count: 2,
                field_count_total: 4,
            })
        );
        assert_eq!(
            state.field_info.get("birth"),
            Some(&FieldStats {
                field_count: 1,
                field_count_total: 2,
            })
        );
    }

    #[test]
    fn test_field_count_never_exceeds_record_count() {
        let mut state = AggregateState::new();
        let records = [
            record(&[("a", 5), ("b", 1)]),
            record(&[("a", 2)]),
            record(&[("c", 9), ("b", 3)]),
            record(&[]),
        ];

        for r in &records {
            collect(&mut state, r);
            for stats in state.field_info.values() {
                assert!(stats.field_count <= state.record_count);
                assert!(stats.field_count_total >= stats.field_count);
            }
        }
        assert_eq!(state.record_count, 4);
    }
}
