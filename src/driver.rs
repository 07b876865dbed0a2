//! The assessment loop.
//!
//! Pulls entity listings and usage records from a record source,
//! feeds the aggregator, and emits progress output: one record is
//! fetched, then aggregated, before the next fetch begins. Fixed
//! pacing sleeps sit before every remote call to respect the shared
//! endpoint's usage policy; they are not adaptive.

use crate::error::StatsError;
use crate::models::{AggregateState, ConceptClass, Record};
use crate::report::render;
use crate::stats::{collect, compute};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Source of entity listings and per-entity usage records.
///
/// Every call may block on network I/O. Implementations report
/// failures as errors; the driver does not catch them, so the first
/// failure aborts the run.
pub trait RecordSource {
    /// Lists every known entity identifier belonging to a concept
    /// class. Order is not guaranteed and not relied upon.
    async fn list_entities(&self, concept: &str) -> Result<Vec<String>>;

    /// Returns one entity's field-usage record. Only properties that
    /// occur at least once appear in it.
    async fn field_usage(&self, entity: &str) -> Result<Record>;
}

/// Knobs for one assessment run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Emit a state dump and bar report every this many records.
    pub report_interval: u64,
    /// Sleep before each entity-listing call.
    pub list_delay: Duration,
    /// Sleep before each per-entity usage call.
    pub entity_delay: Duration,
    /// Cap on entities per concept class, for bounded runs.
    pub max_entities: Option<usize>,
    /// Clear the aggregate before each concept class, producing
    /// per-class isolated statistics instead of cumulative ones.
    pub reset_per_concept: bool,
    /// Draw a per-concept progress bar.
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            report_interval: 500,
            list_delay: Duration::from_millis(250),
            entity_delay: Duration::from_millis(1000),
            max_entities: None,
            reset_per_concept: false,
            show_progress: true,
        }
    }
}

/// What a completed run processed, for the final summary.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub concepts_processed: usize,
    pub records_processed: u64,
    /// Distinct fields in the aggregate at the end of the run. With
    /// `reset_per_concept` this covers only the last class.
    pub distinct_fields: usize,
}

/// Assesses every concept class in order, mutating `state` in place.
pub async fn run<S: RecordSource>(
    source: &S,
    concepts: &[ConceptClass],
    state: &mut AggregateState,
    options: &RunOptions,
) -> Result<RunSummary> {
    let interval = options.report_interval.max(1);
    let mut records_processed = 0u64;

    for class in concepts {
        if options.reset_per_concept {
            state.reset();
        }

        println!("Concept: {}", class.concept);
        if let Some(ref real_world_type) = class.real_world_type {
            debug!(
                concept = %class.concept,
                real_world_type = %real_world_type,
                "assessing concept class"
            );
        }

        sleep(options.list_delay).await;
        let mut entities = source.list_entities(&class.concept).await?;
        if let Some(max) = options.max_entities {
            entities.truncate(max);
        }
        info!(
            concept = %class.concept,
            entities = entities.len(),
            "entity listing complete"
        );

        let progress = make_progress_bar(entities.len() as u64, options.show_progress);

        for entity in &entities {
            sleep(options.entity_delay).await;
            let record = source.field_usage(entity).await?;
            collect(state, &record);
            records_processed += 1;
            progress.inc(1);

            if state.record_count % interval == 0 {
                progress.suspend(|| print_interval_report(state))?;
            }
        }

        progress.finish_and_clear();
        println!("DONE with {}", class.concept);
        if state.record_count > 0 {
            print_bar_report(state)?;
        }
    }

    Ok(RunSummary {
        concepts_processed: concepts.len(),
        records_processed,
        distinct_fields: state.distinct_fields(),
    })
}

/// Periodic progress output: processed line, raw state dump, report.
fn print_interval_report(state: &AggregateState) -> Result<(), StatsError> {
    println!("{} records processed", state.record_count);
    println!("{:#?}", state);
    print_bar_report(state)
}

/// Renders and prints the bar report for the current snapshot. Callers
/// guard against an empty aggregate; the interval path cannot hit one.
fn print_bar_report(state: &AggregateState) -> Result<(), StatsError> {
    let averaged = compute(state)?;
    println!();
    print!("{}", render(state.record_count, &averaged));

    if let Some((field, stats)) = averaged.iter().max_by(|a, b| {
        a.1.field_count_element_average
            .total_cmp(&b.1.field_count_element_average)
    }) {
        debug!(
            field = %field,
            occurrences = stats.field_count_total,
            per_record = stats.field_count_total_average,
            per_carrier = stats.field_count_element_average,
            "most repeated field"
        );
    }

    Ok(())
}

fn make_progress_bar(len: u64, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeSource {
        entities: HashMap<String, Vec<String>>,
        usage: HashMap<String, Record>,
    }

    impl FakeSource {
        fn new() -> Self {
            let mut entities = HashMap::new();
            entities.insert(
                "urn:concept:a".to_string(),
                vec!["urn:a:1".to_string(), "urn:a:2".to_string()],
            );
            entities.insert("urn:concept:b".to_string(), vec!["urn:b:1".to_string()]);

            let mut usage = HashMap::new();
            usage.insert("urn:a:1".to_string(), record(&[("name", 1), ("birth", 2)]));
            usage.insert("urn:a:2".to_string(), record(&[("name", 3)]));
            usage.insert("urn:b:1".to_string(), record(&[("label", 1)]));

            Self { entities, usage }
        }
    }

    impl RecordSource for FakeSource {
        async fn list_entities(&self, concept: &str) -> Result<Vec<String>> {
            self.entities
                .get(concept)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("unknown concept class: {concept}"))
        }

        async fn field_usage(&self, entity: &str) -> Result<Record> {
            Ok(self.usage.get(entity).cloned().unwrap_or_default())
        }
    }

    fn record(fields: &[(&str, u64)]) -> Record {
        fields
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect()
    }

    fn quiet_options() -> RunOptions {
        RunOptions {
            report_interval: 500,
            list_delay: Duration::ZERO,
            entity_delay: Duration::ZERO,
            max_entities: None,
            reset_per_concept: false,
            show_progress: false,
        }
    }

    fn concepts() -> Vec<ConceptClass> {
        vec![
            ConceptClass::bare("urn:concept:a"),
            ConceptClass::bare("urn:concept:b"),
        ]
    }

    #[test]
    fn test_cumulative_run_spans_concept_classes() {
        let source = FakeSource::new();
        let mut state = AggregateState::new();

        let summary = tokio_test::block_on(run(
            &source,
            &concepts(),
            &mut state,
            &quiet_options(),
        ))
        .unwrap();

        assert_eq!(summary.concepts_processed, 2);
        assert_eq!(summary.records_processed, 3);
        assert_eq!(state.record_count, 3);
        // Fields from the first class survive into the second.
        assert!(state.field_info.contains_key("name"));
        assert!(state.field_info.contains_key("label"));
        assert_eq!(summary.distinct_fields, 3);
    }

    #[test]
    fn test_reset_per_concept_isolates_classes() {
        let source = FakeSource::new();
        let mut state = AggregateState::new();
        let options = RunOptions {
            reset_per_concept: true,
            ..quiet_options()
        };

        let summary =
            tokio_test::block_on(run(&source, &concepts(), &mut state, &options)).unwrap();

        assert_eq!(summary.records_processed, 3);
        // Only the last class remains in the aggregate.
        assert_eq!(state.record_count, 1);
        assert!(!state.field_info.contains_key("name"));
        assert!(state.field_info.contains_key("label"));
    }

    #[test]
    fn test_max_entities_caps_each_class() {
        let source = FakeSource::new();
        let mut state = AggregateState::new();
        let options = RunOptions {
            max_entities: Some(1),
            ..quiet_options()
        };

        let summary =
            tokio_test::block_on(run(&source, &concepts(), &mut state, &options)).unwrap();

        assert_eq!(summary.records_processed, 2);
        assert_eq!(state.record_count, 2);
    }

    #[test]
    fn test_interval_reporting_path_runs() {
        let source = FakeSource::new();
        let mut state = AggregateState::new();
        let options = RunOptions {
            report_interval: 1,
            ..quiet_options()
        };

        let summary =
            tokio_test::block_on(run(&source, &concepts(), &mut state, &options)).unwrap();
        assert_eq!(summary.records_processed, 3);
    }

    #[test]
    fn test_listing_failure_aborts_the_run() {
        let source = FakeSource::new();
        let mut state = AggregateState::new();
        let missing = vec![ConceptClass::bare("urn:concept:missing")];

        let result = tokio_test::block_on(run(&source, &missing, &mut state, &quiet_options()));
        assert!(result.is_err());
        assert_eq!(state.record_count, 0);
    }
}
