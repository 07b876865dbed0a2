//! Bar-chart rendering of a field-usage snapshot.
//!
//! Pure formatting: the renderer never mutates anything and is safe to
//! call repeatedly on a growing aggregate.

use crate::models::AveragedFieldStats;
use std::collections::BTreeMap;

/// Width of the bar column. One marker per four percentage points, so a
/// field present on every record fills the column exactly.
const BAR_WIDTH: usize = 25;

/// Renders the snapshot as a table with one row per field, sorted
/// lexicographically by field identifier.
///
/// Each row shows the field name right-justified to the longest
/// identifier in the snapshot, a proportional `=` bar, the raw
/// `used/total` fraction, and the usage percentage truncated to an
/// integer:
///
/// ```text
/// http://schema.org/name: |============             |      1/2 |  50%
/// ```
pub fn render(record_count: u64, averaged: &BTreeMap<String, AveragedFieldStats>) -> String {
    let name_width = averaged.keys().map(|field| field.len()).max().unwrap_or(0);

    let mut output = String::new();
    for (field, stats) in averaged {
        let percent = (stats.field_count as f64 / record_count as f64) * 100.0;
        let bar = "=".repeat((percent / 4.0) as usize);

        output.push_str(&format!(
            "{:>name_width$}: |{:<BAR_WIDTH$}| {:>6}/{} | {:>3}% \n",
            field, bar, stats.field_count, record_count, percent as u64,
        ));
    }

    output
}
