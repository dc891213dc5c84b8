//! Result aggregation and report output
//!
//! Collects one [`Summary`] per (provider, call-rate) sweep and renders the
//! three outputs: the console table, a CSV file, and one HTML chart per
//! transport group. File outputs land in the configured output directory
//! under `{network}_{timestamp}` names.

mod chart;
mod csv;

pub use chart::ChartWriter;
pub use csv::CsvWriter;

use crate::stats::Summary;
use std::collections::BTreeMap;

/// Composite key for one sweep. Ordering is provider name first, then
/// call-rate numerically, which is exactly the report row order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SweepKey {
    pub provider: String,
    pub rate: u32,
}

impl SweepKey {
    pub fn new(provider: &str, rate: u32) -> Self {
        Self {
            provider: provider.to_string(),
            rate,
        }
    }

    /// Row label, e.g. `amoy_quicknode_http_16_calls`
    pub fn label(&self) -> String {
        format!("{}_{}_calls", self.provider, self.rate)
    }
}

/// All sweep summaries of one run, iterated in report order
#[derive(Debug, Clone, Default)]
pub struct ResultsTable {
    entries: BTreeMap<SweepKey, Summary>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: SweepKey, summary: Summary) {
        self.entries.insert(key, summary);
    }

    /// Entries sorted by provider name, then numerically by call-rate
    pub fn iter(&self) -> impl Iterator<Item = (&SweepKey, &Summary)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Provider names present in the table, deduplicated, sorted
    pub fn providers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(|k| k.provider.as_str()).collect();
        names.dedup();
        names
    }

    /// Tab-separated console rendering, matching the CSV column order
    pub fn render_console(&self) -> String {
        let mut out = String::from("Metric\t\tMin\tMax\tAvg\tMedian\n");
        for (key, summary) in self.iter() {
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                key.label(),
                summary.min,
                summary.max,
                summary.avg,
                summary.median
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(ms: u64) -> Summary {
        Summary {
            min: ms,
            max: ms,
            avg: ms as f64,
            median: ms as f64,
        }
    }

    #[test]
    fn test_key_label() {
        assert_eq!(SweepKey::new("node_a", 16).label(), "node_a_16_calls");
    }

    #[test]
    fn test_table_ordering_is_provider_then_numeric_rate() {
        let mut table = ResultsTable::new();
        table.insert(SweepKey::new("b", 2), summary(1));
        table.insert(SweepKey::new("a", 160), summary(1));
        table.insert(SweepKey::new("a", 2), summary(1));
        table.insert(SweepKey::new("a", 16), summary(1));

        let labels: Vec<String> = table.iter().map(|(k, _)| k.label()).collect();
        // numeric rate order, not lexical (16 < 160, 2 before 16)
        assert_eq!(labels, vec!["a_2_calls", "a_16_calls", "a_160_calls", "b_2_calls"]);
    }

    #[test]
    fn test_expected_key_matrix() {
        let mut table = ResultsTable::new();
        for provider in ["A", "B"] {
            for rate in [1, 2] {
                table.insert(SweepKey::new(provider, rate), summary(10));
            }
        }

        assert_eq!(table.len(), 4);
        let labels: Vec<String> = table.iter().map(|(k, _)| k.label()).collect();
        assert_eq!(labels, vec!["A_1_calls", "A_2_calls", "B_1_calls", "B_2_calls"]);
    }

    #[test]
    fn test_providers_deduplicated() {
        let mut table = ResultsTable::new();
        table.insert(SweepKey::new("a", 1), summary(1));
        table.insert(SweepKey::new("a", 2), summary(1));
        table.insert(SweepKey::new("b", 1), summary(1));
        assert_eq!(table.providers(), vec!["a", "b"]);
    }

    #[test]
    fn test_console_rendering() {
        let mut table = ResultsTable::new();
        table.insert(
            SweepKey::new("node", 1),
            Summary {
                min: 10,
                max: 40,
                avg: 25.0,
                median: 25.0,
            },
        );

        let rendered = table.render_console();
        assert!(rendered.starts_with("Metric\t\tMin\tMax\tAvg\tMedian\n"));
        assert!(rendered.contains("node_1_calls\t10\t40\t25\t25\n"));
    }

    #[test]
    fn test_empty_table_renders_header_only() {
        let table = ResultsTable::new();
        assert_eq!(table.render_console(), "Metric\t\tMin\tMax\tAvg\tMedian\n");
    }
}
