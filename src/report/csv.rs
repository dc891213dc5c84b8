//! CSV report writer

use super::ResultsTable;
use crate::error::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the results table as `{network}_{timestamp}.csv` in the output
/// directory, creating the directory if absent.
pub struct CsvWriter {
    output_dir: PathBuf,
}

impl CsvWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Write the CSV and return its path. A table with no entries still
    /// produces a file with the header row.
    pub fn write(&self, network: &str, timestamp: &str, table: &ResultsTable) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            AppError::report(format!(
                "failed to create output directory '{}': {}",
                self.output_dir.display(),
                e
            ))
        })?;

        let path = self.output_dir.join(format!("{}_{}.csv", network, timestamp));
        let mut content = String::from("Metric,Min,Max,Avg,Median\n");
        for (key, summary) in table.iter() {
            content.push_str(&format!(
                "{},{},{},{},{}\n",
                key.label(),
                summary.min,
                summary.max,
                summary.avg,
                summary.median
            ));
        }

        fs::write(&path, content)
            .map_err(|e| AppError::report(format!("failed to write '{}': {}", path.display(), e)))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SweepKey;
    use crate::stats::Summary;
    use tempfile::tempdir;

    fn sample_table() -> ResultsTable {
        let mut table = ResultsTable::new();
        for provider in ["node_a", "node_b"] {
            for rate in [1, 2] {
                table.insert(
                    SweepKey::new(provider, rate),
                    Summary {
                        min: 10,
                        max: 40,
                        avg: 25.0,
                        median: 25.0,
                    },
                );
            }
        }
        table
    }

    #[test]
    fn test_row_count_matches_sweep_matrix() {
        let dir = tempdir().unwrap();
        let writer = CsvWriter::new(dir.path());

        let path = writer.write("amoy", "20260826_120000", &sample_table()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        // header + 2 providers x 2 rates
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Metric,Min,Max,Avg,Median");
        assert_eq!(lines[1], "node_a_1_calls,10,40,25,25");
    }

    #[test]
    fn test_filename_carries_network_and_timestamp() {
        let dir = tempdir().unwrap();
        let writer = CsvWriter::new(dir.path());

        let path = writer.write("polygon", "20260826_120000", &sample_table()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "polygon_20260826_120000.csv"
        );
    }

    #[test]
    fn test_empty_table_is_header_only() {
        let dir = tempdir().unwrap();
        let writer = CsvWriter::new(dir.path());

        let path = writer.write("amoy", "t", &ResultsTable::new()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Metric,Min,Max,Avg,Median\n");
    }

    #[test]
    fn test_creates_missing_output_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("deep").join("output");
        let writer = CsvWriter::new(&nested);

        assert!(writer.write("amoy", "t", &ResultsTable::new()).is_ok());
        assert!(nested.is_dir());
    }
}
