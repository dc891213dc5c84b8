//! Latency sample summarization
//!
//! Reduces a run's recorded samples to min/max/average/median. Incomplete
//! samples never reach this module; the driver only reports latencies for
//! calls that actually completed, and the empty case is a guarded error
//! rather than a NaN.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Summary statistics for one (provider, call-rate) sweep, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min: u64,
    pub max: u64,
    pub avg: f64,
    pub median: f64,
}

impl Summary {
    /// Reduce a sample array to its summary. Errors on an empty array.
    pub fn from_samples(samples: &[u64]) -> Result<Self> {
        if samples.is_empty() {
            return Err(AppError::statistics("cannot summarize an empty sample set"));
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let len = sorted.len();
        let sum: u64 = sorted.iter().sum();

        let median = if len % 2 == 1 {
            sorted[len / 2] as f64
        } else {
            (sorted[len / 2 - 1] + sorted[len / 2]) as f64 / 2.0
        };

        Ok(Self {
            min: sorted[0],
            max: sorted[len - 1],
            avg: sum as f64 / len as f64,
            median,
        })
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "min {} ms | max {} ms | avg {} ms | median {} ms",
            self.min, self.max, self.avg, self.median
        )
    }
}
