// ============================================================
// Layer 6: Metrics Logger
// ============================================================
// Appends one CSV row per training epoch with the evaluation
// metrics on the held-out split.
//
// Output file: checkpoints/metrics.csv
//
//   epoch,perplexity,accuracy,train_rows,test_rows
//   1,1.842113,0.731250,90000,10000
//   2,1.610452,0.774100,90000,10000
//
// Perplexity should fall and accuracy rise from epoch to epoch.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// exp(summed masked loss / non-padding tokens) on the test split
    pub perplexity: f64,

    /// Token-weighted masked accuracy on the test split, in [0, 1]
    pub accuracy: f64,

    pub train_rows: usize,
    pub test_rows:  usize,
}

impl EpochMetrics {
    /// True if this epoch beat the best perplexity seen so far.
    pub fn is_improvement(&self, best_perplexity: f64) -> bool {
        self.perplexity < best_perplexity
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the CSV header if the file doesn't exist yet, so
    /// repeated runs append to one log.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,perplexity,accuracy,train_rows,test_rows")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{},{}",
            m.epoch, m.perplexity, m.accuracy, m.train_rows, m.test_rows,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: perplexity={:.4}, accuracy={:.4}",
            m.epoch,
            m.perplexity,
            m.accuracy,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(epoch: usize, perplexity: f64) -> EpochMetrics {
        EpochMetrics { epoch, perplexity, accuracy: 0.5, train_rows: 9, test_rows: 1 }
    }

    #[test]
    fn test_is_improvement() {
        let m = metrics(2, 2.3);
        assert!(m.is_improvement(3.0));
        assert!(!m.is_improvement(2.0));
    }

    #[test]
    fn test_appends_rows_under_one_header() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&metrics(1, 4.0)).unwrap();

        // A second logger on the same directory must not rewrite the header.
        let again = MetricsLogger::new(dir.path()).unwrap();
        again.log(&metrics(2, 3.0)).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "epoch,perplexity,accuracy,train_rows,test_rows");
        assert_eq!(lines[1], "1,4.000000,0.500000,9,1");
        assert_eq!(lines[2], "2,3.000000,0.500000,9,1");
    }
}
