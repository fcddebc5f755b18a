// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one CSV row per epoch so a run leaves a learning
// curve behind, not just a final number.
//
// Why CSV and not the tracing output?
//   - Log lines scroll away; the file survives the run
//   - Any spreadsheet or plotting tool ingests it directly
//   - Diffing two runs' curves is a two-file diff
//
// Columns:
//   epoch,train_loss,val_loss,val_acc
//   1,1.034562,0.911204,0.641667
//   2,0.801173,0.702991,0.758333
//
// Reading the curve:
//   - Both losses falling → the model is learning
//   - val_loss rising while train_loss falls → overfitting
//   - val_acc should climb towards 1.0 as the clusters separate
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// The numbers produced by one pass over the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Epoch number, starting at 1
    pub epoch: usize,

    /// Mean cross-entropy over the training batches.
    /// A fresh random model sits near ln(num_classes).
    pub train_loss: f64,

    /// Mean cross-entropy on the held-out set.
    /// Divergence from train_loss is the overfitting signal.
    pub val_loss: f64,

    /// Fraction of held-out points labelled correctly,
    /// in [0, 1]. Chance level is 1/num_classes.
    pub val_acc: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64, val_acc: f64) -> Self {
        Self { epoch, train_loss, val_loss, val_acc }
    }

    /// Whether this epoch beats the best validation loss so far.
    /// Strictly less-than: a tie keeps the earlier checkpoint.
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

/// Writes epoch rows to `{dir}/metrics.csv`.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Start a metrics file for a new run.
    ///
    /// Each run owns its file: the header truncates whatever a
    /// previous run left in the same directory. Interleaving
    /// epochs from two runs would make the curve unreadable.
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let csv_path = dir.join("metrics.csv");

        let mut f = fs::File::create(&csv_path)?;
        writeln!(f, "epoch,train_loss,val_loss,val_acc")?;
        tracing::debug!("Metrics file started at '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let row = format!(
            "{},{:.6},{:.6},{:.6}\n",
            m.epoch, m.train_loss, m.val_loss, m.val_acc,
        );
        OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?
            .write_all(row.as_bytes())?;

        tracing::debug!(
            "Epoch {} logged: train={:.4} val={:.4} acc={:.3}",
            m.epoch, m.train_loss, m.val_loss, m.val_acc,
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

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("burn-primer-{tag}-{}", std::process::id()))
    }

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 0.9, 0.5, 0.72);
        assert!(m.is_improvement(0.6));
        assert!(!m.is_improvement(0.4));
        // a tie is not an improvement
        assert!(!m.is_improvement(0.5));
    }

    #[test]
    fn test_csv_has_header_and_one_row_per_epoch() {
        let dir    = temp_dir("metrics");
        let logger = MetricsLogger::new(&dir).unwrap();

        logger.log(&EpochMetrics::new(1, 1.0, 0.9, 0.55)).unwrap();
        logger.log(&EpochMetrics::new(2, 0.7, 0.6, 0.72)).unwrap();

        let content = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "epoch,train_loss,val_loss,val_acc");
        assert!(lines[1].starts_with("1,1.000000,0.900000,"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_new_run_clears_previous_rows() {
        let dir = temp_dir("metrics-fresh");

        let first = MetricsLogger::new(&dir).unwrap();
        first.log(&EpochMetrics::new(1, 1.0, 0.9, 0.5)).unwrap();

        // A second run in the same directory starts from a clean file
        let second  = MetricsLogger::new(&dir).unwrap();
        let content = fs::read_to_string(second.csv_path()).unwrap();
        assert_eq!(content.lines().count(), 1);

        fs::remove_dir_all(&dir).ok();
    }
}
