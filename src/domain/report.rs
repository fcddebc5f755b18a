// ============================================================
// Layer 3 — Prediction and Evaluation Report Types
// ============================================================
// Represents model outputs in domain terms.
// The ML layer produces tensors; before anything crosses back
// into the application layer it is converted into these plain
// structs. That keeps tensor types contained in Layer 5.
//
// Two concepts live here:
//   - Prediction: the model's verdict on ONE sample
//     (a class index plus the full probability distribution)
//   - EvalReport: aggregate quality over a whole split
//     (average loss, accuracy, and a confusion matrix)
//
// A confusion matrix counts outcomes per (actual, predicted)
// pair. The diagonal holds the correct predictions; everything
// off-diagonal is a specific kind of mistake.
//
// Example for 3 classes:
//            predicted 0   1   2
//   actual 0        [ 14,  1,  0 ]
//   actual 1        [  2, 12,  1 ]
//   actual 2        [  0,  0, 15 ]
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// The model's output for a single sample, after softmax.
///
/// `label` is always the argmax of `probabilities`, and
/// `confidence` the probability at that index — the
/// constructor enforces this so the three fields can
/// never disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// The winning class index
    pub label: usize,

    /// Probability assigned to the winning class (0.0..=1.0)
    pub confidence: f32,

    /// The full distribution over all classes; sums to ~1.0
    pub probabilities: Vec<f32>,
}

impl Prediction {
    /// Build a Prediction from a softmax distribution.
    /// The winning class is derived here rather than passed in,
    /// so callers cannot construct an inconsistent value.
    pub fn from_probabilities(probabilities: Vec<f32>) -> Self {
        let (label, confidence) = probabilities
            .iter()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |(best_i, best_p), (i, &p)| {
                if p > best_p {
                    (i, p)
                } else {
                    (best_i, best_p)
                }
            });
        Self {
            label,
            confidence,
            probabilities,
        }
    }
}

/// Aggregate evaluation results over one data split.
///
/// The confusion matrix is indexed [actual][predicted].
/// Accuracy and per-class accuracy are derived from it on
/// demand instead of being stored, so they can never drift
/// out of sync with the counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Mean loss over all evaluated batches
    pub avg_loss: f32,

    /// Outcome counts, confusion[actual][predicted]
    pub confusion: Vec<Vec<usize>>,
}

impl EvalReport {
    /// Create an empty report for the given number of classes.
    pub fn new(num_classes: usize) -> Self {
        Self {
            avg_loss:  0.0,
            confusion: vec![vec![0; num_classes]; num_classes],
        }
    }

    /// Record one (actual, predicted) outcome.
    pub fn record(&mut self, actual: usize, predicted: usize) {
        self.confusion[actual][predicted] += 1;
    }

    /// Number of classes this report covers.
    pub fn num_classes(&self) -> usize {
        self.confusion.len()
    }

    /// Total number of samples recorded so far.
    pub fn total(&self) -> usize {
        self.confusion.iter().flatten().sum()
    }

    /// Number of correctly classified samples (the diagonal).
    pub fn correct(&self) -> usize {
        self.confusion
            .iter()
            .enumerate()
            .map(|(i, row)| row[i])
            .sum()
    }

    /// Overall accuracy in 0.0..=1.0; an empty report scores 0.0
    /// rather than dividing by zero.
    pub fn accuracy(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.correct() as f32 / total as f32
    }

    /// Accuracy restricted to one actual class (recall for that
    /// class). A class with no samples scores 0.0.
    pub fn class_accuracy(&self, class: usize) -> f32 {
        let row_total: usize = self.confusion[class].iter().sum();
        if row_total == 0 {
            return 0.0;
        }
        self.confusion[class][class] as f32 / row_total as f32
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_picks_argmax() {
        let pred = Prediction::from_probabilities(vec![0.1, 0.7, 0.2]);
        assert_eq!(pred.label, 1);
        assert!((pred.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_prediction_first_wins_on_tie() {
        let pred = Prediction::from_probabilities(vec![0.5, 0.5]);
        assert_eq!(pred.label, 0);
    }

    #[test]
    fn test_empty_report_has_zero_accuracy() {
        let report = EvalReport::new(3);
        assert_eq!(report.total(), 0);
        assert_eq!(report.accuracy(), 0.0);
    }

    #[test]
    fn test_accuracy_counts_the_diagonal() {
        let mut report = EvalReport::new(2);
        report.record(0, 0);
        report.record(0, 0);
        report.record(1, 1);
        report.record(1, 0); // one mistake
        assert_eq!(report.total(), 4);
        assert_eq!(report.correct(), 3);
        assert!((report.accuracy() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_class_accuracy_uses_row_totals() {
        let mut report = EvalReport::new(2);
        report.record(0, 0);
        report.record(0, 1);
        report.record(1, 1);
        assert!((report.class_accuracy(0) - 0.5).abs() < 1e-6);
        assert!((report.class_accuracy(1) - 1.0).abs() < 1e-6);
    }
}
