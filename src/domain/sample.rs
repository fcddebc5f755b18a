// ============================================================
// Layer 3 — LabeledPoint Domain Type
// ============================================================
// One supervised example: a feature vector and the class it
// belongs to. Everything the pipeline passes around — generator
// output, splitter input, augmentation input, batcher input —
// is a Vec of these.
//
// Why usize for the label and not an enum?
//   The class count is a runtime knob (--num-classes), so the
//   type cannot enumerate the variants. The generator guarantees
//   labels in 0..num_classes; the batcher casts to an int tensor
//   and cross-entropy indexes with it.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// One labelled sample from the synthetic point dataset.
/// Backend-agnostic — by the time a LabeledPoint exists, it is
/// plain numbers. Turning it into a tensor on a device is the
/// batcher's job, not this struct's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledPoint {
    /// The raw feature values (2-D coordinates by default,
    /// but nothing in the pipeline assumes exactly two)
    pub features: Vec<f32>,

    /// The class index this point belongs to,
    /// in the range 0..num_classes
    pub label: usize,
}

impl LabeledPoint {
    /// Create a new LabeledPoint from a feature vector and class index.
    pub fn new(features: Vec<f32>, label: usize) -> Self {
        Self { features, label }
    }

    /// Number of features in this sample.
    /// Every sample in a dataset must agree on this,
    /// otherwise batching would produce ragged tensors.
    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stores_fields() {
        let point = LabeledPoint::new(vec![1.5, -0.5], 2);
        assert_eq!(point.features, vec![1.5, -0.5]);
        assert_eq!(point.label, 2);
    }

    #[test]
    fn test_dim_matches_feature_count() {
        let point = LabeledPoint::new(vec![0.0; 4], 0);
        assert_eq!(point.dim(), 4);
    }
}
