// ============================================================
// Layer 4 — Feature Normalizer
// ============================================================
// Standardises features to zero mean and unit variance:
//
//   x' = (x − mean) / std        (per feature, element-wise)
//
// Why normalise at all?
//   The raw blobs sit on a circle of radius ~2.5, so feature
//   values live in roughly [-3.5, 3.5]. Gradient descent
//   behaves best when inputs are centred and similarly scaled;
//   without this the first layer spends its early epochs just
//   compensating for the offset.
//
// The critical discipline: statistics are fitted on the
// TRAINING split only, then reused everywhere — validation,
// evaluation, and single-sample prediction. Fitting on the full
// dataset would leak information from the validation split into
// training. The fitted values are persisted as JSON (see
// infra::stats_store) so `predict` months later still uses the
// exact statistics training saw.
//
// Reference: Burn Book §4 (Normalisation)

use serde::{Deserialize, Serialize};

use crate::data::augment::PointTransform;
use crate::domain::sample::LabeledPoint;

/// Per-feature standardisation statistics.
/// Fitted once on the training split, applied everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Normalizer {
    /// Per-feature mean of the training split
    pub mean: Vec<f32>,

    /// Per-feature standard deviation of the training split.
    /// Never zero: constant features are floored to 1.0 so they
    /// standardise to 0 instead of dividing by zero.
    pub std: Vec<f32>,
}

impl Normalizer {
    /// Fit mean and std from a set of samples.
    /// An empty input yields an empty normalizer, which
    /// transforms everything to itself.
    pub fn fit(samples: &[LabeledPoint]) -> Self {
        if samples.is_empty() {
            return Self {
                mean: Vec::new(),
                std:  Vec::new(),
            };
        }

        let dim = samples[0].dim();
        let n   = samples.len() as f32;

        // Mean per feature
        let mut mean = vec![0.0f32; dim];
        for sample in samples {
            for (m, &x) in mean.iter_mut().zip(sample.features.iter()) {
                *m += x;
            }
        }
        for m in mean.iter_mut() {
            *m /= n;
        }

        // Population standard deviation per feature
        let mut var = vec![0.0f32; dim];
        for sample in samples {
            for ((v, &m), &x) in var.iter_mut().zip(mean.iter()).zip(sample.features.iter()) {
                *v += (x - m) * (x - m);
            }
        }
        let std = var
            .into_iter()
            .map(|v| {
                let s = (v / n).sqrt();
                if s < 1e-6 {
                    1.0
                } else {
                    s
                }
            })
            .collect();

        Self { mean, std }
    }

    /// Standardise a raw feature vector.
    /// Used directly by `predict` for command-line input.
    pub fn transform_features(&self, features: &[f32]) -> Vec<f32> {
        if self.mean.is_empty() {
            return features.to_vec();
        }
        features
            .iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect()
    }

    /// Standardise one sample, keeping its label.
    pub fn transform(&self, mut sample: LabeledPoint) -> LabeledPoint {
        sample.features = self.transform_features(&sample.features);
        sample
    }

    /// Standardise a whole split in place.
    pub fn apply_all(&self, samples: Vec<LabeledPoint>) -> Vec<LabeledPoint> {
        samples.into_iter().map(|s| self.transform(s)).collect()
    }
}

// The Normalizer doubles as the final stage of an augmentation
// pipeline. It is deterministic, so the RNG goes unused.
impl PointTransform for Normalizer {
    fn apply(&self, sample: LabeledPoint, _rng: &mut rand::rngs::StdRng) -> LabeledPoint {
        self.transform(sample)
    }
}
