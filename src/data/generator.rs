// ============================================================
// Layer 4 — Synthetic Blob Generator
// ============================================================
// Produces the labelled dataset the whole walkthrough trains on:
// one gaussian cluster ("blob") per class, with cluster centres
// spaced evenly on a circle around the origin.
//
// Why synthetic data?
//   In production you would load a labelled dataset from disk.
//   Generating points instead keeps the crate self-contained
//   (no downloads), lets every run be reproduced from a seed,
//   and makes the learning problem easy to visualise: the
//   network just has to carve the plane into wedges.
//
// Why seeded?
//   The `evaluate` command re-creates the exact validation
//   split from the saved training config. That only works if
//   generation is a pure function of the configuration.
//
// The `rotation` field turns the centres around the origin.
// Fine-tuning uses it to build a second task whose clusters sit
// in genuinely different positions from the first.
//
// Gaussian noise comes from the Box-Muller transform over two
// uniform draws — this avoids pulling in a distributions crate
// for a single formula.
//
// Reference: rand crate documentation
//            Box & Muller (1958)

use std::f32::consts::PI;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::sample::LabeledPoint;
use crate::domain::traits::SampleSource;

// ─── BlobGenerator ────────────────────────────────────────────────────────────
/// Seeded generator of 2-D gaussian clusters, one per class.
#[derive(Debug, Clone)]
pub struct BlobGenerator {
    /// Number of distinct classes (and clusters)
    pub num_classes: usize,

    /// Samples generated for each class
    pub samples_per_class: usize,

    /// Distance of every cluster centre from the origin
    pub radius: f32,

    /// Standard deviation of the gaussian noise around centres
    pub noise_std: f32,

    /// Angular offset (radians) applied to all centres —
    /// used to create a rotated second task for fine-tuning
    pub rotation: f32,

    /// RNG seed; equal configs produce identical datasets
    pub seed: u64,
}

impl Default for BlobGenerator {
    fn default() -> Self {
        Self {
            num_classes:       3,
            samples_per_class: 200,
            radius:            2.5,
            noise_std:         0.45,
            rotation:          0.0,
            seed:              42,
        }
    }
}

impl BlobGenerator {
    /// Create a generator with the given class count, class size
    /// and seed, keeping the geometry defaults.
    /// Use struct update syntax to override radius/noise/rotation:
    ///   BlobGenerator { rotation: 0.8, ..BlobGenerator::new(4, 100, 7) }
    pub fn new(num_classes: usize, samples_per_class: usize, seed: u64) -> Self {
        Self {
            num_classes,
            samples_per_class,
            seed,
            ..Default::default()
        }
    }

    /// The centre of one class's cluster.
    /// Centres sit on a circle, evenly spaced:
    ///   angle_k = rotation + k * 2π / num_classes
    pub fn centre(&self, class: usize) -> (f32, f32) {
        let angle = self.rotation + (class as f32) * 2.0 * PI / (self.num_classes as f32);
        (self.radius * angle.cos(), self.radius * angle.sin())
    }
}

impl SampleSource for BlobGenerator {
    /// Generate every sample, class by class.
    /// Samples come out UNSHUFFLED — interleaving classes is the
    /// splitter's job, and keeping generation order stable makes
    /// the output easier to reason about in tests.
    fn samples(&self) -> Result<Vec<LabeledPoint>> {
        let mut rng     = StdRng::seed_from_u64(self.seed);
        let mut samples = Vec::with_capacity(self.num_classes * self.samples_per_class);

        for class in 0..self.num_classes {
            let (cx, cy) = self.centre(class);

            for _ in 0..self.samples_per_class {
                let x = cx + self.noise_std * gaussian(&mut rng);
                let y = cy + self.noise_std * gaussian(&mut rng);
                samples.push(LabeledPoint::new(vec![x, y], class));
            }
        }

        tracing::debug!(
            "Generated {} samples ({} classes × {} each, seed {})",
            samples.len(),
            self.num_classes,
            self.samples_per_class,
            self.seed,
        );

        Ok(samples)
    }
}

// ─── Gaussian Sampling ────────────────────────────────────────────────────────
/// One draw from the standard normal distribution using the
/// Box-Muller transform:
///   z = sqrt(-2 ln u1) * cos(2π u2)
/// u1 is kept away from 0 because ln(0) is -inf.
/// Shared with the augmentation transforms (RandomJitter).
pub(crate) fn gaussian(rng: &mut StdRng) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_count_and_balance() {
        let gen     = BlobGenerator::new(3, 50, 42);
        let samples = gen.samples().unwrap();
        assert_eq!(samples.len(), 150);

        for class in 0..3 {
            let count = samples.iter().filter(|s| s.label == class).count();
            assert_eq!(count, 50);
        }
    }

    #[test]
    fn test_features_are_two_dimensional() {
        let samples = BlobGenerator::new(2, 5, 1).samples().unwrap();
        assert!(samples.iter().all(|s| s.dim() == 2));
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let a = BlobGenerator::new(3, 20, 9).samples().unwrap();
        let b = BlobGenerator::new(3, 20, 9).samples().unwrap();
        for (s1, s2) in a.iter().zip(b.iter()) {
            assert_eq!(s1.features, s2.features);
            assert_eq!(s1.label, s2.label);
        }
    }

    #[test]
    fn test_cluster_mean_near_centre() {
        // With 400 draws at σ=0.45 the sample mean should sit
        // well within 0.15 of the true centre
        let gen     = BlobGenerator::new(3, 400, 42);
        let samples = gen.samples().unwrap();

        let class0: Vec<_> = samples.iter().filter(|s| s.label == 0).collect();
        let mean_x: f32    = class0.iter().map(|s| s.features[0]).sum::<f32>() / 400.0;
        let mean_y: f32    = class0.iter().map(|s| s.features[1]).sum::<f32>() / 400.0;

        let (cx, cy) = gen.centre(0);
        assert!((mean_x - cx).abs() < 0.15);
        assert!((mean_y - cy).abs() < 0.15);
    }

    #[test]
    fn test_rotation_moves_centres() {
        let base    = BlobGenerator::new(3, 1, 42);
        let rotated = BlobGenerator {
            rotation: PI / 3.0,
            ..base.clone()
        };
        let (bx, by) = base.centre(0);
        let (rx, ry) = rotated.centre(0);
        assert!((bx - rx).abs() + (by - ry).abs() > 0.5);
    }
}
