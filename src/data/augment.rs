// ============================================================
// Layer 4 — Data Augmentation Transforms
// ============================================================
// Compose-style, per-sample transforms applied to the TRAINING
// split only. Each epoch sees a slightly different version of
// every point, which acts as a regulariser: the model cannot
// memorise exact coordinates because the coordinates keep
// wobbling.
//
// The transforms here are chosen to be label-preserving for
// this dataset. Classes occupy angular wedges around the
// origin, so:
//   - small gaussian jitter  → stays inside the wedge
//   - small random rotation  → stays inside the wedge
//   - radial scaling         → never leaves the wedge at all
//     (scaling from the origin changes distance, not angle)
//
// A transform that flipped one axis would NOT be safe here —
// it maps one class's region onto another's and silently
// corrupts the labels.
//
// The pipeline ends with the fitted Normalizer (see
// normalizer.rs), which also implements PointTransform, so
// "augment then standardise" is a single Compose. Compose plugs
// into Burn's DataLoader through the Mapper trait: the loader
// calls map() lazily per sample, per epoch.
//
// RNG note: apply() takes &mut StdRng so tests can inject a
// seeded generator; the Mapper hook draws a fresh one per call.
//
// Reference: Burn Book §4 (Dataset transforms)
//            rand crate documentation

use burn::data::dataset::transform::Mapper;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::generator::gaussian;
use crate::domain::sample::LabeledPoint;

// ─── PointTransform ───────────────────────────────────────────────────────────
/// One augmentation step. Implementations must be cheap:
/// they run on every sample of every batch of every epoch.
pub trait PointTransform: Send + Sync {
    /// Transform one sample. The label must come back unchanged
    /// unless the transform exists specifically to relabel.
    fn apply(&self, sample: LabeledPoint, rng: &mut StdRng) -> LabeledPoint;
}

// ─── RandomJitter ─────────────────────────────────────────────────────────────
/// Adds independent gaussian noise to every feature.
/// std = 0.0 makes this the identity.
#[derive(Debug, Clone)]
pub struct RandomJitter {
    pub std: f32,
}

impl PointTransform for RandomJitter {
    fn apply(&self, mut sample: LabeledPoint, rng: &mut StdRng) -> LabeledPoint {
        for value in sample.features.iter_mut() {
            *value += self.std * gaussian(rng);
        }
        sample
    }
}

// ─── RandomRotation ───────────────────────────────────────────────────────────
/// Rotates the first two features around the origin by a
/// uniform angle in [-max_angle, +max_angle] radians.
/// Features beyond the first two are left untouched.
#[derive(Debug, Clone)]
pub struct RandomRotation {
    pub max_angle: f32,
}

impl PointTransform for RandomRotation {
    fn apply(&self, mut sample: LabeledPoint, rng: &mut StdRng) -> LabeledPoint {
        if sample.features.len() < 2 {
            return sample;
        }

        let theta = rng.gen_range(-self.max_angle..=self.max_angle);
        let (sin, cos) = theta.sin_cos();

        // Standard 2-D rotation matrix:
        //   x' = x cos θ − y sin θ
        //   y' = x sin θ + y cos θ
        let x = sample.features[0];
        let y = sample.features[1];
        sample.features[0] = x * cos - y * sin;
        sample.features[1] = x * sin + y * cos;
        sample
    }
}

// ─── RandomScale ──────────────────────────────────────────────────────────────
/// Multiplies every feature by one uniform factor in [lo, hi].
/// Scaling from the origin preserves the angle of a point, so
/// for wedge-shaped class regions it can never change the label.
#[derive(Debug, Clone)]
pub struct RandomScale {
    lo: f32,
    hi: f32,
}

impl RandomScale {
    /// Panics if the range is inverted — that is a programming
    /// error, not a runtime condition to recover from.
    pub fn new(lo: f32, hi: f32) -> Self {
        assert!(lo <= hi, "scale range is inverted: lo={lo} > hi={hi}");
        Self { lo, hi }
    }
}

impl PointTransform for RandomScale {
    fn apply(&self, mut sample: LabeledPoint, rng: &mut StdRng) -> LabeledPoint {
        let factor = rng.gen_range(self.lo..=self.hi);
        for value in sample.features.iter_mut() {
            *value *= factor;
        }
        sample
    }
}

// ─── Compose ──────────────────────────────────────────────────────────────────
/// Runs a list of transforms in order, feeding each one's
/// output into the next. The order matters: augmentation steps
/// first, standardisation last.
pub struct Compose {
    transforms: Vec<Box<dyn PointTransform>>,
}

impl Compose {
    pub fn new(transforms: Vec<Box<dyn PointTransform>>) -> Self {
        Self { transforms }
    }

    /// The default training pipeline: jitter, rotate, scale.
    /// Kept deliberately mild — augmentation should perturb,
    /// not destroy.
    pub fn standard(jitter_std: f32) -> Self {
        Self::new(vec![
            Box::new(RandomJitter { std: jitter_std }),
            Box::new(RandomRotation { max_angle: 0.2 }),
            Box::new(RandomScale::new(0.9, 1.1)),
        ])
    }

    pub fn apply(&self, sample: LabeledPoint, rng: &mut StdRng) -> LabeledPoint {
        self.transforms
            .iter()
            .fold(sample, |s, t| t.apply(s, rng))
    }

    /// Append one more step to the pipeline (e.g. the fitted
    /// Normalizer as the final stage).
    pub fn then(mut self, transform: Box<dyn PointTransform>) -> Self {
        self.transforms.push(transform);
        self
    }
}

impl PointTransform for Compose {
    fn apply(&self, sample: LabeledPoint, rng: &mut StdRng) -> LabeledPoint {
        Compose::apply(self, sample, rng)
    }
}

// ─── Burn Mapper Hook ─────────────────────────────────────────────────────────
// MapperDataset::new(dataset, compose) wraps a dataset so every
// get() passes through the pipeline. A fresh entropy-seeded RNG
// per call keeps the Mapper &self (the loader shares it across
// worker threads).
impl Mapper<LabeledPoint, LabeledPoint> for Compose {
    fn map(&self, item: &LabeledPoint) -> LabeledPoint {
        let mut rng = StdRng::from_entropy();
        self.apply(item.clone(), &mut rng)
    }
}
