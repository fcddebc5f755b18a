// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams of the system. Upper layers talk to these traits;
// the concrete types behind them live in the data, ml, and infra
// layers and can be swapped without touching callers.
//
// Concretely:
//   - BlobGenerator is the SampleSource today; a CSV reader
//     could replace it and the application layer would not
//     notice.
//   - Predictor is the Classifier; a nearest-centroid baseline
//     could stand in for it in tests.
//
// This is dependency inversion done with plain traits, no
// framework required.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use std::path::Path;

use crate::domain::report::Prediction;
use crate::domain::sample::LabeledPoint;
use anyhow::Result;

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Produces the labelled points a run trains on.
///
/// The one implementation today is the synthetic BlobGenerator;
/// anything that can yield a `Vec<LabeledPoint>` (a CSV reader,
/// a database cursor) slots in the same way.
pub trait SampleSource {
    fn samples(&self) -> Result<Vec<LabeledPoint>>;
}

// ─── Classifier ───────────────────────────────────────────────────────────────
/// Maps a raw feature vector to a class with probabilities.
///
/// Raw means un-normalised: implementations own whatever
/// standardisation their model expects.
pub trait Classifier {
    fn classify(&self, features: &[f32]) -> Result<Prediction>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// State that can round-trip through a file on disk.
///
/// The Normalizer implements this with plain JSON (see
/// infra::stats_store). Model weights deliberately do NOT: they
/// go through Burn's typed recorder pipeline instead.
pub trait Persistable: Sized {
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a previously saved instance from `path`.
    fn load(path: &Path) -> Result<Self>;
}
