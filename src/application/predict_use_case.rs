// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Classifies one raw feature vector with a trained checkpoint:
//
//   Step 1: Load normalisation stats    (Layer 6 - infra)
//   Step 2: Restore the predictor       (Layer 5 - ml)
//   Step 3: Classify the point          (Layer 5 - ml)
//
// The caller passes features in the ORIGINAL units — the
// predictor applies the saved standardisation itself, so the
// command line user never has to think about mean/std.
//
// Reference: Burn Book §4 (Inference)

use anyhow::Result;

use crate::domain::report::Prediction;
use crate::domain::traits::Classifier;
use crate::infra::{checkpoint::CheckpointManager, stats_store::StatsStore};
use crate::ml::backend::{default_device, PrimerBackend};
use crate::ml::predictor::Predictor;

// ─── PredictUseCase ───────────────────────────────────────────────────────────
pub struct PredictUseCase {
    checkpoint_dir: String,
    features:       Vec<f32>,
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: String, features: Vec<f32>) -> Self {
        Self { checkpoint_dir, features }
    }

    /// Restore the trained model and classify the stored features.
    pub fn execute(&self) -> Result<Prediction> {
        // ── Step 1: Load the stats saved at training time ─────────────────────
        let ckpt_manager = CheckpointManager::new(&self.checkpoint_dir);
        let normalizer   = StatsStore::new(ckpt_manager.dir()).load()?;

        // ── Step 2: Restore model + stats into a Predictor ────────────────────
        let device    = default_device();
        let predictor = Predictor::<PrimerBackend>::from_checkpoint(
            &ckpt_manager, normalizer, device,
        )?;

        // ── Step 3: Classify ──────────────────────────────────────────────────
        predictor.classify(&self.features)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};

    #[test]
    fn test_cluster_centre_gets_its_own_label() {
        let dir = std::env::temp_dir()
            .join(format!("burn-primer-predict-uc-{}", std::process::id()));

        let cfg = TrainConfig {
            checkpoint_dir:    dir.to_string_lossy().into_owned(),
            samples_per_class: 60,
            ..TrainConfig::default()
        };
        TrainUseCase::new(cfg).execute().unwrap();

        // Class 0's cluster centre sits at (radius, 0) — the point
        // a trained model should be most certain about
        let prediction = PredictUseCase::new(
            dir.to_string_lossy().into_owned(),
            vec![2.5, 0.0],
        )
        .execute()
        .unwrap();

        assert_eq!(prediction.label, 0);
        assert!(
            prediction.confidence > 0.5,
            "centre of a cluster should be classified confidently, got {}",
            prediction.confidence
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_predict_without_training_fails_with_hint() {
        let dir = std::env::temp_dir()
            .join(format!("burn-primer-predict-missing-{}", std::process::id()));

        let err = PredictUseCase::new(dir.to_string_lossy().into_owned(), vec![0.0, 0.0])
            .execute()
            .unwrap_err();
        assert!(format!("{err:#}").contains("train"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
