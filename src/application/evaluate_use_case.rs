// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Measures a trained checkpoint on the validation split:
//
//   Step 1: Load the run config         (Layer 6 - infra)
//   Step 2: Rebuild the val split       (Layer 4 - data)
//   Step 3: Standardise w/ saved stats  (Layer 6 - infra)
//   Step 4: Rebuild model + weights     (Layer 6 - infra)
//   Step 5: Run the evaluator           (Layer 5 - ml)
//
// The validation points are NOT stored on disk. Because the
// generator and the splitter are seeded, replaying them with
// the saved config reproduces the exact same points — including
// the 20% the model never saw during training.
//
// Reference: Burn Book §4 (Inference)

use anyhow::Result;
use burn::data::dataloader::DataLoaderBuilder;

use crate::data::{
    batcher::PointBatcher,
    dataset::PointDataset,
    generator::BlobGenerator,
    splitter::split_train_val,
};
use crate::domain::report::EvalReport;
use crate::domain::traits::SampleSource;
use crate::infra::{checkpoint::CheckpointManager, stats_store::StatsStore};
use crate::ml::backend::{default_device, PrimerBackend};
use crate::ml::evaluator::evaluate;
use crate::ml::model::MlpClassifier;

// ─── EvaluateUseCase ──────────────────────────────────────────────────────────
pub struct EvaluateUseCase {
    checkpoint_dir: String,
}

impl EvaluateUseCase {
    pub fn new(checkpoint_dir: String) -> Self {
        Self { checkpoint_dir }
    }

    /// Replay the data pipeline, load the checkpoint, and score
    /// the model on the held-out validation points.
    pub fn execute(&self) -> Result<EvalReport> {
        // ── Step 1: Load the run config ───────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&self.checkpoint_dir);
        let cfg = ckpt_manager.load_config()?;

        // ── Step 2: Rebuild the validation split ──────────────────────────────
        // Same generator settings + same seed ⇒ identical points
        // and an identical shuffle inside the splitter
        let generator = BlobGenerator {
            rotation: cfg.rotation,
            ..BlobGenerator::new(cfg.num_classes, cfg.samples_per_class, cfg.seed)
        };
        let samples = generator.samples()?;
        let (_, val_samples) = split_train_val(samples, cfg.train_fraction, cfg.seed);
        tracing::info!("Rebuilt validation split: {} points", val_samples.len());

        // ── Step 3: Standardise with the SAVED stats ──────────────────────────
        // Refitting here would work for this replayed split, but
        // loading from disk is the honest pipeline: inference-time
        // inputs must go through the stats the model trained with
        let normalizer   = StatsStore::new(ckpt_manager.dir()).load()?;
        let val_samples  = normalizer.apply_all(val_samples);

        // ── Step 4: Rebuild the model and load the weights ────────────────────
        let device    = default_device();
        let model_cfg = ckpt_manager.load_model_config()?;
        let model: MlpClassifier<PrimerBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;

        // ── Step 5: Score every validation batch ──────────────────────────────
        let loader = DataLoaderBuilder::new(PointBatcher::<PrimerBackend>::new(device.clone()))
            .batch_size(cfg.batch_size)
            .build(PointDataset::new(val_samples));

        evaluate(&model, loader.as_ref())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};

    #[test]
    fn test_evaluate_replays_the_held_out_split() {
        let dir = std::env::temp_dir()
            .join(format!("burn-primer-eval-uc-{}", std::process::id()));

        let cfg = TrainConfig {
            checkpoint_dir:    dir.to_string_lossy().into_owned(),
            samples_per_class: 60,
            epochs:            4,
            ..TrainConfig::default()
        };
        TrainUseCase::new(cfg).execute().unwrap();

        let report = EvaluateUseCase::new(dir.to_string_lossy().into_owned())
            .execute()
            .unwrap();

        // 3 classes × 60 points, 80/20 split → 36 validation points
        assert_eq!(report.total(), 36);
        assert!(report.avg_loss.is_finite());
        assert!(
            report.accuracy() > 0.5,
            "trained model should beat chance on well-separated blobs, got {}",
            report.accuracy()
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_evaluate_without_training_fails_with_hint() {
        let dir = std::env::temp_dir()
            .join(format!("burn-primer-eval-missing-{}", std::process::id()));

        let err = EvaluateUseCase::new(dir.to_string_lossy().into_owned())
            .execute()
            .unwrap_err();
        assert!(format!("{err:#}").contains("train"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
