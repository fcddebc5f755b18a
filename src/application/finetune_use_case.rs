// ============================================================
// Layer 2 — FinetuneUseCase
// ============================================================
// Transfer learning: adapt a pretrained checkpoint to a NEW
// classification task instead of training from scratch.
//
//   Step 1: Load pretrained model       (Layer 6 - infra)
//   Step 2: Describe the target task    (Layer 2)
//   Step 3: Generate + prepare data     (Layer 4 - data)
//   Step 4: Swap head / freeze backbone (Layer 5 - ml)
//   Step 5: Save target configs         (Layer 6 - infra)
//   Step 6: Run the shared train loop   (Layer 5 - ml)
//
// The target task rotates the cluster layout half a class
// sector and may change the class count. The pretrained hidden
// layer has already learned to carve up this kind of plane, so
// a fresh head on top converges in very few epochs — that is
// the entire payoff of transfer learning.
//
// Reference: Burn Book §5 (Training)

use anyhow::{ensure, Result};
use burn::prelude::*;

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    dataset::PointDataset,
    generator::BlobGenerator,
    normalizer::Normalizer,
    splitter::split_train_val,
};
use crate::domain::traits::SampleSource;
use crate::infra::{checkpoint::CheckpointManager, stats_store::StatsStore};
use crate::ml::backend::{default_device, PrimerAutodiffBackend};
use crate::ml::model::{MlpClassifier, MlpClassifierConfig};
use crate::ml::trainer::train_model;
use crate::ml::transfer;

// ─── Fine-tuning Configuration ────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct FinetuneConfig {
    /// Checkpoint directory of the pretrained model
    pub source_dir:      String,
    /// Where the fine-tuned model and its artefacts land
    pub target_dir:      String,
    /// Class count of the NEW task (may differ from the source)
    pub num_classes:     usize,
    pub epochs:          usize,
    pub lr:              f64,
    /// Train only the new head, keeping the hidden layer fixed
    pub freeze_backbone: bool,
}

// ─── FinetuneUseCase ──────────────────────────────────────────────────────────
pub struct FinetuneUseCase {
    config: FinetuneConfig,
}

impl FinetuneUseCase {
    pub fn new(config: FinetuneConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;
        ensure!(cfg.num_classes >= 2, "Need at least 2 classes, got {}", cfg.num_classes);

        // ── Step 1: Load the pretrained model ─────────────────────────────────
        let source_ckpt = CheckpointManager::new(&cfg.source_dir);
        let source_cfg  = source_ckpt.load_config()?;
        let model_cfg   = source_ckpt.load_model_config()?;

        let device = default_device();
        let pretrained: MlpClassifier<PrimerAutodiffBackend> = model_cfg.init(&device);
        let pretrained = source_ckpt.load_model(pretrained, &device)?;
        tracing::info!(
            "Loaded pretrained model from '{}' ({} → {} → {})",
            cfg.source_dir, model_cfg.num_features, model_cfg.hidden_size, model_cfg.num_classes,
        );

        // ── Step 2: Describe the target task ──────────────────────────────────
        // Rotate the cluster layout half a class sector, so the new
        // clusters sit where the old decision boundaries used to run.
        // Everything not overridden here is inherited from the source.
        let rotation = source_cfg.rotation
            + std::f32::consts::PI / cfg.num_classes as f32;
        let target_cfg = TrainConfig {
            checkpoint_dir: cfg.target_dir.clone(),
            num_classes:    cfg.num_classes,
            epochs:         cfg.epochs,
            lr:             cfg.lr,
            rotation,
            seed:           source_cfg.seed + 1,
            augment:        false,
            ..source_cfg.clone()
        };

        // ── Step 3: Generate + prepare the target data ────────────────────────
        let generator = BlobGenerator {
            rotation: target_cfg.rotation,
            ..BlobGenerator::new(
                target_cfg.num_classes,
                target_cfg.samples_per_class,
                target_cfg.seed,
            )
        };
        let samples = generator.samples()?;
        let (train_samples, val_samples) =
            split_train_val(samples, target_cfg.train_fraction, target_cfg.seed);

        // The target task gets its OWN stats — its clusters sit at
        // different angles, so the source stats don't describe it
        let normalizer    = Normalizer::fit(&train_samples);
        let train_dataset = PointDataset::new(normalizer.apply_all(train_samples));
        let val_dataset   = PointDataset::new(normalizer.apply_all(val_samples));

        let target_ckpt = CheckpointManager::new(&cfg.target_dir);
        StatsStore::new(target_ckpt.dir()).save(&normalizer)?;

        // ── Step 4: Swap the head, optionally freeze the backbone ─────────────
        // Seed before the head init so the fresh weights are
        // reproducible, exactly as run_training does
        PrimerAutodiffBackend::seed(target_cfg.seed);
        let mut model = transfer::with_new_head(pretrained, cfg.num_classes, &device);
        if cfg.freeze_backbone {
            model = transfer::freeze_backbone(model);
            tracing::info!("Backbone frozen — only the new head will train");
        }

        // ── Step 5: Save the target run's configs ─────────────────────────────
        target_ckpt.save_config(&target_cfg)?;
        let target_model_cfg =
            MlpClassifierConfig::new(model_cfg.num_features, cfg.num_classes)
                .with_hidden_size(model_cfg.hidden_size);
        target_ckpt.save_model_config(&target_model_cfg)?;

        // ── Step 6: Run the shared training loop ──────────────────────────────
        train_model(
            &target_cfg, model, train_dataset, val_dataset, None, &target_ckpt, device,
        )?;

        Ok(())
    }
}
