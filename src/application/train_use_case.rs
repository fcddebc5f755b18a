// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// The train command from start to finish:
//
//   Step 1: Generate labelled points   (Layer 4 - data)
//   Step 2: Split train/validation     (Layer 4 - data)
//   Step 3: Standardise features       (Layer 4 - data)
//   Step 4: Persist the stats          (Layer 6 - infra)
//   Step 5: Build augmentation chain   (Layer 4 - data)
//   Step 6: Build Burn datasets        (Layer 4 - data)
//   Step 7: Save run config            (Layer 6 - infra)
//   Step 8: Run training loop          (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{
    augment::Compose,
    dataset::PointDataset,
    generator::BlobGenerator,
    normalizer::Normalizer,
    splitter::split_train_val,
};
use crate::domain::traits::SampleSource;
use crate::infra::{checkpoint::CheckpointManager, stats_store::StatsStore};
use crate::ml::backend::{default_device, PrimerAutodiffBackend};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of one run, in one serde struct. What gets written
// to train_config.json is exactly this — evaluate, predict and
// finetune all deserialise it to reconstruct the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub checkpoint_dir:    String,
    pub num_classes:       usize,
    pub samples_per_class: usize,
    pub hidden_size:       usize,
    pub batch_size:        usize,
    pub epochs:            usize,
    pub lr:                f64,
    pub momentum:          f64,
    pub seed:              u64,
    pub train_fraction:    f64,
    pub augment:           bool,
    pub jitter_std:        f32,
    /// Angular offset of the cluster centres (radians).
    /// Fine-tuning uses a rotated layout as its "new task".
    pub rotation:          f32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir:    "checkpoints".to_string(),
            num_classes:       3,
            samples_per_class: 200,
            hidden_size:       16,
            batch_size:        16,
            epochs:            5,
            lr:                0.05,
            momentum:          0.9,
            seed:              42,
            train_fraction:    0.8,
            augment:           false,
            jitter_std:        0.1,
            rotation:          0.0,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Holds the knobs; execute() does the walking.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Walk steps 1 through 8 and leave a complete checkpoint
    /// directory behind.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Generate the labelled point cloud ─────────────────────────
        // BlobGenerator plays the role a dataset download would in a
        // real project: a deterministic source of labelled samples
        tracing::info!(
            "Generating {} classes × {} points (seed {})",
            cfg.num_classes, cfg.samples_per_class, cfg.seed,
        );
        let generator = BlobGenerator {
            rotation: cfg.rotation,
            ..BlobGenerator::new(cfg.num_classes, cfg.samples_per_class, cfg.seed)
        };
        let samples = generator.samples()?;
        tracing::info!("Generated {} labelled points", samples.len());

        // ── Step 2: Train / validation split ──────────────────────────────────
        // The held-out fraction is what evaluate will score later
        let (train_samples, val_samples) =
            split_train_val(samples, cfg.train_fraction, cfg.seed);
        tracing::info!(
            "{} training / {} validation points",
            train_samples.len(),
            val_samples.len()
        );

        // ── Step 3: Fit the normaliser ────────────────────────────────────────
        // Fitted on the TRAINING split only. Fitting on everything
        // would leak validation statistics into training.
        let normalizer  = Normalizer::fit(&train_samples);
        let val_samples = normalizer.apply_all(val_samples);

        // ── Step 4: Persist the stats next to the weights ─────────────────────
        // predict must standardise incoming points with these exact
        // mean/std values
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        StatsStore::new(ckpt_manager.dir()).save(&normalizer)?;

        // ── Step 5: Standardise, or augment-then-standardise ──────────────────
        // Augmentation runs on raw coordinates, so the training
        // split stays raw here and the normaliser becomes the last
        // stage of the per-sample pipeline. Without augmentation the
        // split is standardised once, right now.
        let (train_samples, augment) = if cfg.augment {
            tracing::info!(
                "Augmentation enabled: jitter σ={}, rotation, scale",
                cfg.jitter_std
            );
            let pipeline =
                Compose::standard(cfg.jitter_std).then(Box::new(normalizer.clone()));
            (train_samples, Some(pipeline))
        } else {
            (normalizer.apply_all(train_samples), None)
        };

        // ── Step 6: Build Burn datasets ───────────────────────────────────────
        // PointDataset implements Burn's Dataset trait so the
        // DataLoader can call .get(index) and .len() on it
        let train_dataset = PointDataset::new(train_samples);
        let val_dataset   = PointDataset::new(val_samples);

        // ── Step 7: Save config for later commands ────────────────────────────
        // evaluate rebuilds the same split from this file; predict
        // and finetune read the architecture settings from it
        ckpt_manager.save_config(cfg)?;

        // ── Step 8: Run training loop (Layer 5) ───────────────────────────────
        let device = default_device();
        run_training::<PrimerAutodiffBackend>(
            cfg, train_dataset, val_dataset, augment, &ckpt_manager, device,
        )?;

        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_writes_every_artefact() {
        let dir = std::env::temp_dir()
            .join(format!("burn-primer-train-uc-{}", std::process::id()));

        let cfg = TrainConfig {
            checkpoint_dir:    dir.to_string_lossy().into_owned(),
            samples_per_class: 40,
            epochs:            2,
            ..TrainConfig::default()
        };
        TrainUseCase::new(cfg).execute().unwrap();

        // Everything a later command needs must now be on disk
        for file in [
            "train_config.json",
            "model_config.json",
            "stats.json",
            "latest_epoch.json",
            "metrics.csv",
            "model_epoch_2.mpk.gz",
        ] {
            assert!(dir.join(file).exists(), "missing artefact: {file}");
        }

        std::fs::remove_dir_all(&dir).ok();
    }
}
