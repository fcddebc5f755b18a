// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Owns everything the train command leaves on disk and everything
// the later commands read back.
//
// A finished run leaves these artefacts behind:
//   model_epoch_{N}.mpk.gz — weights, one file per epoch
//   latest_epoch.json      — which N the loaders should pick
//   train_config.json      — run settings (seed, split, lr, ...)
//   model_config.json      — architecture (dims, hidden, classes)
//
// Weights alone are not loadable: Burn needs a model of the right
// shape to pour the record into, and evaluate needs the run
// settings to regenerate the held-out split. Hence the two config
// files next to the weights.
//
// NamedMpkGzFileRecorder is Burn's gzipped-MessagePack recorder. It is
// type-safe (a shape mismatch refuses to load) and appends the
// .mpk.gz extension itself, so every path handed to it is a stem.
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::{MlpClassifier, MlpClassifierConfig};

/// Reads and writes the artefacts of one training run, all rooted
/// in a single directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        // mkdir -p semantics; an existing directory is fine
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// The managed directory. StatsStore and MetricsLogger anchor
    /// their own files (stats.json, metrics.csv) here as well.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path stem for one epoch's weights. The recorder adds the
    /// extension on both record and load.
    fn weights_stem(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("model_epoch_{epoch}"))
    }

    /// Write one epoch's weights and advance the latest-epoch
    /// pointer to it.
    pub fn save_model<B: AutodiffBackend>(
        &self,
        model: &MlpClassifier<B>,
        epoch: usize,
    ) -> Result<()> {
        let stem = self.weights_stem(epoch);
        NamedMpkGzFileRecorder::<FullPrecisionSettings>::new()
            .record(model.clone().into_record(), stem.clone())
            .with_context(|| format!("Could not write weights to '{}'", stem.display()))?;

        fs::write(
            self.dir.join("latest_epoch.json"),
            serde_json::to_string(&epoch)?,
        )
        .context("Could not update latest_epoch.json")?;

        tracing::debug!("Checkpointed epoch {}", epoch);
        Ok(())
    }

    /// Pour the latest saved weights into `model`.
    ///
    /// The caller rebuilds `model` from model_config.json first,
    /// so the record and the architecture always agree.
    pub fn load_model<B: Backend>(
        &self,
        model:  MlpClassifier<B>,
        device: &B::Device,
    ) -> Result<MlpClassifier<B>> {
        let epoch = self.latest_epoch()?;
        let stem  = self.weights_stem(epoch);

        tracing::info!("Loading checkpoint from epoch {}", epoch);

        let record = NamedMpkGzFileRecorder::<FullPrecisionSettings>::new()
            .load(stem.clone(), device)
            .with_context(|| {
                format!(
                    "No weights at '{}'. Run 'train' before this command.",
                    stem.display()
                )
            })?;

        Ok(model.load_record(record))
    }

    /// Persist the run settings so evaluate can rebuild the exact
    /// split and predict the exact normalisation.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Could not write '{}'", path.display()))?;

        tracing::debug!("Run config saved to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "No run config at '{}'. Run 'train' before this command.",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// The architecture goes through Burn's own Config save/load
    /// rather than plain serde, so the file next to the weights is
    /// the format Burn users expect to find there.
    pub fn save_model_config(&self, cfg: &MlpClassifierConfig) -> Result<()> {
        let path = self.dir.join("model_config.json");
        cfg.save(&path)
            .with_context(|| format!("Could not write '{}'", path.display()))?;
        Ok(())
    }

    pub fn load_model_config(&self) -> Result<MlpClassifierConfig> {
        let path = self.dir.join("model_config.json");
        MlpClassifierConfig::load(&path).map_err(|e| {
            anyhow::anyhow!(
                "No model config at '{}': {e}. Run 'train' before this command.",
                path.display()
            )
        })
    }

    fn latest_epoch(&self) -> Result<usize> {
        let pointer = self.dir.join("latest_epoch.json");
        let s = fs::read_to_string(&pointer)
            .context("latest_epoch.json missing. Run 'train' first.")?;
        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use burn::module::AutodiffModule;

    type TestBackend = Autodiff<NdArray>;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("burn-primer-{tag}-{}", std::process::id()))
    }

    #[test]
    fn test_weights_survive_save_and_load() {
        let dir     = temp_dir("ckpt");
        let manager = CheckpointManager::new(&dir);
        let device  = Default::default();

        let config  = MlpClassifierConfig::new(2, 3);
        let trained: MlpClassifier<TestBackend> = config.init(&device);
        manager.save_model(&trained, 1).unwrap();

        // Load into a FRESH model on the inner backend, the way
        // evaluate and predict do it
        let fresh: MlpClassifier<NdArray> = config.init(&device);
        let loaded = manager.load_model(fresh, &device).unwrap();

        let input = Tensor::<NdArray, 2>::from_floats([[0.3, -0.7]], &device);
        let expected = trained
            .valid()
            .forward(input.clone())
            .into_data();
        loaded.forward(input).into_data().assert_approx_eq(&expected, 5);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_round_trip() {
        let dir     = temp_dir("cfg");
        let manager = CheckpointManager::new(&dir);

        let mut cfg = TrainConfig::default();
        cfg.epochs  = 7;
        cfg.seed    = 123;
        manager.save_config(&cfg).unwrap();

        let loaded = manager.load_config().unwrap();
        assert_eq!(loaded.epochs, 7);
        assert_eq!(loaded.seed, 123);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_model_config_round_trip() {
        let dir     = temp_dir("modelcfg");
        let manager = CheckpointManager::new(&dir);

        let cfg = MlpClassifierConfig::new(2, 5).with_hidden_size(32);
        manager.save_model_config(&cfg).unwrap();

        let loaded = manager.load_model_config().unwrap();
        assert_eq!(loaded.num_classes, 5);
        assert_eq!(loaded.hidden_size, 32);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_checkpoint_mentions_train() {
        let dir     = temp_dir("missing");
        let manager = CheckpointManager::new(&dir);

        let err = manager.load_config().unwrap_err();
        assert!(format!("{err:#}").contains("train"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
