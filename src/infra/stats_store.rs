// ============================================================
// Layer 6 — Statistics Store
// ============================================================
// Persists the feature Normalizer alongside the model weights.
//
// Why persist normalisation statistics?
//   The model was trained on STANDARDISED features (zero mean,
//   unit variance per dimension). At prediction time we must
//   apply the exact same shift and scale to incoming features,
//   or the model sees inputs from a different distribution and
//   its outputs are garbage. The mean/std learned from the
//   training split are therefore part of the model artefact,
//   not something to recompute later.
//
// File produced: checkpoints/stats.json
//   {
//     "mean": [0.012, -0.034],
//     "std":  [1.871, 1.902]
//   }
//
// Reference: Rust Book §10 (Traits)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::normalizer::Normalizer;
use crate::domain::traits::Persistable;

/// Saves and loads the Normalizer for a checkpoint directory.
pub struct StatsStore {
    /// Directory holding stats.json (same as the checkpoint dir)
    dir: PathBuf,
}

impl StatsStore {
    /// Create a store anchored at the given directory.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: &Path) -> Self {
        fs::create_dir_all(dir).ok();
        Self { dir: dir.to_path_buf() }
    }

    /// Write the fitted normaliser to {dir}/stats.json.
    pub fn save(&self, normalizer: &Normalizer) -> Result<()> {
        let path = self.stats_path();
        normalizer.save(&path)?;
        tracing::debug!("Saved normalisation stats to '{}'", path.display());
        Ok(())
    }

    /// Read the normaliser back from {dir}/stats.json.
    pub fn load(&self) -> Result<Normalizer> {
        let path = self.stats_path();
        Normalizer::load(&path).with_context(|| {
            format!(
                "Cannot load normalisation stats from '{}'. \
                 Make sure you have run 'train' before this command.",
                path.display()
            )
        })
    }

    fn stats_path(&self) -> PathBuf {
        self.dir.join("stats.json")
    }
}

// The Normalizer is the one artefact that is pure data (two Vec<f32>),
// so it demonstrates the Persistable trait with plain JSON on disk.
impl Persistable for Normalizer {
    fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write stats to '{}'", path.display()))?;
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read stats from '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::LabeledPoint;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("burn-primer-{tag}-{}", std::process::id()))
    }

    #[test]
    fn test_stats_round_trip() {
        let dir   = temp_dir("stats");
        let store = StatsStore::new(&dir);

        let samples = vec![
            LabeledPoint::new(vec![1.0, 10.0], 0),
            LabeledPoint::new(vec![3.0, 30.0], 1),
        ];
        let fitted = Normalizer::fit(&samples);
        store.save(&fitted).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.mean, fitted.mean);
        assert_eq!(loaded.std, fitted.std);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_stats_mentions_train() {
        let dir   = temp_dir("stats-missing");
        let store = StatsStore::new(&dir);

        let err = store.load().unwrap_err();
        assert!(format!("{err:#}").contains("train"));

        fs::remove_dir_all(&dir).ok();
    }
}
