// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and SGD.
//
// Key Burn 0.16 insight:
//   - Training uses an AutodiffBackend (e.g. Autodiff<NdArray>)
//     so loss.backward() can walk the computation graph
//   - model.valid() returns the model on the InnerBackend, with
//     no graph tracking — validation runs cheaper there
//   - The validation batcher must also use the InnerBackend
//
// The loop is split in two functions:
//   run_training — builds a fresh model from the config, then trains
//   train_model  — trains a model the caller already built
// Fine-tuning re-enters at train_model with a pretrained model
// whose output head was swapped, so both paths share one loop.
//
// Reference: Burn Book §5, Polyak (1964) heavy-ball momentum

use anyhow::{ensure, Result};
use burn::{
    data::{
        dataloader::DataLoaderBuilder,
        dataset::transform::MapperDataset,
    },
    module::AutodiffModule,
    optim::{momentum::MomentumConfig, GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{augment::Compose, batcher::PointBatcher, dataset::PointDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::evaluator;
use crate::ml::model::{MlpClassifier, MlpClassifierConfig};

/// Build a model sized for the dataset and train it from scratch.
///
/// Saves the model architecture next to the weights so evaluate
/// and predict can rebuild the exact same network later.
pub fn run_training<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    train_dataset: PointDataset,
    val_dataset:   PointDataset,
    augment:       Option<Compose>,
    ckpt_manager:  &CheckpointManager,
    device:        B::Device,
) -> Result<MlpClassifier<B>> {
    let num_features = train_dataset.feature_dim();
    ensure!(num_features > 0, "Cannot train on an empty dataset");

    // Seed the backend BEFORE creating the model, so the random
    // weight initialisation is reproducible run to run
    B::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = MlpClassifierConfig::new(num_features, cfg.num_classes)
        .with_hidden_size(cfg.hidden_size);
    ckpt_manager.save_model_config(&model_cfg)?;

    let model: MlpClassifier<B> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} → {} → {} ({} parameters)",
        num_features, cfg.hidden_size, cfg.num_classes, model.num_params(),
    );

    train_model(cfg, model, train_dataset, val_dataset, augment, ckpt_manager, device)
}

/// Train an existing model. This is the shared epoch loop used by
/// both fresh training and fine-tuning.
pub fn train_model<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    mut model:     MlpClassifier<B>,
    train_dataset: PointDataset,
    val_dataset:   PointDataset,
    augment:       Option<Compose>,
    ckpt_manager:  &CheckpointManager,
    device:        B::Device,
) -> Result<MlpClassifier<B>> {

    // ── SGD optimiser with momentum ───────────────────────────────────────────
    // v = μ*v + g          (velocity accumulates past gradients)
    // θ = θ - lr * v       (update)
    // Dampening is zeroed so the full gradient enters the velocity,
    // matching the classic heavy-ball formulation.
    let momentum = (cfg.momentum > 0.0).then(|| {
        MomentumConfig::new()
            .with_momentum(cfg.momentum)
            .with_dampening(0.0)
    });
    let optim_cfg = SgdConfig::new().with_momentum(momentum);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    // With augmentation, MapperDataset applies the transform chain
    // lazily on every access — so each epoch sees a freshly
    // perturbed copy of the training set, not one fixed distortion.
    let train_loader = match augment {
        Some(compose) => DataLoaderBuilder::new(PointBatcher::<B>::new(device.clone()))
            .batch_size(cfg.batch_size)
            .shuffle(cfg.seed)
            .num_workers(1)
            .build(MapperDataset::new(train_dataset, compose)),
        None => DataLoaderBuilder::new(PointBatcher::<B>::new(device.clone()))
            .batch_size(cfg.batch_size)
            .shuffle(cfg.seed)
            .num_workers(1)
            .build(train_dataset),
    };

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = PointBatcher::<B::InnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let logger = MetricsLogger::new(ckpt_manager.dir())?;

    let mut best_val_loss = f64::INFINITY;
    let mut best_epoch    = 0usize;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.points, batch.labels);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches  += 1;

            // Backward pass + SGD update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → MlpClassifier<B::InnerBackend>
        // no gradient graph is built for these forward passes
        let report  = evaluator::evaluate(&model.valid(), val_loader.as_ref())?;
        let metrics = EpochMetrics::new(
            epoch,
            avg_train_loss,
            report.avg_loss as f64,
            report.accuracy() as f64,
        );

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.1}%",
            epoch, cfg.epochs,
            metrics.train_loss, metrics.val_loss, metrics.val_acc * 100.0,
        );

        logger.log(&metrics)?;

        if metrics.is_improvement(best_val_loss) {
            best_val_loss = metrics.val_loss;
            best_epoch    = epoch;
        }

        ckpt_manager.save_model(&model, epoch)?;
    }

    tracing::info!(
        "Training complete! Best epoch: {} (val_loss={:.4})",
        best_epoch, best_val_loss,
    );
    tracing::info!("Metrics written to '{}'", logger.csv_path().display());

    Ok(model)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{generator::BlobGenerator, normalizer::Normalizer, splitter};
    use crate::domain::traits::SampleSource;
    use std::path::PathBuf;

    type TestBackend = burn::backend::Autodiff<burn::backend::NdArray>;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("burn-primer-{tag}-{}", std::process::id()))
    }

    fn make_datasets(seed: u64) -> (PointDataset, PointDataset) {
        let samples = BlobGenerator::new(3, 60, seed).samples().unwrap();
        let (train, val) = splitter::split_train_val(samples, 0.8, seed);
        let normalizer   = Normalizer::fit(&train);
        (
            PointDataset::new(normalizer.apply_all(train)),
            PointDataset::new(normalizer.apply_all(val)),
        )
    }

    #[test]
    fn test_training_learns_to_separate_blobs() {
        let dir  = temp_dir("trainer");
        let ckpt = CheckpointManager::new(&dir);

        let (train_dataset, val_dataset) = make_datasets(7);

        let mut cfg    = TrainConfig::default();
        cfg.epochs     = 3;
        cfg.batch_size = 16;
        cfg.lr         = 0.1;
        cfg.seed       = 7;

        let device = Default::default();
        let model  = run_training::<TestBackend>(
            &cfg, train_dataset, val_dataset, None, &ckpt, device,
        )
        .unwrap();
        assert!(model.num_params() > 0);

        // The metrics CSV is the training log — read it back
        let csv  = std::fs::read_to_string(dir.join("metrics.csv")).unwrap();
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert_eq!(rows.len(), 3, "one CSV row per epoch");

        let field = |row: &str, idx: usize| -> f64 {
            row.split(',').nth(idx).unwrap().parse().unwrap()
        };

        // Three clearly separated clusters: loss must drop and
        // accuracy must clear chance level (1/3) with a margin
        let first_loss = field(rows[0], 1);
        let last_loss  = field(rows[2], 1);
        assert!(
            last_loss < first_loss,
            "training loss should decrease: {first_loss} → {last_loss}"
        );

        let last_acc = field(rows[2], 3);
        assert!(last_acc > 0.5, "val accuracy should beat chance, got {last_acc}");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_training_with_augmentation_writes_checkpoints() {
        let dir  = temp_dir("trainer-aug");
        let ckpt = CheckpointManager::new(&dir);

        let (train_dataset, val_dataset) = make_datasets(11);

        let mut cfg = TrainConfig::default();
        cfg.epochs  = 1;
        cfg.seed    = 11;

        let device  = Default::default();
        let augment = Some(Compose::standard(0.05));
        run_training::<TestBackend>(
            &cfg, train_dataset, val_dataset, augment, &ckpt, device,
        )
        .unwrap();

        assert!(dir.join("model_epoch_1.mpk.gz").exists());
        assert!(dir.join("model_config.json").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let dir  = temp_dir("trainer-empty");
        let ckpt = CheckpointManager::new(&dir);

        let cfg    = TrainConfig::default();
        let device = Default::default();
        let result = run_training::<TestBackend>(
            &cfg,
            PointDataset::new(vec![]),
            PointDataset::new(vec![]),
            None,
            &ckpt,
            device,
        );
        assert!(result.is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
