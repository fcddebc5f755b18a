// ============================================================
// Layer 2 — Tour Chapters
// ============================================================
// Self-contained walkthroughs of the framework fundamentals,
// one per subcommand:
//
//   run_tensors  — creation, arithmetic, matmul, shapes, devices
//   run_autograd — backward() leaf gradients + a line fit with
//                  manually applied gradient-descent updates
//   run_data     — Dataset → augmentation → Batcher → DataLoader
//   run_parallel — scatter/gather forward across device replicas
//
// The tensor work lives in Layer 5 and returns report structs;
// these chapters narrate the reports on stdout. Unlike the other
// use cases they print directly — the console story IS their
// output, the same way the trainer owns its epoch lines.
//
// Reference: Burn Book §3 (Building Blocks)

use anyhow::{ensure, Result};
use burn::data::{
    dataloader::DataLoaderBuilder,
    dataset::{transform::MapperDataset, Dataset},
};
use burn::prelude::*;
use burn::tensor::Distribution;
use rand::{rngs::StdRng, SeedableRng};

use crate::data::{
    augment::Compose,
    batcher::PointBatcher,
    dataset::PointDataset,
    generator::BlobGenerator,
};
use crate::domain::traits::SampleSource;
use crate::ml::autograd::{fit_line, leaf_gradients};
use crate::ml::backend::{backend_name, default_device, PrimerAutodiffBackend, PrimerBackend};
use crate::ml::model::MlpClassifierConfig;
use crate::ml::parallel::DataParallel;
use crate::ml::tensors::{arithmetic_demo, creation_demo, device_demo, shapes_demo};

/// Chapter 1 — tensor fundamentals.
pub fn run_tensors() -> Result<()> {
    let device = default_device();
    println!("Tensor fundamentals on the {} backend", backend_name());

    let creation = creation_demo::<PrimerBackend>(&device);
    println!();
    println!("Creation");
    println!("  from_floats [[1,2],[3,4]]  → {:?}", creation.from_literal);
    println!("  zeros([2,3]) shape         → {:?}", creation.zeros_shape);
    println!("  ones([3,3]) summed         → {}", creation.ones_sum);
    println!("  full([2,2], 7.5) element   → {}", creation.fill_value);
    println!("  arange(0..6)               → {:?}", creation.arange);
    println!(
        "  random uniform shape       → {:?} (all in [0,1): {})",
        creation.random_shape, creation.random_in_unit_interval,
    );

    let arith = arithmetic_demo::<PrimerBackend>(&device);
    println!();
    println!("Arithmetic with a=[[1,2],[3,4]], b=[[5,6],[7,8]]");
    println!("  a + b (element-wise)       → {:?}", arith.sum);
    println!("  a - b (element-wise)       → {:?}", arith.difference);
    println!("  a * b (element-wise!)      → {:?}", arith.elementwise_product);
    println!("  a.mul_scalar(10)           → {:?}", arith.scaled);
    println!("  a.matmul(b)                → {:?}", arith.matmul);
    println!("  a.sum() = {}   a.mean() = {}", arith.total, arith.mean);

    let shapes = shapes_demo::<PrimerBackend>(&device);
    println!();
    println!("Shapes, starting from arange(0..12)");
    println!("  reshape([3,4])             → {:?}", shapes.reshaped);
    println!("  transpose()                → {:?}", shapes.transposed);
    println!("  slice row 1                → {:?}", shapes.row_one);
    println!("  flatten(0,1) length        → {}", shapes.flattened_len);

    let dev = device_demo::<PrimerBackend>(&device);
    println!();
    println!("Devices");
    println!("  backend                    → {}", dev.backend);
    println!("  tensor lives on            → {}", dev.device);
    println!("  values after to_device     → {:?}", dev.values_after_move);

    Ok(())
}

/// Chapter 2 — automatic differentiation.
pub fn run_autograd(steps: usize, lr: f64) -> Result<()> {
    let device = default_device();
    println!("Automatic differentiation on the {} backend", backend_name());

    // First the gradients themselves, checked against closed form
    let grads = leaf_gradients::<PrimerAutodiffBackend>(&device)?;
    println!();
    println!("y = sum(x·w + b) for a fixed 3×2 matrix x");
    println!("  ∂y/∂w = {:?}   (column sums of x: {:?})", grads.grad_w, grads.expected_grad_w);
    println!("  ∂y/∂b = {:?}      (one per row of x: {:?})", grads.grad_b, grads.expected_grad_b);
    println!("  y     = {}", grads.y);

    // Then use gradients the way an optimiser does
    let fit = fit_line::<PrimerAutodiffBackend>(&device, steps, lr)?;
    println!();
    println!("Fitting y = 2x + 1 by {} gradient-descent steps (lr={}):", fit.steps, lr);
    println!("  learned w = {:.4}   (target 2.0)", fit.w);
    println!("  learned b = {:.4}   (target 1.0)", fit.b);
    println!("  final MSE = {:.6}", fit.final_loss);

    Ok(())
}

/// Chapter 3 — the data pipeline, from raw samples to batches.
pub fn run_data(batch_size: usize, augment: bool) -> Result<()> {
    ensure!(batch_size > 0, "Batch size must be at least 1");

    let device  = default_device();
    let samples = BlobGenerator::new(3, 20, 42).samples()?;

    // One sample before and after the augmentation chain
    let original = samples[0].clone();
    let mut rng  = StdRng::seed_from_u64(7);
    let jittered = Compose::standard(0.1).apply(original.clone(), &mut rng);
    println!("One labelled point, then the same point augmented:");
    println!("  raw       → {:?} (class {})", original.features, original.label);
    println!("  augmented → {:?} (class {})", jittered.features, jittered.label);

    let dataset = PointDataset::new(samples);
    println!();
    println!(
        "Dataset: {} samples of {} features; dataset.get(0) = {:?}",
        dataset.len(),
        dataset.feature_dim(),
        dataset.get(0).map(|s| s.label),
    );

    // The loader turns index-wise access into ready tensors:
    // seeded shuffle, two worker threads filling batches, and a
    // smaller final batch picking up the remainder
    println!();
    println!("Iterating a shuffled DataLoader (batch_size={batch_size}, 2 workers):");
    let batcher = PointBatcher::<PrimerBackend>::new(device.clone());
    if augment {
        let loader = DataLoaderBuilder::new(batcher)
            .batch_size(batch_size)
            .shuffle(42)
            .num_workers(2)
            .build(MapperDataset::new(dataset, Compose::standard(0.1)));
        for (i, batch) in loader.iter().enumerate() {
            println!(
                "  batch {:>2}: points {:?}  labels {:?}  (augmented)",
                i, batch.points.dims(), batch.labels.dims(),
            );
        }
    } else {
        let loader = DataLoaderBuilder::new(batcher)
            .batch_size(batch_size)
            .shuffle(42)
            .num_workers(2)
            .build(dataset);
        for (i, batch) in loader.iter().enumerate() {
            println!(
                "  batch {:>2}: points {:?}  labels {:?}",
                i, batch.points.dims(), batch.labels.dims(),
            );
        }
    }

    Ok(())
}

/// Chapter 4 — data-parallel forward pass.
pub fn run_parallel(replicas: usize, batch_size: usize) -> Result<()> {
    ensure!(replicas > 0, "Need at least one replica");
    ensure!(batch_size > 0, "Batch size must be at least 1");

    let device = default_device();
    println!(
        "Data-parallel forward on the {} backend with {} replica(s)",
        backend_name(), replicas,
    );

    // Every replica is a clone of the default device; on wgpu
    // hardware these would name distinct GPUs
    let devices = vec![device.clone(); replicas];
    let model   = MlpClassifierConfig::new(2, 3).init::<PrimerBackend>(&device);
    let points  = Tensor::<PrimerBackend, 2>::random(
        [batch_size, 2], Distribution::Uniform(-1.0, 1.0), &device,
    );

    // The one-line wrap: the model is replicated onto every device
    let wrapped = DataParallel::new(model.clone(), &devices)?;
    println!("Wrapped the model into {} replica(s)", wrapped.num_replicas());

    let shard = batch_size.div_ceil(replicas);
    println!("Scatter: {batch_size} rows → shards of up to {shard} rows each");

    let gathered = wrapped.forward(points.clone())?;
    println!("Gather:  logits {:?} reassembled in row order", gathered.dims());

    // The whole point: sharding must not change the numbers
    let reference = model.forward(points);
    let max_diff: f32 = (gathered - reference).abs().max().into_scalar().elem();
    println!("Max |difference| vs single-device forward: {max_diff:.6}");

    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    // The chapters print their narration; these tests pin down
    // that every chapter runs cleanly end to end.

    #[test]
    fn test_tensors_chapter_runs() {
        run_tensors().unwrap();
    }

    #[test]
    fn test_autograd_chapter_runs() {
        run_autograd(50, 0.1).unwrap();
    }

    #[test]
    fn test_data_chapter_runs_plain_and_augmented() {
        run_data(16, false).unwrap();
        run_data(16, true).unwrap();
    }

    #[test]
    fn test_parallel_chapter_runs() {
        run_parallel(3, 10).unwrap();
    }

    #[test]
    fn test_zero_sized_arguments_are_rejected() {
        assert!(run_data(0, false).is_err());
        assert!(run_parallel(0, 8).is_err());
        assert!(run_parallel(2, 0).is_err());
    }
}
