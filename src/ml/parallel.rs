// ============================================================
// Layer 5 — Data-Parallel Inference
// ============================================================
// DataParallel wraps a model in one line and runs its forward
// pass scatter/gather style across several devices:
//
//   1. Replicate — new() forks a copy of the weights onto each
//      device, once, up front
//   2. Scatter — forward() splits the batch rows into one shard
//      per replica
//   3. Compute — each worker thread runs forward on its shard
//   4. Gather — all logits move back to the input's device and
//      concatenate in the original row order
//
// Burn tensors and modules are Send, so plain std::thread is
// all the machinery this needs — one thread per replica, joined
// in shard order so row order is preserved.
//
// On a CPU-only build every "device" is the same CPU, which
// still exercises the full scatter/gather path; with the wgpu
// backend the replicas land on real separate GPUs.
//
// Gradient synchronisation across replicas is a training-time
// concern and out of scope here — this path is forward-only.
//
// Reference: Rust Book §16 (Fearless Concurrency)

use anyhow::{anyhow, ensure, Result};
use burn::prelude::*;
use std::thread;

use crate::ml::model::MlpClassifier;

/// One model replica per device. Build it once, then call
/// `forward` as if it were the model itself.
pub struct DataParallel<B: Backend> {
    replicas: Vec<(MlpClassifier<B>, B::Device)>,
}

impl<B: Backend> DataParallel<B> {
    /// Replicate the model onto every device in the list.
    pub fn new(model: MlpClassifier<B>, devices: &[B::Device]) -> Result<Self> {
        ensure!(!devices.is_empty(), "Need at least one device");

        let replicas = devices
            .iter()
            .map(|device| (model.clone().fork(device), device.clone()))
            .collect();

        Ok(Self { replicas })
    }

    pub fn num_replicas(&self) -> usize {
        self.replicas.len()
    }

    /// Run one forward pass with the batch rows sharded across
    /// the replicas. Returns logits on the input's device, rows
    /// in the original order.
    pub fn forward(&self, points: Tensor<B, 2>) -> Result<Tensor<B, 2>> {
        let n = points.dims()[0];
        ensure!(n > 0, "Cannot shard an empty batch");

        let primary = points.device();

        // A single replica degenerates to a plain forward — no
        // threads, no concatenation
        if self.replicas.len() == 1 {
            let (replica, device) = &self.replicas[0];
            let logits = replica.forward(points.to_device(device));
            return Ok(logits.to_device(&primary));
        }

        // Ceil division: early shards absorb the remainder rows, and
        // trailing replicas may receive nothing when rows < replicas
        let shard = n.div_ceil(self.replicas.len());

        let mut handles = Vec::new();
        for (i, (replica, device)) in self.replicas.iter().enumerate() {
            let start = i * shard;
            if start >= n {
                break;
            }
            let end = ((i + 1) * shard).min(n);

            // Each worker owns a copy of its replica and its slice
            // of the rows, both living on the replica's device
            let replica = replica.clone();
            let chunk   = points.clone().slice([start..end]).to_device(device);

            handles.push(thread::spawn(move || replica.forward(chunk)));
        }

        // Gather in spawn order — concatenating shard outputs along
        // dim 0 reassembles the original batch
        let mut outputs = Vec::with_capacity(handles.len());
        for handle in handles {
            let logits = handle
                .join()
                .map_err(|_| anyhow!("Data-parallel worker panicked"))?;
            outputs.push(logits.to_device(&primary));
        }

        Ok(Tensor::cat(outputs, 0))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::MlpClassifierConfig;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type Device = <NdArray as Backend>::Device;

    #[test]
    fn test_sharded_forward_matches_single_device() {
        let device: Device = Default::default();
        let model  = MlpClassifierConfig::new(2, 3).init::<NdArray>(&device);

        // 10 rows over 3 replicas shards as 4/4/2 — deliberately ragged
        let points = Tensor::random([10, 2], Distribution::Uniform(-1.0, 1.0), &device);
        let expected = model.forward(points.clone()).into_data();

        let devices  = vec![device.clone(), device.clone(), device.clone()];
        let wrapped  = DataParallel::new(model, &devices).unwrap();
        let gathered = wrapped.forward(points).unwrap();

        assert_eq!(wrapped.num_replicas(), 3);
        assert_eq!(gathered.dims(), [10, 3]);
        gathered.into_data().assert_approx_eq(&expected, 5);
    }

    #[test]
    fn test_single_replica_is_exactly_plain_forward() {
        let device: Device = Default::default();
        let model  = MlpClassifierConfig::new(2, 3).init::<NdArray>(&device);

        let points   = Tensor::random([6, 2], Distribution::Default, &device);
        let expected = model.forward(points.clone()).into_data();

        let wrapped  = DataParallel::new(model, std::slice::from_ref(&device)).unwrap();
        let gathered = wrapped.forward(points).unwrap();

        // Same weights, same device, no sharding: bit-identical
        gathered.into_data().assert_eq(&expected, true);
    }

    #[test]
    fn test_more_devices_than_rows() {
        let device: Device = Default::default();
        let model  = MlpClassifierConfig::new(2, 3).init::<NdArray>(&device);

        let points  = Tensor::random([2, 2], Distribution::Default, &device);
        let devices = vec![device.clone(); 4];

        let wrapped  = DataParallel::new(model, &devices).unwrap();
        let gathered = wrapped.forward(points).unwrap();
        assert_eq!(gathered.dims(), [2, 3]);
    }

    #[test]
    fn test_no_devices_is_rejected() {
        let device: Device = Default::default();
        let model  = MlpClassifierConfig::new(2, 3).init::<NdArray>(&device);

        assert!(DataParallel::new(model, &[]).is_err());
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let device: Device = Default::default();
        let model  = MlpClassifierConfig::new(2, 3).init::<NdArray>(&device);

        let wrapped = DataParallel::new(model, std::slice::from_ref(&device)).unwrap();
        let points  = Tensor::<NdArray, 2>::zeros([0, 2], &device);
        assert!(wrapped.forward(points).is_err());
    }
}
