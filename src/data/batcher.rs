// ============================================================
// Layer 4 — Point Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<LabeledPoint>
// into device-ready tensors.
//
// The DataLoader hands samples over one mini-batch at a time;
// the batcher's job is to stack them so the model sees a single
// [batch, features] tensor instead of N little ones. One matmul
// over a stacked batch is what accelerators are built for.
//
// Shapes:
//   Input:  Vec of N LabeledPoints, each with D features
//   Output: PointBatch — float [N, D] plus int labels [N]
//
//   All features go into one long Vec, then a reshape:
//   [p1_f1, p1_f2, ..., p2_f1, ..., pN_fD] → [N, D]
//
// Fixed-length samples make this a pure stack. Variable-length
// data (text, audio) would need padding and masks right here.
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::domain::sample::LabeledPoint;

// ─── PointBatch ───────────────────────────────────────────────────────────────
/// A batch of labelled points ready for the model forward pass.
/// Both tensors have batch_size as their first dimension.
#[derive(Debug, Clone)]
pub struct PointBatch<B: Backend> {
    /// Feature values — shape: [batch_size, num_features]
    /// Each row is one sample's feature vector
    pub points: Tensor<B, 2>,

    /// Class labels — shape: [batch_size]
    /// One integer per sample, the target for cross-entropy
    pub labels: Tensor<B, 1, Int>,
}

// ─── PointBatcher ─────────────────────────────────────────────────────────────
/// Stateless apart from the device tensors should land on.
/// B stays generic so one batcher serves NdArray and Wgpu alike.
#[derive(Clone, Debug)]
pub struct PointBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> PointBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// The hook Burn's DataLoader calls, once per mini-batch.
impl<B: Backend> Batcher<LabeledPoint, PointBatch<B>> for PointBatcher<B> {
    /// Stack a mini-batch: flatten every feature vector into one
    /// contiguous Vec, lift it into a 1D tensor, reshape it to
    /// [batch, dim], and collect the labels as a 1D int tensor.
    fn batch(&self, items: Vec<LabeledPoint>) -> PointBatch<B> {
        let batch_size = items.len();
        // Every sample carries the same feature count
        let dim        = items[0].dim();

        // ── Flatten features ──────────────────────────────────────────────────
        // From Vec<Vec<f32>> to one contiguous Vec<f32>, samples in order
        let features_flat: Vec<f32> = items
            .iter()
            .flat_map(|p| p.features.iter().copied())
            .collect();

        // ── Collect labels ────────────────────────────────────────────────────
        // One scalar per sample (Burn uses i32 literals for Int tensors)
        let labels_flat: Vec<i32> = items
            .iter()
            .map(|p| p.label as i32)
            .collect();

        // ── Lift into tensors ─────────────────────────────────────────────────
        // from_floats gives a 1D tensor; reshape pins the
        // [batch, dim] layout

        let points = Tensor::<B, 1>::from_floats(features_flat.as_slice(), &self.device)
            .reshape([batch_size, dim]);

        // Labels stay as a 1D tensor [batch_size]
        let labels = Tensor::<B, 1, Int>::from_ints(labels_flat.as_slice(), &self.device);

        PointBatch { points, labels }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn items() -> Vec<LabeledPoint> {
        vec![
            LabeledPoint::new(vec![1.0, 2.0], 0),
            LabeledPoint::new(vec![3.0, 4.0], 2),
            LabeledPoint::new(vec![5.0, 6.0], 1),
        ]
    }

    #[test]
    fn test_batch_shapes() {
        let batcher = PointBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(items());
        assert_eq!(batch.points.dims(), [3, 2]);
        assert_eq!(batch.labels.dims(), [3]);
    }

    #[test]
    fn test_rows_keep_sample_order() {
        let batcher = PointBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(items());

        let values: Vec<f32> = batch.points.into_data().to_vec().unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let labels: Vec<i64> = batch.labels.into_data().to_vec().unwrap();
        assert_eq!(labels, vec![0, 2, 1]);
    }

    #[test]
    fn test_single_item_batch() {
        let batcher = PointBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(vec![LabeledPoint::new(vec![-1.0, 1.0], 0)]);
        assert_eq!(batch.points.dims(), [1, 2]);
    }
}
