// ============================================================
// Layer 5 — Evaluation
// ============================================================
// Runs a trained model over a labelled data loader and collects
// loss, accuracy and a confusion matrix into an EvalReport.
//
// This function is backend-generic over plain `Backend` (not
// AutodiffBackend): evaluation never needs gradients, so the
// trainer hands in `model.valid()` and the evaluate command
// hands in a model loaded straight onto the inner backend.
//
// Reference: Burn Book §4 (Inference)

use anyhow::{anyhow, Result};
use burn::{data::dataloader::DataLoader, prelude::*};

use crate::data::batcher::PointBatch;
use crate::domain::report::EvalReport;
use crate::ml::model::MlpClassifier;

/// Evaluate the model on every batch the loader yields.
pub fn evaluate<B: Backend>(
    model:  &MlpClassifier<B>,
    loader: &dyn DataLoader<PointBatch<B>>,
) -> Result<EvalReport> {
    let mut report   = EvalReport::new(model.num_classes());
    let mut loss_sum = 0.0f64;
    let mut batches  = 0usize;

    for batch in loader.iter() {
        let (loss, logits) = model.forward_loss(batch.points, batch.labels.clone());
        loss_sum += loss.into_scalar().elem::<f64>();
        batches  += 1;

        // argmax(1) keeps the rank: [batch, classes] → [batch, 1].
        // Flatten down to [batch] before pairing with the labels.
        let predicted = logits.argmax(1).flatten::<1>(0, 1);

        // convert::<i64>() first — the Int element width differs
        // between backends (i64 on ndarray, i32 on wgpu)
        let predicted: Vec<i64> = predicted
            .into_data()
            .convert::<i64>()
            .to_vec()
            .map_err(|e| anyhow!("Cannot read predictions: {e:?}"))?;
        let actual: Vec<i64> = batch
            .labels
            .into_data()
            .convert::<i64>()
            .to_vec()
            .map_err(|e| anyhow!("Cannot read labels: {e:?}"))?;

        for (a, p) in actual.iter().zip(&predicted) {
            report.record(*a as usize, *p as usize);
        }
    }

    report.avg_loss = if batches > 0 {
        (loss_sum / batches as f64) as f32
    } else {
        f32::NAN
    };

    Ok(report)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{batcher::PointBatcher, dataset::PointDataset};
    use crate::domain::sample::LabeledPoint;
    use crate::ml::model::MlpClassifierConfig;
    use burn::backend::NdArray;
    use burn::data::dataloader::DataLoaderBuilder;
    use std::sync::Arc;

    fn tiny_loader(device: &<NdArray as Backend>::Device) -> Arc<dyn DataLoader<PointBatch<NdArray>>> {
        let samples = vec![
            LabeledPoint::new(vec![2.0, 0.1], 0),
            LabeledPoint::new(vec![-1.5, 1.2], 1),
            LabeledPoint::new(vec![0.3, -2.0], 2),
            LabeledPoint::new(vec![1.8, 0.4], 0),
            LabeledPoint::new(vec![-1.1, 0.9], 1),
        ];
        DataLoaderBuilder::new(PointBatcher::<NdArray>::new(device.clone()))
            .batch_size(2)
            .build(PointDataset::new(samples))
    }

    #[test]
    fn test_report_counts_every_sample_once() {
        let device = Default::default();
        let model  = MlpClassifierConfig::new(2, 3).init::<NdArray>(&device);
        let loader = tiny_loader(&device);

        let report = evaluate(&model, loader.as_ref()).unwrap();

        assert_eq!(report.total(), 5);
        assert_eq!(report.num_classes(), 3);
        assert!(report.avg_loss.is_finite());

        // Every sample lands in exactly one confusion cell
        let cells: usize = report.confusion.iter().flatten().sum();
        assert_eq!(cells, 5);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let device = Default::default();
        let model  = MlpClassifierConfig::new(2, 3).init::<NdArray>(&device);
        let loader = tiny_loader(&device);

        let first  = evaluate(&model, loader.as_ref()).unwrap();
        let second = evaluate(&model, loader.as_ref()).unwrap();

        assert_eq!(first.avg_loss, second.avg_loss);
        assert_eq!(first.confusion, second.confusion);
    }
}
