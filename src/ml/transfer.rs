// ============================================================
// Layer 5 — Transfer Learning
// ============================================================
// Reuses a trained network on a NEW task instead of training
// from scratch:
//
//   1. Load the pretrained model from its checkpoint
//   2. Swap the classification head for a fresh one sized for
//      the new number of classes (with_new_head)
//   3. Optionally freeze the hidden layer so only the new head
//      learns (freeze_backbone)
//   4. Run the normal training loop on the new task's data
//
// Why freezing works mechanically:
//   no_grad() marks the parameters as untracked, so backward()
//   never produces gradients for them, GradientsParams doesn't
//   contain them, and the optimiser step leaves them untouched.
//   The frozen weights stay bit-identical through training.
//
// Reference: Burn Book §5 (Module mapping)

use burn::{nn::LinearConfig, prelude::*, tensor::backend::AutodiffBackend};

use crate::ml::model::MlpClassifier;

/// Replace the classification head with a freshly initialised
/// Linear layer producing `num_classes` outputs. The trained
/// hidden layer is kept as-is.
pub fn with_new_head<B: Backend>(
    model:       MlpClassifier<B>,
    num_classes: usize,
    device:      &B::Device,
) -> MlpClassifier<B> {
    let hidden_size = model.hidden_size();
    MlpClassifier {
        output: LinearConfig::new(hidden_size, num_classes).init(device),
        ..model
    }
}

/// Freeze the hidden layer so fine-tuning only updates the head.
pub fn freeze_backbone<B: AutodiffBackend>(mut model: MlpClassifier<B>) -> MlpClassifier<B> {
    model.hidden = model.hidden.no_grad();
    model
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::MlpClassifierConfig;
    use burn::backend::{Autodiff, NdArray};
    use burn::optim::{GradientsParams, Optimizer, SgdConfig};

    type TestBackend = Autodiff<NdArray>;

    /// One plain SGD step on a fixed two-point batch.
    fn take_one_step(model: MlpClassifier<TestBackend>) -> MlpClassifier<TestBackend> {
        let device = Default::default();
        let points = Tensor::from_floats([[1.0, 2.0], [0.5, -1.0]], &device);
        let labels = Tensor::from_ints([0, 1], &device);

        let (loss, _) = model.forward_loss(points, labels);
        let grads     = GradientsParams::from_grads(loss.backward(), &model);

        let mut optim = SgdConfig::new().init();
        optim.step(0.5, model, grads)
    }

    #[test]
    fn test_new_head_keeps_hidden_weights() {
        let device = Default::default();
        let model  = MlpClassifierConfig::new(2, 3).init::<NdArray>(&device);

        let hidden_before = model.hidden.weight.val().into_data();
        let adapted       = with_new_head(model, 5, &device);

        assert_eq!(adapted.num_classes(), 5);
        assert_eq!(adapted.hidden_size(), 16);
        adapted
            .hidden
            .weight
            .val()
            .into_data()
            .assert_approx_eq(&hidden_before, 5);
    }

    #[test]
    fn test_frozen_backbone_survives_training_untouched() {
        let device = Default::default();
        let model: MlpClassifier<TestBackend> = MlpClassifierConfig::new(2, 3).init(&device);
        let model = freeze_backbone(model);

        let hidden_before = model.hidden.weight.val().into_data();
        let head_before: Vec<f32> = model.output.weight.val().into_data().to_vec().unwrap();

        let model = take_one_step(model);

        // Frozen layer: bit-identical after the optimiser step
        model
            .hidden
            .weight
            .val()
            .into_data()
            .assert_eq(&hidden_before, true);

        // Unfrozen head: must have moved
        let head_after: Vec<f32> = model.output.weight.val().into_data().to_vec().unwrap();
        assert!(
            head_after.iter().zip(&head_before).any(|(a, b)| a != b),
            "head weights should update during training"
        );
    }

    #[test]
    fn test_unfrozen_backbone_does_update() {
        let device = Default::default();
        let model: MlpClassifier<TestBackend> = MlpClassifierConfig::new(2, 3).init(&device);

        let hidden_before: Vec<f32> = model.hidden.weight.val().into_data().to_vec().unwrap();

        let model = take_one_step(model);

        let hidden_after: Vec<f32> = model.hidden.weight.val().into_data().to_vec().unwrap();
        assert!(
            hidden_after.iter().zip(&hidden_before).any(|(a, b)| a != b),
            "without freezing, the hidden layer should update"
        );
    }
}
