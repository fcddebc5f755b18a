// ============================================================
// Layer 5 — Predictor
// ============================================================
// Single-point inference against a trained checkpoint.
//
// The prediction pipeline must mirror the training pipeline:
//   raw features → standardise (SAME mean/std as training)
//                → forward pass → softmax → Prediction
// Skipping the standardisation step is the classic inference
// bug: the model still runs, but on inputs from a distribution
// it never saw.
//
// Reference: Burn Book §4 (Inference)

use anyhow::{ensure, Result};
use burn::prelude::*;

use crate::data::normalizer::Normalizer;
use crate::domain::report::Prediction;
use crate::domain::traits::Classifier;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::MlpClassifier;

/// Holds a restored model plus the normalisation statistics it
/// was trained with, ready to classify raw feature vectors.
pub struct Predictor<B: Backend> {
    model:      MlpClassifier<B>,
    normalizer: Normalizer,
    device:     B::Device,
}

impl<B: Backend> Predictor<B> {
    /// Rebuild the trained model from a checkpoint directory.
    ///
    /// Steps:
    ///   1. Load model_config.json → exact architecture
    ///   2. Init a fresh model with random weights
    ///   3. Load the latest checkpoint weights into it
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        normalizer:   Normalizer,
        device:       B::Device,
    ) -> Result<Self> {
        let model_cfg = ckpt_manager.load_model_config()?;
        let model: MlpClassifier<B> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint");
        Ok(Self { model, normalizer, device })
    }

    /// Wrap an already-built model. Used by tests and by demos
    /// that train and predict within one process.
    pub fn new(model: MlpClassifier<B>, normalizer: Normalizer, device: B::Device) -> Self {
        Self { model, normalizer, device }
    }
}

impl<B: Backend> Classifier for Predictor<B> {
    fn classify(&self, features: &[f32]) -> Result<Prediction> {
        ensure!(
            features.len() == self.model.num_features(),
            "Expected {} features, got {}",
            self.model.num_features(),
            features.len(),
        );

        // Apply the SAME standardisation the training data saw
        let standardised = self.normalizer.transform_features(features);

        // [features] → [1, features]: the model expects a batch axis
        let input = Tensor::<B, 1>::from_floats(standardised.as_slice(), &self.device)
            .unsqueeze::<2>();

        let logits = self.model.forward(input); // [1, num_classes]

        // Softmax turns logits into a probability distribution
        let probabilities: Vec<f32> = burn::tensor::activation::softmax(logits, 1)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read probabilities: {e:?}"))?;

        tracing::debug!("Class probabilities: {:?}", probabilities);

        Ok(Prediction::from_probabilities(probabilities))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::MlpClassifierConfig;
    use burn::backend::NdArray;

    fn untrained_predictor() -> Predictor<NdArray> {
        let device = Default::default();
        let model  = MlpClassifierConfig::new(2, 3).init::<NdArray>(&device);
        // Normalizer fitted on nothing acts as the identity
        Predictor::new(model, Normalizer::fit(&[]), device)
    }

    #[test]
    fn test_classify_returns_a_distribution() {
        let predictor  = untrained_predictor();
        let prediction = predictor.classify(&[0.5, -0.2]).unwrap();

        assert_eq!(prediction.probabilities.len(), 3);
        assert!(prediction.label < 3);

        let sum: f32 = prediction.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "softmax must sum to 1, got {sum}");
        assert!(prediction.confidence > 0.0 && prediction.confidence <= 1.0);
        // confidence is the probability of the winning label
        assert_eq!(prediction.confidence, prediction.probabilities[prediction.label]);
    }

    #[test]
    fn test_wrong_feature_count_is_rejected() {
        let predictor = untrained_predictor();

        let err = predictor.classify(&[1.0]).unwrap_err();
        assert!(err.to_string().contains("Expected 2 features"));
    }
}
