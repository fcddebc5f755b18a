use burn::{
    nn::{loss::CrossEntropyLossConfig, Linear, LinearConfig, Relu},
    prelude::*,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct MlpClassifierConfig {
    pub num_features: usize,
    pub num_classes:  usize,
    #[config(default = 16)]
    pub hidden_size:  usize,
}

impl MlpClassifierConfig {
    /// Build the network on the given device.
    /// Two linear layers with a ReLU between them — the
    /// smallest architecture that can learn a non-linear
    /// decision boundary.
    pub fn init<B: Backend>(&self, device: &B::Device) -> MlpClassifier<B> {
        MlpClassifier {
            hidden:     LinearConfig::new(self.num_features, self.hidden_size).init(device),
            activation: Relu::new(),
            output:     LinearConfig::new(self.hidden_size, self.num_classes).init(device),
        }
    }
}

/// The walkthrough's classifier:
///
///   points [batch, features]
///     → hidden Linear → ReLU          (the "backbone")
///     → output Linear                 (the "head")
///     → logits [batch, classes]
///
/// Fields are public so the transfer-learning stage can swap
/// the head and freeze the backbone from outside this module.
#[derive(Module, Debug)]
pub struct MlpClassifier<B: Backend> {
    pub hidden:     Linear<B>,
    pub activation: Relu,
    pub output:     Linear<B>,
}

impl<B: Backend> MlpClassifier<B> {
    /// points: [batch, features] → logits: [batch, classes]
    pub fn forward(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.hidden.forward(points);
        let x = self.activation.forward(x);
        self.output.forward(x)
    }

    /// Forward pass plus cross-entropy loss against integer
    /// class labels. Returns the logits too so callers can
    /// compute accuracy without a second forward pass.
    ///
    /// No autodiff bound here on purpose: the training loop
    /// calls this on the Autodiff backend and then .backward(),
    /// while evaluation calls it on the inner backend where the
    /// loss is just a number.
    pub fn forward_loss(
        &self,
        points: Tensor<B, 2>,
        labels: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(points);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), labels);
        (loss, logits)
    }

    /// Number of input features, read off the weight shape.
    /// Burn stores Linear weights as [d_input, d_output].
    pub fn num_features(&self) -> usize {
        self.hidden.weight.val().dims()[0]
    }

    /// Width of the hidden layer.
    pub fn hidden_size(&self) -> usize {
        self.hidden.weight.val().dims()[1]
    }

    /// Number of output classes, read off the head's weight shape.
    pub fn num_classes(&self) -> usize {
        self.output.weight.val().dims()[1]
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn model() -> MlpClassifier<TestBackend> {
        MlpClassifierConfig::new(2, 3).init(&Default::default())
    }

    #[test]
    fn test_forward_shape() {
        let logits = model().forward(Tensor::zeros([4, 2], &Default::default()));
        assert_eq!(logits.dims(), [4, 3]);
    }

    #[test]
    fn test_config_default_hidden_size() {
        assert_eq!(MlpClassifierConfig::new(2, 3).hidden_size, 16);
        assert_eq!(model().hidden_size(), 16);
    }

    #[test]
    fn test_num_classes_reads_head_shape() {
        assert_eq!(model().num_classes(), 3);
    }

    #[test]
    fn test_param_count() {
        // hidden: 2*16 weights + 16 biases, output: 16*3 + 3
        assert_eq!(model().num_params(), 2 * 16 + 16 + 16 * 3 + 3);
    }

    #[test]
    fn test_initial_loss_near_uniform() {
        // With small random weights the logits start near zero,
        // so the loss should sit near ln(3) ≈ 1.0986
        let device = Default::default();
        let points = Tensor::<TestBackend, 2>::from_floats([[0.5, -0.5], [1.0, 1.0]], &device);
        let labels = Tensor::<TestBackend, 1, Int>::from_ints([0, 2], &device);
        let (loss, logits) = model().forward_loss(points, labels);
        assert_eq!(logits.dims(), [2, 3]);

        let loss_val: f32 = loss.into_scalar().elem();
        assert!((loss_val - 3.0f32.ln()).abs() < 0.5, "loss was {loss_val}");
    }
}
