// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the eight subcommands of the primer — the three tour
// chapters (`tensors`, `autograd`, `data`), the training loop
// (`train`), the checkpoint consumers (`evaluate`, `predict`),
// transfer learning (`finetune`) and the replica demo
// (`parallel`) — and all their configurable flags.
//
// Everything argv-shaped is generated by clap's derive macros:
// --help output, missing-flag errors, and the string-to-number
// conversions. The structs below only declare what exists.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::finetune_use_case::FinetuneConfig;
use crate::application::train_use_case::TrainConfig;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk through tensor creation, arithmetic, shapes and devices
    Tensors,

    /// Compute gradients by hand, then fit a line with them
    Autograd(AutogradArgs),

    /// Generate a dataset and iterate it in mini-batches
    Data(DataArgs),

    /// Train the point classifier and save a checkpoint
    Train(TrainArgs),

    /// Score a saved checkpoint on the held-out validation split
    Evaluate(EvaluateArgs),

    /// Classify a single point with a saved checkpoint
    Predict(PredictArgs),

    /// Reuse a trained backbone on a new task (transfer learning)
    Finetune(FinetuneArgs),

    /// Run one forward pass sharded across model replicas
    Parallel(ParallelArgs),
}

/// Arguments for the `autograd` tour chapter
#[derive(Args, Debug)]
pub struct AutogradArgs {
    /// Number of gradient-descent steps in the line-fitting demo
    #[arg(long, default_value_t = 200)]
    pub steps: usize,

    /// Step size for the line-fitting demo
    #[arg(long, default_value_t = 0.1)]
    pub lr: f64,
}

/// Arguments for the `data` tour chapter
#[derive(Args, Debug)]
pub struct DataArgs {
    /// Number of samples grouped into one batch
    #[arg(long, default_value_t = 16)]
    pub batch_size: usize,

    /// Jitter, rotate and scale each sample before it is batched
    #[arg(long)]
    pub augment: bool,
}

/// Flags of the `train` command, one field per knob.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory to save model checkpoints and dataset stats
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Number of point clusters — each cluster is one output class
    #[arg(long, default_value_t = 3)]
    pub num_classes: usize,

    /// Number of points generated per cluster
    #[arg(long, default_value_t = 200)]
    pub samples_per_class: usize,

    /// Width of the hidden layer
    #[arg(long, default_value_t = 16)]
    pub hidden_size: usize,

    /// How many points are stacked into one forward pass
    #[arg(long, default_value_t = 16)]
    pub batch_size: usize,

    /// Full passes over the training split
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// SGD step size. Too large diverges, too small crawls.
    #[arg(long, default_value_t = 0.05)]
    pub lr: f64,

    /// Fraction of the previous update carried into the next one
    /// (0 disables momentum)
    #[arg(long, default_value_t = 0.9)]
    pub momentum: f64,

    /// Seed for data generation, shuffling and weight init
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of the dataset used for training;
    /// the rest becomes the validation split
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// Re-augment the training split on every epoch
    #[arg(long)]
    pub augment: bool,

    /// Standard deviation of the noise added by augmentation
    #[arg(long, default_value_t = 0.1)]
    pub jitter_std: f32,
}

/// TrainArgs stops here; TrainConfig is what crosses into
/// Layer 2. The application layer never sees a clap type.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            checkpoint_dir:    a.checkpoint_dir,
            num_classes:       a.num_classes,
            samples_per_class: a.samples_per_class,
            hidden_size:       a.hidden_size,
            batch_size:        a.batch_size,
            epochs:            a.epochs,
            lr:                a.lr,
            momentum:          a.momentum,
            seed:              a.seed,
            train_fraction:    a.train_fraction,
            augment:           a.augment,
            jitter_std:        a.jitter_std,
            // The CLI never rotates clusters; that knob belongs to
            // fine-tuning, which uses it to build the target task.
            rotation:          0.0,
        }
    }
}

/// Flags of the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Directory a previous train run wrote its artefacts to
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

/// Flags of the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Comma-separated coordinates of the point to classify,
    /// e.g. --features 2.1,-0.3
    #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
    pub features: Vec<f32>,

    /// Directory a previous train run wrote its artefacts to
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

/// Flags of the `finetune` command
#[derive(Args, Debug)]
pub struct FinetuneArgs {
    /// Directory holding the pretrained checkpoint to start from
    #[arg(long, default_value = "checkpoints")]
    pub source_dir: String,

    /// Directory to save the fine-tuned checkpoint
    #[arg(long, default_value = "checkpoints/finetuned")]
    pub target_dir: String,

    /// Number of classes in the new task
    #[arg(long, default_value_t = 4)]
    pub num_classes: usize,

    /// Number of fine-tuning passes — fewer than full training,
    /// because the backbone already knows the feature space
    #[arg(long, default_value_t = 3)]
    pub epochs: usize,

    /// Fine-tuning learning rate, lower than the training one
    /// so the pretrained weights are nudged, not overwritten
    #[arg(long, default_value_t = 0.02)]
    pub lr: f64,

    /// Train only the new head and leave the backbone untouched
    #[arg(long)]
    pub freeze_backbone: bool,
}

/// Same boundary rule as TrainArgs: clap stays in Layer 1 and
/// FinetuneConfig is what the use case receives.
impl From<FinetuneArgs> for FinetuneConfig {
    fn from(a: FinetuneArgs) -> Self {
        FinetuneConfig {
            source_dir:      a.source_dir,
            target_dir:      a.target_dir,
            num_classes:     a.num_classes,
            epochs:          a.epochs,
            lr:              a.lr,
            freeze_backbone: a.freeze_backbone,
        }
    }
}

/// Arguments for the `parallel` tour chapter
#[derive(Args, Debug)]
pub struct ParallelArgs {
    /// Number of model replicas to spawn
    #[arg(long, default_value_t = 2)]
    pub replicas: usize,

    /// Number of rows in the input batch that gets sharded
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,
}
