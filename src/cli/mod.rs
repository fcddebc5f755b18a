// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The outermost shell: clap parses argv, each subcommand is
// handed straight to its use case, and whatever comes back is
// rendered here. No business logic lives in this file.
//
// Eight commands are supported:
//   1. `tensors`  — tensor creation, arithmetic, shapes, devices
//   2. `autograd` — gradients by hand, then a gradient-descent line fit
//   3. `data`     — dataset generation and mini-batch iteration
//   4. `train`    — trains the classifier and writes a checkpoint
//   5. `evaluate` — scores a checkpoint on the validation split
//   6. `predict`  — classifies one point with a checkpoint
//   7. `finetune` — adapts a pretrained backbone to a new task
//   8. `parallel` — shards a forward pass across model replicas
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Subcommand and argument definitions
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{
    AutogradArgs, Commands, DataArgs, EvaluateArgs, FinetuneArgs, ParallelArgs, PredictArgs,
    TrainArgs,
};

use crate::domain::report::{EvalReport, Prediction};

/// Top-level parser: one required subcommand. The Parser derive
/// generates the argv handling, help text, and version flag.
#[derive(Parser, Debug)]
#[command(
    name = "burn-primer",
    version = "0.1.0",
    about = "A guided tour of Burn: tensors, autograd, data loading, training and transfer."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route the parsed subcommand to its handler. Routing is all
    /// this layer does; the maths happens below it.
    /// The handlers are associated functions: matching on `self.command`
    /// moves the args out of `self`, so there is no `self` left to call
    /// methods on.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Tensors        => Self::run_tensors(),
            Commands::Autograd(args) => Self::run_autograd(args),
            Commands::Data(args)     => Self::run_data(args),
            Commands::Train(args)    => Self::run_train(args),
            Commands::Evaluate(args) => Self::run_evaluate(args),
            Commands::Predict(args)  => Self::run_predict(args),
            Commands::Finetune(args) => Self::run_finetune(args),
            Commands::Parallel(args) => Self::run_parallel(args),
        }
    }

    /// Handles the `tensors` chapter — no flags to convert.
    fn run_tensors() -> Result<()> {
        use crate::application::tour_use_case;

        tour_use_case::run_tensors()
    }

    /// Handles the `autograd` chapter.
    fn run_autograd(args: AutogradArgs) -> Result<()> {
        use crate::application::tour_use_case;

        tour_use_case::run_autograd(args.steps, args.lr)
    }

    /// Handles the `data` chapter.
    fn run_data(args: DataArgs) -> Result<()> {
        use crate::application::tour_use_case;

        tour_use_case::run_data(args.batch_size, args.augment)
    }

    /// Handles the `train` subcommand.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!(
            "Starting training: {} classes x {} samples each",
            args.num_classes,
            args.samples_per_class
        );

        // args.into() is where clap types stop and application
        // config begins
        let dir = args.checkpoint_dir.clone();
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Artefacts written to '{dir}'.");
        Ok(())
    }

    /// Handles the `evaluate` subcommand.
    /// Runs the use case and renders the resulting report.
    fn run_evaluate(args: EvaluateArgs) -> Result<()> {
        use crate::application::evaluate_use_case::EvaluateUseCase;

        let use_case = EvaluateUseCase::new(args.checkpoint_dir);
        let report = use_case.execute()?;

        Self::print_report(&report);
        Ok(())
    }

    /// Handles the `predict` subcommand.
    /// Classifies the given point and prints the class probabilities.
    fn run_predict(args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let use_case = PredictUseCase::new(args.checkpoint_dir, args.features);
        let prediction = use_case.execute()?;

        Self::print_prediction(&prediction);
        Ok(())
    }

    /// Handles the `finetune` subcommand.
    fn run_finetune(args: FinetuneArgs) -> Result<()> {
        use crate::application::finetune_use_case::FinetuneUseCase;

        tracing::info!(
            "Fine-tuning '{}' into '{}' ({} classes)",
            args.source_dir,
            args.target_dir,
            args.num_classes
        );

        let dir = args.target_dir.clone();
        let use_case = FinetuneUseCase::new(args.into());
        use_case.execute()?;

        println!("Fine-tuning complete. Target checkpoint in '{dir}'.");
        Ok(())
    }

    /// Handles the `parallel` chapter.
    fn run_parallel(args: ParallelArgs) -> Result<()> {
        use crate::application::tour_use_case;

        tour_use_case::run_parallel(args.replicas, args.batch_size)
    }

    /// Render an evaluation report: overall accuracy, per-class
    /// accuracy, and the full confusion matrix.
    fn print_report(report: &EvalReport) {
        println!("\nEvaluation on {} held-out samples", report.total());
        println!("  average loss   {:.4}", report.avg_loss);
        println!(
            "  accuracy       {:.1}%  ({}/{} correct)",
            report.accuracy() * 100.0,
            report.correct(),
            report.total()
        );

        println!("\nPer-class accuracy:");
        for class in 0..report.num_classes() {
            println!(
                "  class {class}   {:.1}%",
                report.class_accuracy(class) * 100.0
            );
        }

        // A strong model puts nearly all counts on the diagonal.
        println!("\nConfusion matrix (rows = actual, columns = predicted):");
        print!("        ");
        for predicted in 0..report.num_classes() {
            print!("{predicted:>6}");
        }
        println!();
        for (actual, row) in report.confusion.iter().enumerate() {
            print!("  {actual:>4}  ");
            for count in row {
                print!("{count:>6}");
            }
            println!();
        }
    }

    /// Render a single prediction with a probability bar per class.
    fn print_prediction(prediction: &Prediction) {
        println!(
            "\nPredicted class {} with {:.1}% confidence",
            prediction.label,
            prediction.confidence * 100.0
        );

        println!("\nClass probabilities:");
        for (class, p) in prediction.probabilities.iter().enumerate() {
            let bar = "█".repeat((p * 40.0).round() as usize);
            println!("  class {class}  {:>5.1}%  {bar}", p * 100.0);
        }
    }
}
