// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Home of all the Burn-specific code: the network, the training
// loop, and every walkthrough that works with live tensors. The
// domain layer stays burn-free.
//
// Why give Burn its own layer?
//   - Framework API churn lands here, mostly nowhere else
//   - Domain types keep testing without any backend
//   - Architecture, data plumbing, and workflows stay visibly
//     separate concerns
//
// What's in this layer:
//
//   backend.rs   — Compile-time backend selection
//                  PrimerBackend is NdArray (CPU) by default,
//                  Wgpu with `--features wgpu`; training wraps
//                  it in Autodiff
//
//   tensors.rs   — Tensor fundamentals walkthrough
//                  Creation, arithmetic, matmul, reshaping,
//                  and device placement
//
//   autograd.rs  — Automatic differentiation walkthrough
//                  Leaf gradients via backward(), plus a
//                  hand-rolled gradient descent line fit
//
//   model.rs     — The MLP classifier architecture
//                  Linear → ReLU → Linear with a config that
//                  records its exact shape
//
//   trainer.rs   — The epoch loop
//                  Forward, loss, backward, SGD step, then
//                  validation, a metrics row, and a checkpoint
//                  per epoch
//
//   evaluator.rs — Batch evaluation
//                  Runs a loader through the model and fills
//                  an EvalReport (loss, accuracy, confusion)
//
//   predictor.rs — Single-point inference
//                  Loads a checkpoint, standardises features,
//                  runs the model, softmaxes into a Prediction
//
//   transfer.rs  — Transfer learning helpers
//                  Swap the classification head, freeze the
//                  backbone
//
//   parallel.rs  — The DataParallel wrapper
//                  One model replica per device; scatter rows,
//                  gather logits in order
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Backend type aliases and device selection
pub mod backend;

/// Tensor creation, arithmetic, and shape walkthroughs
pub mod tensors;

/// Gradient computation walkthroughs
pub mod autograd;

/// MLP classifier model architecture
pub mod model;

/// Epoch loop: forward, backward, step, validate, checkpoint
pub mod trainer;

/// Batch evaluation into an EvalReport
pub mod evaluator;

/// Loads a checkpoint and classifies raw points
pub mod predictor;

/// Head replacement and backbone freezing for fine-tuning
pub mod transfer;

/// DataParallel: multi-device scatter/gather forward pass
pub mod parallel;
