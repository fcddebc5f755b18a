// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that outlives the process: files written by one
// command and read back by another.
//
//   checkpoint.rs   — model weights via Burn's CompactRecorder,
//                     plus the run and model configs as JSON so
//                     later commands rebuild the exact same
//                     model and dataset split
//
//   stats_store.rs  — per-feature mean/std fitted on the train
//                     split, so predict standardises incoming
//                     points exactly as training did
//
//   metrics.rs      — one CSV row per epoch, the learning curve
//                     a run leaves behind
//
// Nothing here knows about workflows; each store takes a
// directory and owns its file names within it. Swapping the
// directory for an object store would touch only this layer.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Normalisation statistics saving and loading
pub mod stats_store;

/// Training metrics CSV logger
pub mod metrics;
