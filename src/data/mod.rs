// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From nothing at all (the data is synthesised) to device-ready
// tensor batches, one single-responsibility step at a time:
//
//   BlobGenerator     → seeded gaussian clusters, one per class
//       │
//       ▼
//   split_train_val   → seeded shuffle into train / validation
//       │
//       ▼
//   Normalizer        → fitted on the train split only
//       │
//       ▼
//   Compose           → per-sample augmentation (train only),
//                       standardisation as its final stage
//       │
//       ▼
//   PointDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   PointBatcher      → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// The first four stages are plain Vec-land and test without any
// backend; Burn enters only at the Dataset/Batcher boundary.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Seeded synthetic gaussian-blob dataset generator
pub mod generator;

/// Standardises features with train-split statistics
pub mod normalizer;

/// Compose-style per-sample augmentation transforms
pub mod augment;

/// Burn Dataset over labelled points
pub mod dataset;

/// Burn Batcher that stacks points into tensor batches
pub mod batcher;

/// Seeded shuffle-and-cut into train/validation
pub mod splitter;
