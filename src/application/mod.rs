// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// One use case per command. Each struct here strings the lower
// layers together into a complete workflow (train, evaluate,
// predict, finetune, or a tour chapter) and owns nothing else.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No direct file access (that's Layer 4 and 6)
//   - Only workflow coordination
//
// The tour chapters bend the "no printing" convention on
// purpose: their console narration IS the product.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// The checkpoint evaluation workflow
pub mod evaluate_use_case;

// The single-point inference workflow
pub mod predict_use_case;

// The transfer-learning workflow
pub mod finetune_use_case;

// The fundamentals walkthrough chapters
pub mod tour_use_case;
