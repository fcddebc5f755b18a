// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Shuffles a sample vector with a seeded RNG, then cuts it in
// two: the leading slice trains the model, the tail is held out
// for validation.
//
// Why hold anything out?
//   A network scored on its own training points can look perfect
//   while having memorised them. Accuracy only means something
//   when measured on points the optimiser never saw.
//
// Why a SEEDED shuffle instead of thread_rng?
//   `evaluate` re-derives the validation split from the saved
//   training config rather than serialising the samples. Equal
//   seeds must therefore yield equal permutations.
//
// Why shuffle at all?
//   The generator emits samples class by class; an unshuffled
//   tail would hold only the last class.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `samples` under `seed` and cut the vector at
/// `train_fraction`, returning `(train, validation)`.
///
/// Equal seeds produce equal splits, which is what lets the
/// evaluate command rebuild the exact held-out set from config
/// alone.
pub fn split_train_val<T>(
    mut samples: Vec<T>,
    train_fraction: f64,
    seed: u64,
) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    // Round rather than truncate so 0.6 of 33 gives 20, not 19
    let total     = samples.len();
    let train_len = ((total as f64) * train_fraction).round() as usize;
    let val: Vec<T> = samples.drain(train_len.min(total)..).collect();

    tracing::debug!(
        "Split {} samples into {} train / {} validation",
        total,
        samples.len(),
        val.len(),
    );

    (samples, val)
}
