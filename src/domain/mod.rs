// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust vocabulary for the rest of the crate: what a
// sample is, what a prediction looks like, which seams exist.
// Nothing here touches Burn, the filesystem, or an RNG, which
// is what makes these types trivial to test and safe for every
// other layer to depend on.
//
// The dependency rule: arrows point inward. data, ml, and infra
// all import from this module; it imports from no other layer.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A single labelled training sample
pub mod sample;

// Result types: predictions and evaluation reports
pub mod report;

// Core abstractions (traits) that other layers implement
pub mod traits;
