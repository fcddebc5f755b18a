// ============================================================
// Layer 5 — Backend Selection
// ============================================================
// The single point of truth for which Burn backend the binary
// runs on. Everything else in this layer is generic over
// `B: Backend`; only this module and the use cases name a
// concrete one.
//
// Two configurations:
//   - default            → NdArray (pure CPU, no GPU required)
//   - --features wgpu    → Wgpu (GPU via WebGPU)
//
// Why a type alias instead of runtime selection?
//   Burn backends are types, not values. Picking one at compile
//   time keeps every tensor annotation short (Tensor<PrimerBackend, 2>)
//   and lets the CPU build exist without any GPU dependency.
//
// Training additionally needs gradients, so it wraps the base
// backend in Autodiff. Calling .valid() on a model moves it
// back to the inner backend for cheap evaluation.
//
// Reference: Burn Book §2 (Backends)

use burn::tensor::backend::Backend;

/// The inference/evaluation backend.
#[cfg(feature = "wgpu")]
pub type PrimerBackend = burn::backend::Wgpu;

/// The inference/evaluation backend.
#[cfg(not(feature = "wgpu"))]
pub type PrimerBackend = burn::backend::NdArray;

/// The training backend: the same backend with gradient
/// tracking layered on top.
pub type PrimerAutodiffBackend = burn::backend::Autodiff<PrimerBackend>;

/// Device type of the active backend.
pub type PrimerDevice = <PrimerBackend as Backend>::Device;

/// The default device for the active backend: the CPU for
/// NdArray, the first adapter for Wgpu.
pub fn default_device() -> PrimerDevice {
    PrimerDevice::default()
}

/// Human-readable backend name for the walkthrough banner.
pub fn backend_name() -> String {
    PrimerBackend::name()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::Tensor;

    #[test]
    fn test_default_device_is_usable() {
        let device = default_device();
        let t      = Tensor::<PrimerBackend, 1>::from_floats([1.0, 2.0], &device);
        assert_eq!(t.dims(), [2]);
    }

    #[test]
    fn test_backend_name_is_not_empty() {
        assert!(!backend_name().is_empty());
    }
}
