// ============================================================
// Layer 5 — Tensor Fundamentals
// ============================================================
// Stage one of the walkthrough: creating tensors, arithmetic,
// shape manipulation, and moving data between devices. Nothing
// here learns anything — this is the vocabulary lesson the rest
// of the crate is written in.
//
// Each demo returns a plain report struct instead of printing.
// The tour use case narrates the values; the unit tests pin
// them down. That split keeps this module assertable without
// capturing stdout.
//
// Reference: Burn Book §3 (Tensors)

use burn::prelude::*;
use burn::tensor::Distribution;

// ─── Creation ─────────────────────────────────────────────────────────────────

/// What the creation demo produced, ready to narrate.
#[derive(Debug, Clone)]
pub struct CreationReport {
    /// A tensor built from literal nested arrays, read back out
    pub from_literal: Vec<f32>,

    /// Shape of a zeros tensor
    pub zeros_shape: [usize; 2],

    /// Sum over a ones tensor — equals its element count
    pub ones_sum: f32,

    /// Every element of a filled tensor is this value
    pub fill_value: f32,

    /// An integer range tensor, read back out
    pub arange: Vec<i64>,

    /// Shape of a uniform random tensor
    pub random_shape: [usize; 2],

    /// Whether every random draw landed inside [0, 1)
    pub random_in_unit_interval: bool,
}

/// Build tensors every way the API offers: from literals, from
/// constants, from ranges, and from random distributions.
pub fn creation_demo<B: Backend>(device: &B::Device) -> CreationReport {
    // From literal data — rank and shape come from the nesting
    let literal = Tensor::<B, 2>::from_floats([[1.0, 2.0], [3.0, 4.0]], device);

    // Constant constructors take an explicit shape
    let zeros = Tensor::<B, 2>::zeros([2, 3], device);
    let ones  = Tensor::<B, 2>::ones([3, 3], device);
    let full  = Tensor::<B, 2>::full([2, 2], 7.5, device);

    // Integer range, like an iterator but on-device
    let arange = Tensor::<B, 1, Int>::arange(0..6, device);

    // Random uniform draws in [0, 1)
    let random = Tensor::<B, 2>::random([4, 4], Distribution::Uniform(0.0, 1.0), device);
    let max: f32 = random.clone().max().into_scalar().elem();
    let min: f32 = random.clone().min().into_scalar().elem();

    CreationReport {
        from_literal:            literal.into_data().to_vec().unwrap_or_default(),
        zeros_shape:             zeros.dims(),
        ones_sum:                ones.sum().into_scalar().elem(),
        fill_value:              full.slice([0..1, 0..1]).into_scalar().elem(),
        arange:                  arange.into_data().convert::<i64>().to_vec().unwrap_or_default(),
        random_shape:            random.dims(),
        random_in_unit_interval: (0.0..1.0).contains(&min) && (0.0..1.0).contains(&max),
    }
}

// ─── Arithmetic ───────────────────────────────────────────────────────────────

/// Results of the arithmetic demo over two fixed 2×2 matrices:
///   a = [[1, 2], [3, 4]]   b = [[5, 6], [7, 8]]
#[derive(Debug, Clone)]
pub struct ArithmeticReport {
    /// a + b, element-wise
    pub sum: Vec<f32>,

    /// a - b, element-wise
    pub difference: Vec<f32>,

    /// a * b, element-wise (NOT matrix multiplication)
    pub elementwise_product: Vec<f32>,

    /// a * 10, scalar broadcast
    pub scaled: Vec<f32>,

    /// a @ b, actual matrix multiplication
    pub matmul: Vec<f32>,

    /// Sum of every element of a
    pub total: f32,

    /// Mean of every element of a
    pub mean: f32,
}

/// Element-wise ops, scalar broadcast, matmul, reductions.
pub fn arithmetic_demo<B: Backend>(device: &B::Device) -> ArithmeticReport {
    let a = Tensor::<B, 2>::from_floats([[1.0, 2.0], [3.0, 4.0]], device);
    let b = Tensor::<B, 2>::from_floats([[5.0, 6.0], [7.0, 8.0]], device);

    // Operators are overloaded for element-wise math; matmul is
    // an explicit method because the two are easy to confuse
    let sum     = a.clone() + b.clone();
    let diff    = a.clone() - b.clone();
    let product = a.clone() * b.clone();
    let scaled  = a.clone().mul_scalar(10.0);
    let matmul  = a.clone().matmul(b);

    ArithmeticReport {
        sum:                 sum.into_data().to_vec().unwrap_or_default(),
        difference:          diff.into_data().to_vec().unwrap_or_default(),
        elementwise_product: product.into_data().to_vec().unwrap_or_default(),
        scaled:              scaled.into_data().to_vec().unwrap_or_default(),
        matmul:              matmul.into_data().to_vec().unwrap_or_default(),
        total:               a.clone().sum().into_scalar().elem(),
        mean:                a.mean().into_scalar().elem(),
    }
}

// ─── Shapes ───────────────────────────────────────────────────────────────────

/// Results of reshaping, transposing, slicing and flattening
/// an arange(0..12) tensor.
#[derive(Debug, Clone)]
pub struct ShapeReport {
    /// arange(0..12) reshaped to [3, 4]
    pub reshaped: [usize; 2],

    /// ... then transposed to [4, 3]
    pub transposed: [usize; 2],

    /// Row 1 of the [3, 4] view: [4, 5, 6, 7]
    pub row_one: Vec<f32>,

    /// Flattened back to rank 1, length 12
    pub flattened_len: usize,
}

/// The same 12 values wearing four different shapes.
pub fn shapes_demo<B: Backend>(device: &B::Device) -> ShapeReport {
    let flat = Tensor::<B, 1, Int>::arange(0..12, device).float();

    // reshape shuffles nothing — it reinterprets the same
    // 12 values as 3 rows of 4
    let grid: Tensor<B, 2> = flat.reshape([3, 4]);

    let transposed = grid.clone().transpose();
    let row_one    = grid.clone().slice([1..2, 0..4]).reshape([4]);
    let flattened: Tensor<B, 1> = grid.clone().flatten(0, 1);

    ShapeReport {
        reshaped:      grid.dims(),
        transposed:    transposed.dims(),
        row_one:       row_one.into_data().to_vec().unwrap_or_default(),
        flattened_len: flattened.dims()[0],
    }
}

// ─── Devices ──────────────────────────────────────────────────────────────────

/// Results of the device-placement demo.
#[derive(Debug, Clone)]
pub struct DeviceReport {
    /// The backend in use (compile-time choice)
    pub backend: String,

    /// Debug rendering of the device the tensor lives on
    pub device: String,

    /// The values after a round trip through to_device — they
    /// must survive the move unchanged
    pub values_after_move: Vec<f32>,
}

/// Show where tensors live and move one explicitly. On a
/// single-device backend the move is a no-op, but the calls are
/// exactly what multi-GPU code writes.
pub fn device_demo<B: Backend>(device: &B::Device) -> DeviceReport {
    let t = Tensor::<B, 1>::from_floats([1.0, 2.0, 3.0], device);

    // .device() tells you where a tensor currently lives
    let home = t.device();

    // .to_device() moves it; here the target is the same device
    let moved = t.to_device(device);

    DeviceReport {
        backend:           B::name(),
        device:            format!("{home:?}"),
        values_after_move: moved.into_data().to_vec().unwrap_or_default(),
    }
}
