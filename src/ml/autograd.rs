// ============================================================
// Layer 5 — Automatic Differentiation
// ============================================================
// Stage two of the walkthrough: gradients, computed by the
// framework instead of by hand.
//
// The mechanics in Burn:
//   1. Pick an Autodiff backend (Autodiff<NdArray> etc.)
//   2. Mark the tensors you want gradients FOR with
//      .require_grad() — these are the leaves
//   3. Compute anything from them
//   4. Call .backward() on a one-element result
//   5. Read each leaf's gradient with .grad(&grads)
//
// Gradients come back on the INNER backend (plain numbers, no
// further tracking), which is also why the manual update step
// below goes through .inner() and from_inner(): subtract the
// scaled gradient outside the graph, then re-enter the graph
// with a fresh .require_grad().
//
// Two demos:
//   - leaf_gradients: y = sum(x·w + b), checked against the
//     hand-derived result (dy/dw = column sums of x, dy/db = n)
//   - fit_line: gradient descent fits y = 2x + 1 from scratch,
//     the smallest possible "training loop" with no optimiser,
//     no modules, just tensors
//
// Reference: Burn Book §3 (Autodiff)

use anyhow::{Context, Result};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;

// ─── Leaf Gradients ───────────────────────────────────────────────────────────

/// Computed and expected gradients for the fixed example.
#[derive(Debug, Clone)]
pub struct GradientReport {
    /// dy/dw as the framework computed it
    pub grad_w: Vec<f32>,

    /// dy/dw derived by hand: column sums of x
    pub expected_grad_w: Vec<f32>,

    /// dy/db as the framework computed it
    pub grad_b: Vec<f32>,

    /// dy/db derived by hand: the number of rows
    pub expected_grad_b: Vec<f32>,

    /// The forward value y itself
    pub y: f32,
}

/// Differentiate y = sum(x·w + b) with respect to w and b.
///
/// With x fixed at [[1,2],[3,4],[5,6]]:
///   dy/dw = Σ_rows x = [9, 12]
///   dy/db = number of rows = [3]
pub fn leaf_gradients<B: AutodiffBackend>(device: &B::Device) -> Result<GradientReport> {
    // x is data — no gradient needed for it
    let x = Tensor::<B, 2>::from_floats([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]], device);

    // w and b are the leaves we differentiate with respect to
    let w = Tensor::<B, 1>::from_floats([0.5, -1.0], device).require_grad();
    let b = Tensor::<B, 1>::from_floats([0.25], device).require_grad();

    // y = sum(x @ w + b), a single number
    let z = x.matmul(w.clone().reshape([2, 1]));
    let y = (z + b.clone().unsqueeze::<2>()).sum();
    let y_val: f32 = y.clone().into_scalar().elem();

    // backward() walks the recorded graph once and fills in a
    // gradient for every require_grad leaf it reaches
    let grads = y.backward();

    let grad_w = w
        .grad(&grads)
        .context("no gradient recorded for w")?;
    let grad_b = b
        .grad(&grads)
        .context("no gradient recorded for b")?;

    Ok(GradientReport {
        grad_w:          grad_w.into_data().to_vec().unwrap_or_default(),
        expected_grad_w: vec![9.0, 12.0],
        grad_b:          grad_b.into_data().to_vec().unwrap_or_default(),
        expected_grad_b: vec![3.0],
        y:               y_val,
    })
}

// ─── Gradient-Descent Line Fit ────────────────────────────────────────────────

/// Outcome of fitting y = w·x + b to data generated from
/// y = 2x + 1.
#[derive(Debug, Clone)]
pub struct FitReport {
    /// Fitted slope — should approach 2.0
    pub w: f32,

    /// Fitted intercept — should approach 1.0
    pub b: f32,

    /// Mean squared error at the final step
    pub final_loss: f32,

    /// How many update steps ran
    pub steps: usize,
}

/// Fit a line by bare gradient descent.
///
/// Each step:
///   loss  = mean((w·x + b − y)²)
///   w    ← w − lr · dloss/dw
///   b    ← b − lr · dloss/db
///
/// The data is noiseless, so with enough steps the parameters
/// converge onto 2 and 1 almost exactly.
pub fn fit_line<B: AutodiffBackend>(device: &B::Device, steps: usize, lr: f64) -> Result<FitReport> {
    let xs = Tensor::<B, 1>::from_floats(
        [-2.0, -1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5, 2.0],
        device,
    );
    // Ground truth: y = 2x + 1
    let ys = xs.clone().mul_scalar(2.0).add_scalar(1.0);

    let mut w = Tensor::<B, 1>::from_floats([0.0], device).require_grad();
    let mut b = Tensor::<B, 1>::from_floats([0.0], device).require_grad();
    let mut final_loss = f32::NAN;

    for _ in 0..steps {
        // Size-1 tensors broadcast across the 9 data points
        let pred = xs.clone() * w.clone() + b.clone();
        let diff = pred - ys.clone();
        let loss = (diff.clone() * diff).mean();
        final_loss = loss.clone().into_scalar().elem();

        let grads  = loss.backward();
        let grad_w = w.grad(&grads).context("no gradient recorded for w")?;
        let grad_b = b.grad(&grads).context("no gradient recorded for b")?;

        // Update OUTSIDE the graph, then rejoin it. Without the
        // .inner()/from_inner() dance the update itself would be
        // recorded and differentiated next step.
        w = Tensor::from_inner(w.inner() - grad_w.mul_scalar(lr)).require_grad();
        b = Tensor::from_inner(b.inner() - grad_b.mul_scalar(lr)).require_grad();
    }

    Ok(FitReport {
        w: w.into_scalar().elem(),
        b: b.into_scalar().elem(),
        final_loss,
        steps,
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    #[test]
    fn test_leaf_gradients_match_hand_derivation() {
        let report = leaf_gradients::<TestBackend>(&Default::default()).unwrap();
        assert_eq!(report.grad_w, report.expected_grad_w);
        assert_eq!(report.grad_b, report.expected_grad_b);
    }

    #[test]
    fn test_forward_value() {
        // y = sum(x @ [0.5, -1]ᵀ + 0.25)
        //   = (0.5−2) + (1.5−4) + (2.5−6) + 3·0.25 = −7.25
        let report = leaf_gradients::<TestBackend>(&Default::default()).unwrap();
        assert!((report.y + 7.25).abs() < 1e-5);
    }

    #[test]
    fn test_line_fit_converges() {
        let report = fit_line::<TestBackend>(&Default::default(), 200, 0.1).unwrap();
        assert!((report.w - 2.0).abs() < 0.01, "w was {}", report.w);
        assert!((report.b - 1.0).abs() < 0.01, "b was {}", report.b);
        assert!(report.final_loss < 1e-3);
    }

    #[test]
    fn test_zero_steps_keeps_initial_parameters() {
        let report = fit_line::<TestBackend>(&Default::default(), 0, 0.1).unwrap();
        assert_eq!(report.w, 0.0);
        assert_eq!(report.b, 0.0);
        assert!(report.final_loss.is_nan());
    }
}
