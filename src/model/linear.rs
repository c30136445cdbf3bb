//! Dense affine layer shared by the segment classifiers.

use crate::error::Result;
use crate::model::state::StateDict;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::Rng;

/// `y = x · w + b` with `w` of shape (in_dim, out_dim).
#[derive(Debug, Clone)]
pub struct Linear {
    w: Array2<f32>,
    b: Array1<f32>,
}

impl Linear {
    /// Uniform init scaled by fan-in, matching the training pipeline's
    /// default initializer.
    pub fn new(in_dim: usize, out_dim: usize, rng: &mut StdRng) -> Self {
        let bound = 1.0 / (in_dim as f32).sqrt();
        let w = Array2::from_shape_fn((in_dim, out_dim), |_| rng.random_range(-bound..bound));
        let b = Array1::from_shape_fn(out_dim, |_| rng.random_range(-bound..bound));
        Self { w, b }
    }

    pub fn in_dim(&self) -> usize {
        self.w.nrows()
    }

    pub fn out_dim(&self) -> usize {
        self.w.ncols()
    }

    /// Apply to a batch of row vectors: (n, in_dim) -> (n, out_dim).
    pub fn forward(&self, x: &Array2<f32>) -> Array2<f32> {
        x.dot(&self.w) + &self.b
    }

    /// Append this layer's parameters under `prefix` (`.weight`, `.bias`).
    pub fn write_state(&self, prefix: &str, state: &mut StateDict) {
        state.push(
            format!("{prefix}.weight"),
            vec![self.in_dim(), self.out_dim()],
            self.w.as_slice().expect("weights are standard layout"),
        );
        state.push(
            format!("{prefix}.bias"),
            vec![self.out_dim()],
            self.b.as_slice().expect("bias is contiguous"),
        );
    }

    /// Replace this layer's parameters from `prefix` entries, enforcing the
    /// constructed dimensions.
    pub fn read_state(&mut self, prefix: &str, state: &StateDict) -> Result<()> {
        let (rows, cols) = (self.in_dim(), self.out_dim());
        self.w = state.array2(&format!("{prefix}.weight"), rows, cols)?;
        self.b = state.array1(&format!("{prefix}.bias"), cols)?;
        Ok(())
    }
}

/// Concatenate matrices with equal row counts along the column axis.
pub(crate) fn hstack(parts: &[ndarray::ArrayView2<'_, f32>]) -> Array2<f32> {
    ndarray::concatenate(ndarray::Axis(1), parts).expect("parts share the row count")
}

/// Elementwise logistic function.
pub fn sigmoid(x: &Array2<f32>) -> Array2<f32> {
    x.mapv(|v| 1.0 / (1.0 + (-v).exp()))
}

/// Elementwise hyperbolic tangent.
pub fn tanh(x: &Array2<f32>) -> Array2<f32> {
    x.mapv(f32::tanh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ndarray::array;
    use rand::SeedableRng;

    #[test]
    fn test_forward_affine() {
        let mut layer = Linear::new(2, 1, &mut StdRng::seed_from_u64(42));
        let mut state = StateDict::new();
        state.push("l.weight", vec![2, 1], &[2.0, 3.0]);
        state.push("l.bias", vec![1], &[1.0]);
        layer.read_state("l", &state).expect("load");

        let x = array![[1.0, 1.0], [0.0, 2.0]];
        let y = layer.forward(&x);
        assert_eq!(y, array![[6.0], [7.0]]);
    }

    #[test]
    fn test_state_round_trip() {
        let mut rng = StdRng::seed_from_u64(42);
        let layer = Linear::new(3, 4, &mut rng);

        let mut state = StateDict::new();
        layer.write_state("layer", &mut state);

        let mut other = Linear::new(3, 4, &mut StdRng::seed_from_u64(7));
        other.read_state("layer", &state).expect("load");
        assert_eq!(other.w, layer.w);
        assert_eq!(other.b, layer.b);
    }

    #[test]
    fn test_read_state_shape_mismatch() {
        let mut layer = Linear::new(3, 4, &mut StdRng::seed_from_u64(42));
        let mut state = StateDict::new();
        state.push("layer.weight", vec![4, 3], &[0.0; 12]);
        state.push("layer.bias", vec![4], &[0.0; 4]);
        assert!(matches!(
            layer.read_state("layer", &state),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_init_bounded_by_fan_in() {
        let layer = Linear::new(16, 8, &mut StdRng::seed_from_u64(42));
        let bound = 1.0 / 4.0;
        assert!(layer.w.iter().all(|v| v.abs() <= bound));
        assert!(layer.b.iter().all(|v| v.abs() <= bound));
    }

    #[test]
    fn test_sigmoid_range() {
        let x = array![[-100.0, 0.0, 100.0]];
        let s = sigmoid(&x);
        assert!(s[(0, 0)] < 1e-6);
        assert!((s[(0, 1)] - 0.5).abs() < 1e-6);
        assert!(s[(0, 2)] > 1.0 - 1e-6);
    }
}
