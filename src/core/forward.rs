use faer::{linalg::matmul::matmul, prelude::*};

use crate::core::Layer;

impl Layer {
    /// `output = phi(input · weight + bias)`, caching both `input` and `output` for
    /// `back_propagate`.
    ///
    /// `input` must be `1 × n_previous`; the owning network checks this.
    pub(crate) fn forward(&mut self, input: MatRef<'_, f64>) -> MatRef<'_, f64> {
        debug_assert_eq!(input.nrows(), 1);
        debug_assert_eq!(input.ncols(), self.n_previous);
        for g in 0..self.n_previous {
            self.input[(0, g)] = input[(0, g)];
        }
        affine(
            self.output.as_mut(),
            self.input.as_ref(),
            self.weight.as_ref(),
            self.bias.as_ref(),
        );
        self.phi.apply_in_place(self.output.as_mut());
        self.output.as_ref()
    }

    /// Same as `forward` but writes into a fresh buffer, leaving the caches alone.
    pub(crate) fn predict(&self, input: MatRef<'_, f64>) -> Mat<f64> {
        debug_assert_eq!(input.ncols(), self.n_previous);
        let mut output = Mat::zeros(1, self.n);
        affine(
            output.as_mut(),
            input,
            self.weight.as_ref(),
            self.bias.as_ref(),
        );
        self.phi.apply_in_place(output.as_mut());
        output
    }
}

/// `z = a_prev · W + b`
fn affine(mut z: MatMut<'_, f64>, a_prev: MatRef<'_, f64>, w: MatRef<'_, f64>, b: MatRef<'_, f64>) {
    matmul(
        // A = α*L*R + β*A
        z.rb_mut(),           // A = z
        faer::Accum::Replace, // β = 0.0
        a_prev,               // L = a_prev
        w,                    // R = W
        1.0,                  // α = 1.0
        Par::Seq,
    );
    for k in 0..b.ncols() {
        z[(0, k)] += b[(0, k)];
    }
}
