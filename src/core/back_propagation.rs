use faer::{linalg::matmul::matmul, prelude::*};

use crate::core::Layer;

impl Layer {
    /// Computes this layer's gradients from the injected `error` and the cached `input` and
    /// `output` of the most recent forward pass.
    ///
    /// Returns the error to inject into the previous layer (`1 × n_previous`).
    pub(crate) fn back_propagate(&mut self) -> Mat<f64> {
        // delta = phi'(a) ⊙ e
        let mut delta = self.phi.deriv_of_output(self.output.as_ref());
        for k in 0..self.n {
            delta[(0, k)] *= self.error[(0, k)];
        }
        // db = delta
        for k in 0..self.n {
            self.bias_grad[(0, k)] = delta[(0, k)];
        }
        // dW = a_prevᵗ · delta
        matmul(
            self.weight_grad.as_mut(),
            faer::Accum::Replace,
            self.input.as_ref().transpose(),
            delta.as_ref(),
            1.0,
            Par::Seq,
        );
        // e_prev = delta · Wᵗ
        let mut error_prev = Mat::zeros(1, self.n_previous);
        matmul(
            error_prev.as_mut(),
            faer::Accum::Replace,
            delta.as_ref(),
            self.weight.as_ref().transpose(),
            1.0,
            Par::Seq,
        );
        error_prev
    }

    /// `W -= eta * dW; b -= eta * db`
    pub(crate) fn apply_derivs(&mut self, eta: f64) {
        for k in 0..self.n {
            for g in 0..self.n_previous {
                self.weight[(g, k)] -= eta * self.weight_grad[(g, k)];
            }
            self.bias[(0, k)] -= eta * self.bias_grad[(0, k)];
        }
    }
}
