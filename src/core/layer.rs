use faer::prelude::*;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::{DynActivationFunction, PrettyPrintDerivs, PrettyPrintParams};

/// One fully-connected unit: `output = phi(input · weight + bias)`.
///
/// Every buffer has a single writer:
///
/// - `weight`, `bias`: written by construction, `randomize` and `apply_derivs`
/// - `input`, `output`: written by `forward`, read by `back_propagate`
/// - `error`: written by the owning network before `back_propagate`
/// - `weight_grad`, `bias_grad`: overwritten by `back_propagate`, read by `apply_derivs`
#[derive(Debug, Clone)]
pub struct Layer {
    /// Number of neurons in the previous layer.
    pub(crate) n_previous: usize,
    /// Number of neurons in this layer.
    pub(crate) n: usize,
    pub(crate) phi: DynActivationFunction,
    /// `n_previous × n`.
    pub(crate) weight: Mat<f64>,
    /// `1 × n`.
    pub(crate) bias: Mat<f64>,
    pub(crate) weight_grad: Mat<f64>,
    pub(crate) bias_grad: Mat<f64>,
    /// `1 × n_previous`, the most recent forward input.
    pub(crate) input: Mat<f64>,
    /// `1 × n`, the most recent forward output.
    pub(crate) output: Mat<f64>,
    /// `1 × n`, the error signal injected before back propagation.
    pub(crate) error: Mat<f64>,
}

impl Layer {
    /// Creates a layer with standard normal weights and biases and zeroed scratch buffers.
    pub fn new(
        n_previous: usize,
        n: usize,
        phi: DynActivationFunction,
        rng: &mut impl Rng,
    ) -> Self {
        let mut layer = Self {
            n_previous,
            n,
            phi,
            weight: Mat::zeros(n_previous, n),
            bias: Mat::zeros(1, n),
            weight_grad: Mat::zeros(n_previous, n),
            bias_grad: Mat::zeros(1, n),
            input: Mat::zeros(1, n_previous),
            output: Mat::zeros(1, n),
            error: Mat::zeros(1, n),
        };
        layer.randomize(rng);
        layer
    }

    /// Redraws every weight and bias from the standard normal distribution.
    pub fn randomize(&mut self, rng: &mut impl Rng) {
        for k in 0..self.n {
            for g in 0..self.n_previous {
                self.weight[(g, k)] = rng.sample(StandardNormal);
            }
        }
        for k in 0..self.n {
            self.bias[(0, k)] = rng.sample(StandardNormal);
        }
    }

    pub fn n_inputs(&self) -> usize {
        self.n_previous
    }

    pub fn n_outputs(&self) -> usize {
        self.n
    }

    pub fn activation(&self) -> DynActivationFunction {
        self.phi
    }

    pub fn weight(&self) -> MatRef<'_, f64> {
        self.weight.as_ref()
    }

    pub fn bias(&self) -> MatRef<'_, f64> {
        self.bias.as_ref()
    }

    pub fn weight_grad(&self) -> MatRef<'_, f64> {
        self.weight_grad.as_ref()
    }

    pub fn bias_grad(&self) -> MatRef<'_, f64> {
        self.bias_grad.as_ref()
    }

    pub fn input(&self) -> MatRef<'_, f64> {
        self.input.as_ref()
    }

    pub fn output(&self) -> MatRef<'_, f64> {
        self.output.as_ref()
    }

    pub fn error(&self) -> MatRef<'_, f64> {
        self.error.as_ref()
    }

    /// Number of trainable scalars.
    pub fn n_params(&self) -> usize {
        self.n_previous * self.n + self.n
    }

    pub fn pretty_print_params(&self, index: usize) -> PrettyPrintParams<'_> {
        PrettyPrintParams::new(index, self)
    }

    pub fn pretty_print_derivs(&self, index: usize) -> PrettyPrintDerivs<'_> {
        PrettyPrintDerivs::new(index, self)
    }
}
