use std::fmt::{self, Debug};

use derive_more::Display;
use faer::prelude::*;

use crate::{ConfigError, activation_functions::*};

/// Entry of the activation registry: a name plus the forward function and its derivative.
#[derive(Clone, Copy, Display)]
#[display("{name}")]
pub struct DynActivationFunction {
    name: &'static str,
    apply: fn(f64) -> f64,
    deriv: fn(f64) -> f64,
}

impl Debug for DynActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Debug::fmt(self.name, f)
    }
}

impl PartialEq for DynActivationFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for DynActivationFunction {}

impl DynActivationFunction {
    pub(crate) fn new<Phi: ActivationFunction>(_: Phi) -> Self {
        Self {
            name: Phi::NAME,
            apply: Phi::apply,
            deriv: Phi::deriv,
        }
    }

    /// Every activation function a network may be built with.
    pub fn registry() -> [Self; 4] {
        [
            Self::new(Tanh),
            Self::new(Sigmoid),
            Self::new(Relu),
            Self::new(LeakyRelu),
        ]
    }

    /// Looks up a registered activation function by its identifier.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::registry()
            .into_iter()
            .find(|phi| phi.name == name)
            .ok_or_else(|| ConfigError::UnknownActivation(name.to_owned()))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_registered(&self) -> bool {
        Self::from_name(self.name).is_ok()
    }

    pub fn apply(&self, x: f64) -> f64 {
        (self.apply)(x)
    }

    /// Derivative at the point whose activation output is `y`.
    pub fn deriv(&self, y: f64) -> f64 {
        (self.deriv)(y)
    }

    /// Applies the function to every element of `x`.
    pub fn apply_in_place(&self, mut x: MatMut<'_, f64>) {
        for j in 0..x.ncols() {
            for i in 0..x.nrows() {
                x[(i, j)] = self.apply(x[(i, j)]);
            }
        }
    }

    /// Element-wise derivative of a matrix of activation outputs.
    pub fn deriv_of_output(&self, y: MatRef<'_, f64>) -> Mat<f64> {
        Mat::from_fn(y.nrows(), y.ncols(), |i, j| self.deriv(y[(i, j)]))
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Implemented only by the registered activation functions in [`activation_functions`].
///
/// ```compile_fail
/// use snn::ActivationFunction;
///
/// struct Swish;
/// impl ActivationFunction for Swish {
///     const NAME: &'static str = "swish";
///     fn apply(x: f64) -> f64 { x / (1.0 + f64::exp(-x)) }
///     fn deriv(y: f64) -> f64 { y }
/// }
/// ```
pub trait ActivationFunction: sealed::Sealed + Send + Sync + 'static {
    const NAME: &'static str;

    fn apply(x: f64) -> f64;

    /// Expressed in terms of the output `y = apply(x)`, since that is what layers cache.
    fn deriv(y: f64) -> f64;
}

/// Slope of `leaky` for negative inputs.
pub const LEAKY_RELU_SLOPE: f64 = 0.01;

pub mod activation_functions {
    use super::{ActivationFunction, LEAKY_RELU_SLOPE, sealed::Sealed};

    impl Sealed for Tanh {}
    impl Sealed for Sigmoid {}
    impl Sealed for Relu {}
    impl Sealed for LeakyRelu {}

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Tanh;
    impl ActivationFunction for Tanh {
        const NAME: &'static str = "tanh";

        fn apply(x: f64) -> f64 {
            f64::tanh(x)
        }

        fn deriv(y: f64) -> f64 {
            1.0 - y * y
        }
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Sigmoid;
    impl ActivationFunction for Sigmoid {
        const NAME: &'static str = "sigmoid";

        fn apply(x: f64) -> f64 {
            1.0 / (1.0 + f64::exp(-x))
        }

        fn deriv(y: f64) -> f64 {
            y * (1.0 - y)
        }
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Relu;
    impl ActivationFunction for Relu {
        const NAME: &'static str = "relu";

        fn apply(x: f64) -> f64 {
            if x > 0.0 { x } else { 0.0 }
        }

        fn deriv(y: f64) -> f64 {
            if y > 0.0 { 1.0 } else { 0.0 }
        }
    }

    /// `y` keeps the sign of `x`, so the derivative can be read off the output.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct LeakyRelu;
    impl ActivationFunction for LeakyRelu {
        const NAME: &'static str = "leaky";

        fn apply(x: f64) -> f64 {
            if x > 0.0 { x } else { LEAKY_RELU_SLOPE * x }
        }

        fn deriv(y: f64) -> f64 {
            if y > 0.0 { 1.0 } else { LEAKY_RELU_SLOPE }
        }
    }
}
