use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),
}

/// The network description itself is invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("expected one activation per layer ({n_layers}), got {n_activations}")]
    ActivationCountMismatch {
        n_layers: usize,
        n_activations: usize,
    },
    #[error("unknown activation function {0:?}")]
    UnknownActivation(String),
    #[error("need at least 2 layer sizes (input and output), got {0}")]
    TooFewLayers(usize),
    #[error("layer size #{index} is zero")]
    ZeroWidth { index: usize },
    #[error("learning rate must be positive and finite, got {0}")]
    InvalidLearningRate(f64),
    #[error("number of epochs must be positive")]
    ZeroEpochs,
}

/// A sample does not fit the network it was handed to.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("{what} has width {actual}, network expects {expected}")]
    WidthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("got {n_inputs} inputs but {n_targets} targets")]
    SampleCountMismatch { n_inputs: usize, n_targets: usize },
}

pub(crate) fn check_width(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ShapeError::WidthMismatch {
            what,
            expected,
            actual,
        }
        .into())
    }
}
