use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Hyperparams, Network, Result, Topology};

/// Serializable description of a network, e.g. loaded from a JSON file.
///
/// ```json
/// {
///     "layer_sizes": [2, 2, 1],
///     "activations": ["tanh", "sigmoid"],
///     "epochs": 5000,
///     "learning_rate": 0.1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Input width first, output width last.
    pub layer_sizes: Vec<usize>,
    /// One activation identifier per layer.
    pub activations: Vec<String>,
    pub epochs: usize,
    pub learning_rate: f64,
}

impl NetworkConfig {
    pub fn topology(&self) -> Result<Topology> {
        Topology::from_sizes(&self.layer_sizes, self.activations.as_slice())
    }

    pub fn hyperparams(&self) -> Result<Hyperparams> {
        Hyperparams::new(self.learning_rate, self.epochs)
    }

    /// Checks everything `build` would, without drawing any parameters.
    pub fn validate(&self) -> Result<()> {
        self.topology()?;
        self.hyperparams()?;
        Ok(())
    }

    pub fn build(&self, rng: &mut impl Rng) -> Result<Network> {
        Ok(Network::new(self.topology()?, self.hyperparams()?, rng))
    }
}

impl From<&Network> for NetworkConfig {
    fn from(nn: &Network) -> Self {
        Self {
            layer_sizes: nn.topology().sizes(),
            activations: nn
                .topology()
                .layer_descriptions()
                .iter()
                .map(|layer| layer.phi.name().to_owned())
                .collect(),
            epochs: nn.epochs(),
            learning_rate: nn.learning_rate(),
        }
    }
}
