use faer::prelude::*;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    ActivationFunction, ConfigError, DynActivationFunction, Result, ShapeError, core::Layer,
    error::check_width,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    n_inputs: usize,
    layer_descriptions: Vec<LayerDescription>,
}

impl Topology {
    pub fn new(n_inputs: usize, layer_descriptions: Vec<LayerDescription>) -> Result<Self> {
        if layer_descriptions.is_empty() {
            return Err(ConfigError::TooFewLayers(1).into());
        }
        if n_inputs == 0 {
            return Err(ConfigError::ZeroWidth { index: 0 }.into());
        }
        if let Some(u) = layer_descriptions.iter().position(|l| l.n_neurons == 0) {
            return Err(ConfigError::ZeroWidth { index: u + 1 }.into());
        }
        if let Some(l) = layer_descriptions.iter().find(|l| !l.phi.is_registered()) {
            return Err(ConfigError::UnknownActivation(l.phi.name().to_owned()).into());
        }
        Ok(Self {
            n_inputs,
            layer_descriptions,
        })
    }

    /// Builds a topology from a chain of sizes (input width first, output width last) and one
    /// activation identifier per layer.
    ///
    /// The activation count is checked before anything else.
    pub fn from_sizes(sizes: &[usize], activations: &[impl AsRef<str>]) -> Result<Self> {
        let n_layers = sizes.len().saturating_sub(1);
        if activations.len() != n_layers {
            return Err(ConfigError::ActivationCountMismatch {
                n_layers,
                n_activations: activations.len(),
            }
            .into());
        }
        if sizes.len() < 2 {
            return Err(ConfigError::TooFewLayers(sizes.len()).into());
        }
        let layer_descriptions = std::iter::zip(&sizes[1..], activations)
            .map(|(&n_neurons, name)| {
                let phi = DynActivationFunction::from_name(name.as_ref())?;
                Ok(LayerDescription { n_neurons, phi })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(sizes[0], layer_descriptions)
    }

    pub fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    pub fn n_outputs(&self) -> usize {
        self.layer_descriptions()
            .last()
            .map_or(self.n_inputs, |last_layer| last_layer.n_neurons)
    }

    pub fn layer_descriptions(&self) -> &[LayerDescription] {
        &self.layer_descriptions
    }

    pub fn n_layers(&self) -> usize {
        self.layer_descriptions().len()
    }

    /// Input width followed by every layer's width.
    pub fn sizes(&self) -> Vec<usize> {
        std::iter::once(self.n_inputs)
            .chain(self.layer_descriptions.iter().map(|l| l.n_neurons))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerDescription {
    pub n_neurons: usize,
    pub phi: DynActivationFunction,
}

impl LayerDescription {
    pub fn new(n_neurons: usize, phi: impl ActivationFunction) -> Self {
        Self {
            n_neurons,
            phi: DynActivationFunction::new(phi),
        }
    }
}

/// Training settings carried by a network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperparams {
    learning_rate: f64,
    epochs: usize,
}

impl Hyperparams {
    pub fn new(learning_rate: f64, epochs: usize) -> Result<Self> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(ConfigError::InvalidLearningRate(learning_rate).into());
        }
        if epochs == 0 {
            return Err(ConfigError::ZeroEpochs.into());
        }
        Ok(Self {
            learning_rate,
            epochs,
        })
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Not used by forward or backward; read by training loops such as `Gym::train`.
    pub fn epochs(&self) -> usize {
        self.epochs
    }
}

/// A chain of dense layers trained by online gradient descent.
#[derive(Debug, Clone)]
pub struct Network {
    topology: Topology,
    hyperparams: Hyperparams,
    layers: Vec<Layer>,
    /// `1 × n_inputs`, the most recent sample.
    input: Mat<f64>,
    /// `1 × n_outputs`, the most recent result.
    output: Mat<f64>,
    /// `1 × n_outputs`, `output - target` of the most recent backward sample.
    error: Mat<f64>,
}

impl Network {
    pub fn new(topology: Topology, hyperparams: Hyperparams, rng: &mut impl Rng) -> Self {
        let mut n_previous = topology.n_inputs();
        let mut layers = Vec::with_capacity(topology.n_layers());
        for layer_description in topology.layer_descriptions() {
            let n = layer_description.n_neurons;
            layers.push(Layer::new(n_previous, n, layer_description.phi, rng));
            n_previous = n;
        }
        debug!(
            sizes = ?topology.sizes(),
            activations = ?topology.layer_descriptions().iter().map(|l| l.phi.name()).collect::<Vec<_>>(),
            learning_rate = hyperparams.learning_rate(),
            epochs = hyperparams.epochs(),
            "created network"
        );
        Self {
            input: Mat::zeros(1, topology.n_inputs()),
            output: Mat::zeros(1, topology.n_outputs()),
            error: Mat::zeros(1, topology.n_outputs()),
            topology,
            hyperparams,
            layers,
        }
    }

    /// Builds a network from a chain of layer sizes and one activation identifier per layer.
    ///
    /// Fails with a configuration error before allocating any layer if
    /// `activations.len() != sizes.len() - 1` or an identifier is unknown.
    pub fn construct(
        sizes: &[usize],
        activations: &[impl AsRef<str>],
        epochs: usize,
        learning_rate: f64,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        let topology = Topology::from_sizes(sizes, activations)?;
        let hyperparams = Hyperparams::new(learning_rate, epochs)?;
        Ok(Self::new(topology, hyperparams, rng))
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn hyperparams(&self) -> Hyperparams {
        self.hyperparams
    }

    pub fn n_inputs(&self) -> usize {
        self.topology.n_inputs()
    }

    pub fn n_outputs(&self) -> usize {
        self.topology.n_outputs()
    }

    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn learning_rate(&self) -> f64 {
        self.hyperparams.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<()> {
        self.hyperparams = Hyperparams::new(learning_rate, self.hyperparams.epochs)?;
        Ok(())
    }

    pub fn epochs(&self) -> usize {
        self.hyperparams.epochs
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Mutable views of a layer's `(weight, bias)`, e.g. for loading trained parameters.
    /// Returns `None` if `index` is out of range.
    pub fn params_layer_mut(
        &mut self,
        index: usize,
    ) -> Option<(MatMut<'_, f64>, MatMut<'_, f64>)> {
        self.layers
            .get_mut(index)
            .map(|layer| (layer.weight.as_mut(), layer.bias.as_mut()))
    }

    pub fn input_buffer(&self) -> MatRef<'_, f64> {
        self.input.as_ref()
    }

    pub fn output_buffer(&self) -> MatRef<'_, f64> {
        self.output.as_ref()
    }

    pub fn error_buffer(&self) -> MatRef<'_, f64> {
        self.error.as_ref()
    }

    pub fn n_params(&self) -> usize {
        self.layers.iter().map(Layer::n_params).sum()
    }

    pub fn randomize_params(&mut self, rng: &mut impl Rng) {
        for layer in &mut self.layers {
            layer.randomize(rng);
        }
    }

    /// Forward propagates every sample, returning one output per sample.
    ///
    /// All widths are checked before the first sample is propagated.
    pub fn forward(&mut self, samples: &[impl AsRef<[f64]>]) -> Result<Vec<Vec<f64>>> {
        for x in samples {
            check_width("input", self.n_inputs(), x.as_ref().len())?;
        }
        samples
            .iter()
            .map(|x| self.forward_sample(x.as_ref()))
            .collect()
    }

    /// Forward propagates one sample, refreshing every layer's `input`/`output` cache.
    pub fn forward_sample(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        check_width("input", self.n_inputs(), x.len())?;
        self.propagate(x);
        Ok(row_to_vec(self.output.as_ref()))
    }

    fn propagate(&mut self, x: &[f64]) {
        for (j, &x_j) in x.iter().enumerate() {
            self.input[(0, j)] = x_j;
        }
        let mut a = self.input.clone();
        for layer in &mut self.layers {
            a = layer.forward(a.as_ref()).to_owned();
        }
        self.output = a;
    }

    /// Pure forward pass: touches neither the layer caches nor the network buffers.
    pub fn predict(&self, x: &[f64]) -> Result<Vec<f64>> {
        check_width("input", self.n_inputs(), x.len())?;
        let mut a = row_from_slice(x);
        for layer in &self.layers {
            a = layer.predict(a.as_ref());
        }
        Ok(row_to_vec(a.as_ref()))
    }

    /// One online gradient descent step per sample, in order.
    ///
    /// Every width is checked up front, so on error no parameter has been touched.
    pub fn backward(
        &mut self,
        inputs: &[impl AsRef<[f64]>],
        targets: &[impl AsRef<[f64]>],
    ) -> Result<()> {
        self.check_samples(inputs, targets)?;
        for (x, y) in std::iter::zip(inputs, targets) {
            self.back_propagate_sample(x.as_ref(), y.as_ref());
        }
        Ok(())
    }

    /// Forward, back propagation and update for a single sample.
    ///
    /// Returns the squared error `Σ(output - target)²` measured before the update.
    pub fn backward_sample(&mut self, x: &[f64], y: &[f64]) -> Result<f64> {
        check_width("input", self.n_inputs(), x.len())?;
        check_width("target", self.n_outputs(), y.len())?;
        Ok(self.back_propagate_sample(x, y))
    }

    fn back_propagate_sample(&mut self, x: &[f64], y: &[f64]) -> f64 {
        self.propagate(x);
        let mut l_i = 0.0f64;
        for k in 0..self.n_outputs() {
            let e_k = self.output[(0, k)] - y[k];
            self.error[(0, k)] = e_k;
            l_i += e_k * e_k;
        }
        trace!(loss = l_i, "back propagating sample");
        let n_layers = self.layers.len();
        self.layers[n_layers - 1].error = self.error.clone();
        for u in (0..n_layers).rev() {
            let error_prev = self.layers[u].back_propagate();
            if let Some(u_prev) = u.checked_sub(1) {
                self.layers[u_prev].error = error_prev;
            }
        }
        self.apply_derivs();
        l_i
    }

    /// Subtracts `learning_rate` times the latest gradients from every layer's parameters.
    fn apply_derivs(&mut self) {
        let eta = self.hyperparams.learning_rate;
        for layer in &mut self.layers {
            layer.apply_derivs(eta);
        }
    }

    /// Summed squared error over a dataset, evaluated in parallel with `predict`.
    pub fn loss(
        &self,
        inputs: &[impl AsRef<[f64]> + Sync],
        targets: &[impl AsRef<[f64]> + Sync],
    ) -> Result<f64> {
        self.check_samples(inputs, targets)?;
        inputs
            .par_iter()
            .zip(targets)
            .map(|(x, y)| {
                let a = self.predict(x.as_ref())?;
                Ok(std::iter::zip(a, y.as_ref())
                    .map(|(a_k, y_k)| (a_k - y_k).powi(2))
                    .sum::<f64>())
            })
            .sum()
    }

    /// Checks that both sequences have the same length and every sample fits the network.
    pub fn check_samples(
        &self,
        inputs: &[impl AsRef<[f64]>],
        targets: &[impl AsRef<[f64]>],
    ) -> Result<()> {
        if inputs.len() != targets.len() {
            return Err(ShapeError::SampleCountMismatch {
                n_inputs: inputs.len(),
                n_targets: targets.len(),
            }
            .into());
        }
        for (x, y) in std::iter::zip(inputs, targets) {
            check_width("input", self.n_inputs(), x.as_ref().len())?;
            check_width("target", self.n_outputs(), y.as_ref().len())?;
        }
        Ok(())
    }
}

fn row_from_slice(x: &[f64]) -> Mat<f64> {
    Mat::from_fn(1, x.len(), |_, j| x[j])
}

fn row_to_vec(row: MatRef<'_, f64>) -> Vec<f64> {
    (0..row.ncols()).map(|j| row[(0, j)]).collect()
}
