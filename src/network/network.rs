use std::io::{Read, Write};
use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::activation::activation::ActivationFunction;
use crate::error::{NetworkError, Result};
use crate::layers::dense::Layer;
use crate::loss::loss_type::LossType;
use crate::optim::sgd::Sgd;

/// A fully-connected feed-forward network.
///
/// `sizes` is `[input, hidden.., output]`; the input layer has no nodes of
/// its own, so `layers.len() == sizes.len() - 1` and layer `i` holds
/// `sizes[i + 1]` nodes of `sizes[i]` weights each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub sizes: Vec<usize>,
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub loss: LossType,
}

impl Network {
    /// Sigmoid/MSE network with randomly initialized parameters.
    pub fn new(sizes: &[usize]) -> Result<Network> {
        Network::with_loss(sizes, LossType::Mse)
    }

    pub fn with_loss(sizes: &[usize], loss: LossType) -> Result<Network> {
        Network::with_rng(sizes, loss, &mut rand::thread_rng())
    }

    /// Builds a network drawing every weight and bias from `rng`, so a
    /// seeded generator gives a reproducible starting point.
    pub fn with_rng<R: Rng + ?Sized>(sizes: &[usize], loss: LossType, rng: &mut R) -> Result<Network> {
        validate_sizes(sizes)?;

        let last = sizes.len() - 2;
        let layers = sizes.windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let activation = if i == last {
                    loss.output_activation()
                } else {
                    ActivationFunction::Sigmoid
                };
                Layer::new(pair[1], pair[0], activation, rng)
            })
            .collect();

        debug!(?sizes, ?loss, "constructed network");
        Ok(Network { sizes: sizes.to_vec(), layers, loss })
    }

    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// Forward pass. Caches every node's `output` for a following
    /// `backpropagate` on the same input.
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_input(input)?;
        Ok(self.forward(input))
    }

    fn forward(&mut self, input: &[f64]) -> Vec<f64> {
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.feed_from(&current);
        }
        current
    }

    /// Backward pass for the sample last passed to [`Network::predict`].
    ///
    /// Fills in every node's `delta` and `net_error`, working from the output
    /// layer back to the first hidden layer, and returns this sample's loss.
    /// Parameters are left untouched until [`Network::apply_gradients`].
    pub fn backpropagate(&mut self, input: &[f64], target: &[f64]) -> Result<f64> {
        self.check_input(input)?;
        self.check_target(target)?;
        Ok(self.backward(input, target))
    }

    fn backward(&mut self, input: &[f64], target: &[f64]) -> f64 {
        let loss = self.loss;
        let n = self.layers.len();

        let output = self.layers[n - 1].outputs();
        let sample_loss = loss.loss(&output, target);

        self.layers[n - 1].set_output_deltas(target, loss);
        for i in (0..n - 1).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            head[i].set_hidden_deltas(&tail[0]);
        }

        for i in (1..n).rev() {
            let source = self.layers[i - 1].outputs();
            self.layers[i].compute_net_errors(&source);
        }
        self.layers[0].compute_net_errors(input);

        sample_loss
    }

    /// `weight -= lr * net_error`, `bias -= lr * delta` for every node.
    pub fn apply_gradients(&mut self, learning_rate: f64) {
        for layer in &mut self.layers {
            layer.apply_gradients(learning_rate);
        }
    }

    /// Per-sample SGD over `inputs`/`targets` in dataset order for `epochs`
    /// passes. Returns the mean loss of the last epoch.
    ///
    /// Every argument and every sample's width is validated up front, so a
    /// failed call leaves the network untouched.
    pub fn train(
        &mut self,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        learning_rate: f64,
        epochs: usize,
    ) -> Result<f64> {
        let optimizer = Sgd::new(learning_rate)?;
        if epochs == 0 {
            return Err(NetworkError::InvalidConfig("epochs must be at least 1".into()));
        }
        self.check_dataset(inputs, targets)?;

        let order: Vec<usize> = (0..inputs.len()).collect();
        let mut last_loss = 0.0;
        for _ in 0..epochs {
            last_loss = self.train_epoch(inputs, targets, &order, &optimizer);
        }
        Ok(last_loss)
    }

    /// One pass over the samples named by `order`; returns the mean loss.
    /// The dataset must already have passed [`Network::check_dataset`].
    pub(crate) fn train_epoch(
        &mut self,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        order: &[usize],
        optimizer: &Sgd,
    ) -> f64 {
        let mut total_loss = 0.0;
        for &idx in order {
            let input = &inputs[idx];
            self.forward(input);
            total_loss += self.backward(input, &targets[idx]);
            optimizer.step(self);
        }
        total_loss / order.len() as f64
    }

    /// Checks that a dataset is non-empty, index-aligned, and that every
    /// sample matches the network's input and output widths.
    pub fn check_dataset(&self, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
        if inputs.is_empty() {
            return Err(NetworkError::InvalidConfig("dataset is empty".into()));
        }
        if inputs.len() != targets.len() {
            return Err(NetworkError::InvalidConfig(format!(
                "dataset has {} inputs but {} targets",
                inputs.len(),
                targets.len()
            )));
        }
        for (input, target) in inputs.iter().zip(targets.iter()) {
            self.check_input(input)?;
            self.check_target(target)?;
        }
        Ok(())
    }

    fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.input_size() {
            return Err(NetworkError::dimension("input", self.input_size(), input.len()));
        }
        Ok(())
    }

    fn check_target(&self, target: &[f64]) -> Result<()> {
        if target.len() != self.output_size() {
            return Err(NetworkError::dimension("target", self.output_size(), target.len()));
        }
        Ok(())
    }

    /// Re-checks the structural invariants after a network came from
    /// somewhere other than [`Network::with_rng`].
    fn validate_structure(&self) -> Result<()> {
        validate_sizes(&self.sizes).map_err(|e| NetworkError::Decode(e.to_string()))?;
        if self.layers.len() != self.sizes.len() - 1 {
            return Err(NetworkError::Decode(format!(
                "{} sizes but {} layers",
                self.sizes.len(),
                self.layers.len()
            )));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.size() != self.sizes[i + 1] {
                return Err(NetworkError::Decode(format!(
                    "layer {i} has {} nodes, expected {}",
                    layer.size(),
                    self.sizes[i + 1]
                )));
            }
            for node in &layer.nodes {
                if node.weights.len() != self.sizes[i] || node.net_error.len() != self.sizes[i] {
                    return Err(NetworkError::Decode(format!(
                        "layer {i} has a node with {} weights, expected {}",
                        node.weights.len(),
                        self.sizes[i]
                    )));
                }
            }
            let is_output = i == self.layers.len() - 1;
            if is_output && layer.activator != self.loss.output_activation() {
                return Err(NetworkError::Decode(format!(
                    "output layer uses {:?} but loss {:?} needs {:?}",
                    layer.activator,
                    self.loss,
                    self.loss.output_activation()
                )));
            }
            if layer.activator == ActivationFunction::Softmax && !is_output {
                return Err(NetworkError::Decode(format!("hidden layer {i} uses softmax")));
            }
        }
        Ok(())
    }

    /// JSON has no encoding for NaN or infinities, so a network holding one
    /// could be written but never read back.
    fn check_finite(&self) -> Result<()> {
        for (i, layer) in self.layers.iter().enumerate() {
            for (j, node) in layer.nodes.iter().enumerate() {
                let finite = node.bias.is_finite()
                    && node.output.is_finite()
                    && node.delta.is_finite()
                    && node.weights.iter().all(|w| w.is_finite())
                    && node.net_error.iter().all(|e| e.is_finite());
                if !finite {
                    return Err(NetworkError::NonFinite(format!("layer {i}, node {j}")));
                }
            }
        }
        Ok(())
    }

    /// Writes the full network state, scratch fields included, as JSON.
    /// Fails with [`NetworkError::NonFinite`] before writing anything if a
    /// parameter or scratch value is NaN or infinite.
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        self.check_finite()?;
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Reads a network written by [`Network::save`]. Malformed, truncated or
    /// structurally inconsistent input is a [`NetworkError::Decode`].
    pub fn load<R: Read>(reader: R) -> Result<Network> {
        let network: Network = serde_json::from_reader(reader)?;
        network.validate_structure()?;
        Ok(network)
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.check_finite()?;
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        debug!(path = %path.display(), "saved network");
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let network = Network::load(std::io::BufReader::new(file))?;
        debug!(path = %path.display(), sizes = ?network.sizes, "loaded network");
        Ok(network)
    }
}

fn validate_sizes(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 {
        return Err(NetworkError::InvalidConfig(format!(
            "need at least 2 layer sizes, got {}",
            sizes.len()
        )));
    }
    if let Some(i) = sizes.iter().position(|&s| s < 1) {
        return Err(NetworkError::InvalidConfig(format!("layer {i} has size 0")));
    }
    Ok(())
}
