use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::math::init::{nonzero_normal, random_vec};
use crate::math::vector::dot;

/// A single unit of a layer.
///
/// `output`, `delta` and `net_error` are scratch state overwritten by every
/// forward/backward pass; they only mean something for the sample that was
/// last pushed through the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// One weight per node of the previous layer (or per input component).
    pub weights: Vec<f64>,
    pub bias: f64,
    /// Post-activation value from the last forward pass.
    pub output: f64,
    /// Error signal from the last backward pass.
    pub delta: f64,
    /// Per-weight gradient from the last backward pass.
    pub net_error: Vec<f64>,
}

impl Node {
    pub fn new<R: Rng + ?Sized>(input_size: usize, rng: &mut R) -> Node {
        let weights = random_vec(input_size, rng);
        let bias = nonzero_normal(rng);
        Node::from_parts(weights, bias)
    }

    /// Builds a node with fixed parameters and cleared scratch state.
    pub fn from_parts(weights: Vec<f64>, bias: f64) -> Node {
        let net_error = vec![0.0; weights.len()];
        Node {
            weights,
            bias,
            output: 0.0,
            delta: 0.0,
            net_error,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.len()
    }

    /// Pre-activation value `w · x + b`.
    pub fn net(&self, input: &[f64]) -> f64 {
        dot(&self.weights, input) + self.bias
    }

    /// `net_error[w] = delta * source[w]`, where `source` is whatever fed
    /// this node on the forward pass.
    pub fn compute_net_error(&mut self, source: &[f64]) {
        let delta = self.delta;
        for (err, x) in self.net_error.iter_mut().zip(source.iter()) {
            *err = delta * x;
        }
    }

    pub fn apply_gradients(&mut self, lr: f64) {
        for (w, err) in self.weights.iter_mut().zip(self.net_error.iter()) {
            *w -= lr * err;
        }
        self.bias -= lr * self.delta;
    }
}
