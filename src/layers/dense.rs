use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::layers::node::Node;
use crate::loss::loss_type::LossType;

/// A fully-connected layer: an ordered group of nodes sharing one input width.
///
/// Node order matters: node `j` of this layer is read through
/// `weights[j]` of every node in the next layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub nodes: Vec<Node>,
    pub activator: ActivationFunction,
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        let nodes = (0..size).map(|_| Node::new(input_size, rng)).collect();
        Layer { nodes, activator: activation }
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Width of the vector this layer consumes. Every node agrees on it
    /// for a well-formed layer.
    pub fn input_size(&self) -> usize {
        self.nodes.first().map_or(0, Node::input_size)
    }

    /// Forward pass through this layer; caches each node's `output`.
    pub fn feed_from(&mut self, input: &[f64]) -> Vec<f64> {
        let nets: Vec<f64> = self.nodes.iter().map(|n| n.net(input)).collect();
        let outputs = self.activator.apply(&nets);
        for (node, out) in self.nodes.iter_mut().zip(outputs.iter()) {
            node.output = *out;
        }
        outputs
    }

    /// Cached outputs from the last forward pass, in node order.
    pub fn outputs(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.output).collect()
    }

    /// Output-layer deltas: `dL/dout * f'(out)` per node.
    pub fn set_output_deltas(&mut self, target: &[f64], loss: LossType) {
        let act = self.activator;
        for (node, t) in self.nodes.iter_mut().zip(target.iter()) {
            node.delta = loss.derivative(node.output, *t) * act.derivative_from_output(node.output);
        }
    }

    /// Hidden-layer deltas: the chain-rule fan-in from every node of `next`
    /// that consumes this layer's outputs, scaled by the local derivative.
    pub fn set_hidden_deltas(&mut self, next: &Layer) {
        let act = self.activator;
        for (j, node) in self.nodes.iter_mut().enumerate() {
            let downstream: f64 = next.nodes.iter()
                .map(|k| k.delta * k.weights[j])
                .sum();
            node.delta = act.derivative_from_output(node.output) * downstream;
        }
    }

    /// Per-weight gradients for every node, given the vector that fed this
    /// layer on the forward pass.
    pub fn compute_net_errors(&mut self, source: &[f64]) {
        for node in &mut self.nodes {
            node.compute_net_error(source);
        }
    }

    pub fn apply_gradients(&mut self, lr: f64) {
        for node in &mut self.nodes {
            node.apply_gradients(lr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn zero_layer(size: usize, input_size: usize, activation: ActivationFunction) -> Layer {
        Layer {
            nodes: (0..size).map(|_| Node::from_parts(vec![0.0; input_size], 0.0)).collect(),
            activator: activation,
        }
    }

    #[test]
    fn new_layer_shape() {
        let layer = Layer::new(4, 3, ActivationFunction::Sigmoid, &mut StdRng::seed_from_u64(3));
        assert_eq!(layer.size(), 4);
        assert_eq!(layer.input_size(), 3);
    }

    #[test]
    fn feed_from_caches_outputs() {
        let mut layer = zero_layer(3, 2, ActivationFunction::Sigmoid);
        let out = layer.feed_from(&[1.0, -1.0]);
        assert_eq!(out, vec![0.5; 3]);
        assert_eq!(layer.outputs(), out);
    }

    #[test]
    fn softmax_layer_is_uniform_when_zeroed() {
        let mut layer = zero_layer(4, 2, ActivationFunction::Softmax);
        let out = layer.feed_from(&[3.0, 7.0]);
        for p in out {
            assert!((p - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn hidden_delta_sums_over_downstream_nodes() {
        let mut hidden = zero_layer(2, 1, ActivationFunction::Sigmoid);
        hidden.nodes[0].output = 0.5;
        hidden.nodes[1].output = 0.5;

        let mut next = zero_layer(2, 2, ActivationFunction::Sigmoid);
        next.nodes[0].weights = vec![1.0, 2.0];
        next.nodes[0].delta = 0.5;
        next.nodes[1].weights = vec![3.0, 4.0];
        next.nodes[1].delta = 1.0;

        hidden.set_hidden_deltas(&next);
        // 0.25 * (0.5*1 + 1*3), 0.25 * (0.5*2 + 1*4)
        assert_eq!(hidden.nodes[0].delta, 0.875);
        assert_eq!(hidden.nodes[1].delta, 1.25);
    }
}
