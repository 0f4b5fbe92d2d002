use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    /// Softmax is vector-valued; it is applied to the whole layer in
    /// `Layer::feed_from()` and only ever sits on the output layer, paired
    /// with cross-entropy loss.
    Softmax,
}

impl ActivationFunction {
    /// Element-wise activation. `Softmax` goes through [`softmax`] instead.
    ///
    /// # Panics
    /// Panics for `Softmax`, which has no element-wise form. Use
    /// [`ActivationFunction::apply`] for a whole layer's pre-activations.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid(x),
            ActivationFunction::Softmax => {
                panic!("ActivationFunction::Softmax::function() must not be called directly; \
                        use ActivationFunction::apply() which applies the full-vector softmax.")
            }
        }
    }

    /// Applies the activation to a layer's pre-activation values. Works for
    /// every variant.
    pub fn apply(&self, nets: &[f64]) -> Vec<f64> {
        match self {
            ActivationFunction::Softmax => softmax(nets),
            act => nets.iter().map(|&x| act.function(x)).collect(),
        }
    }

    /// Derivative expressed in terms of the activation output `y`, not the
    /// pre-activation input. For the sigmoid, `y * (1 - y)`.
    ///
    /// For `Softmax` the layer is paired with cross-entropy and the combined
    /// gradient `output - target` already includes the Jacobian, so `1.0`
    /// lets the output delta pass through unchanged.
    pub fn derivative_from_output(&self, y: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid_prime(y),
            ActivationFunction::Softmax => 1.0,
        }
    }
}

/// `1 / (1 + e^-x)`
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative in terms of its own output.
pub fn sigmoid_prime(y: f64) -> f64 {
    y * (1.0 - y)
}

/// Numerically stable softmax (shifted by the max logit).
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
