use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::loss::mse::MseLoss;

/// Selects the output layer's activation and the loss the network trains on.
///
/// - `Mse`          — sigmoid output, mean-squared error. The default.
/// - `CrossEntropy` — softmax output, categorical cross-entropy. Hidden
///   layers stay sigmoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    #[default]
    Mse,
    CrossEntropy,
}

impl LossType {
    pub fn output_activation(self) -> ActivationFunction {
        match self {
            LossType::Mse          => ActivationFunction::Sigmoid,
            LossType::CrossEntropy => ActivationFunction::Softmax,
        }
    }

    /// Scalar loss for one sample.
    pub fn loss(self, predicted: &[f64], expected: &[f64]) -> f64 {
        match self {
            LossType::Mse          => MseLoss::loss(predicted, expected),
            LossType::CrossEntropy => CrossEntropyLoss::loss(predicted, expected),
        }
    }

    /// Gradient of the loss w.r.t. one output (before the activation
    /// derivative is applied).
    pub fn derivative(self, predicted: f64, expected: f64) -> f64 {
        match self {
            LossType::Mse          => MseLoss::derivative(predicted, expected),
            LossType::CrossEntropy => CrossEntropyLoss::derivative(predicted, expected),
        }
    }
}
