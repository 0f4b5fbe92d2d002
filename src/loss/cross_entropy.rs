/// Categorical cross-entropy loss for use with a Softmax output layer.
pub struct CrossEntropyLoss;

/// Small epsilon added inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// Computes the scalar cross-entropy loss:
    ///   L = -sum(expected[i] * log(predicted[i] + eps))
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| -e * (p + EPS).ln())
            .sum()
    }

    /// Gradient of the combined Softmax + cross-entropy w.r.t. the logits:
    ///   ∂L/∂z_i = predicted[i] - expected[i]
    ///
    /// The Softmax layer's own derivative is then 1.0 so the Jacobian is not
    /// applied twice.
    pub fn derivative(predicted: f64, expected: f64) -> f64 {
        predicted - expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confident_correct_prediction_is_cheap() {
        let good = CrossEntropyLoss::loss(&[0.98, 0.01, 0.01], &[1.0, 0.0, 0.0]);
        let bad = CrossEntropyLoss::loss(&[0.01, 0.98, 0.01], &[1.0, 0.0, 0.0]);
        assert!(good < 0.05);
        assert!(bad > 4.0);
    }

    #[test]
    fn zero_probability_stays_finite() {
        assert!(CrossEntropyLoss::loss(&[0.0, 1.0], &[1.0, 0.0]).is_finite());
    }
}
