pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((expected - predicted)²) across the output nodes.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(p, t)| (t - p).powi(2))
            .sum::<f64>() / n
    }

    /// Per-output gradient: predicted - expected
    pub fn derivative(predicted: f64, expected: f64) -> f64 {
        predicted - expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_over_outputs() {
        assert_eq!(MseLoss::loss(&[0.5, 1.0], &[1.0, 0.0]), (0.25 + 1.0) / 2.0);
        assert_eq!(MseLoss::loss(&[0.3, 0.3], &[0.3, 0.3]), 0.0);
    }
}
