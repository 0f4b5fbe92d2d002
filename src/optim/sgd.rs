use crate::error::{NetworkError, Result};
use crate::network::network::Network;

/// Plain per-sample stochastic gradient descent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    /// Fails unless `learning_rate` is a positive, finite number.
    pub fn new(learning_rate: f64) -> Result<Sgd> {
        if !(learning_rate > 0.0 && learning_rate.is_finite()) {
            return Err(NetworkError::InvalidConfig(format!(
                "learning rate must be positive, got {learning_rate}"
            )));
        }
        Ok(Sgd { learning_rate })
    }

    /// Applies the gradients left by the last `backpropagate` call.
    pub fn step(&self, network: &mut Network) {
        network.apply_gradients(self.learning_rate);
    }
}
