pub mod activation;

pub use activation::{ActivationFunction, sigmoid, sigmoid_prime, softmax};
