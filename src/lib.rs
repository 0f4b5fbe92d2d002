pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use activation::activation::ActivationFunction;
pub use layers::{Layer, Node};
pub use network::{Network, NetworkSpec};
pub use loss::LossType;
pub use optim::sgd::Sgd;
pub use train::{train_loop, TrainConfig, EpochStats};
pub use data::Dataset;
