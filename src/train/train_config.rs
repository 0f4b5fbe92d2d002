use std::path::PathBuf;

use crate::error::{NetworkError, Result};
use crate::optim::sgd::Sgd;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`        — total number of full passes over the training data
/// - `learning_rate` — SGD step size, must be positive
/// - `shuffle`       — reorder samples every epoch; off by default so runs
///                     follow dataset order exactly
/// - `seed`          — seeds the shuffle; `None` draws from OS entropy
/// - `early_stop`    — stop once training loss (or eval accuracy, when an
///                     eval set is given) fails to improve on its best
/// - `checkpoint`    — path to save the network to after every improving
///                     epoch; `{epoch}` is replaced by the epoch number
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub shuffle: bool,
    pub seed: Option<u64>,
    pub early_stop: bool,
    pub checkpoint: Option<PathBuf>,
}

impl TrainConfig {
    /// Fixed-order training with no early stopping and no checkpoints.
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            shuffle: false,
            seed: None,
            early_stop: false,
            checkpoint: None,
        }
    }

    pub fn shuffle(mut self, seed: Option<u64>) -> Self {
        self.shuffle = true;
        self.seed = seed;
        self
    }

    pub fn early_stop(mut self, enabled: bool) -> Self {
        self.early_stop = enabled;
        self
    }

    pub fn checkpoint(mut self, path: impl Into<PathBuf>) -> Self {
        self.checkpoint = Some(path.into());
        self
    }

    /// Checks the hyperparameters and returns the optimizer they describe.
    pub fn validate(&self) -> Result<Sgd> {
        if self.epochs == 0 {
            return Err(NetworkError::InvalidConfig("epochs must be at least 1".into()));
        }
        Sgd::new(self.learning_rate)
    }

    pub(crate) fn checkpoint_path(&self, epoch: usize) -> Option<PathBuf> {
        self.checkpoint.as_ref().map(|p| {
            PathBuf::from(p.to_string_lossy().replace("{epoch}", &epoch.to_string()))
        })
    }
}
