pub mod epoch_stats;
pub mod evaluate;
pub mod train_config;
pub mod loop_fn;

pub use epoch_stats::EpochStats;
pub use evaluate::{accuracy, count_correct};
pub use train_config::TrainConfig;
pub use loop_fn::{train_loop, EvalSet};
