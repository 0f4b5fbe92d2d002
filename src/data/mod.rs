pub mod idx;

pub use idx::{load_idx_pair, parse_idx_pair, Dataset};
