use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Every failure the network engine and its driver modules can report.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Bad topology, learning rate, epoch count or dataset shape.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A vector handed to the network has the wrong width.
    #[error("{what} has length {actual}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A NaN or infinite value that JSON cannot represent.
    #[error("cannot save network: non-finite value in {0}")]
    NonFinite(String),

    /// A persisted model could not be turned back into a valid network.
    #[error("unable to decode network: {0}")]
    Decode(String),

    /// An IDX image/label pair could not be parsed.
    #[error("dataset error: {0}")]
    Dataset(String),
}

impl From<serde_json::Error> for NetworkError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            NetworkError::Io(e.into())
        } else {
            NetworkError::Decode(e.to_string())
        }
    }
}

impl NetworkError {
    pub(crate) fn dimension(what: &'static str, expected: usize, actual: usize) -> Self {
        NetworkError::DimensionMismatch { what, expected, actual }
    }
}
