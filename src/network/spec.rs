use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::loss::loss_type::LossType;
use crate::network::network::Network;

/// A serializable description of a network architecture, kept apart from
/// trained weights so configurations can be stored before training starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name, used as the model file stem.
    pub name: String,
    /// `[input, hidden.., output]` widths.
    pub sizes: Vec<usize>,
    /// Output activation/loss pairing; sigmoid/MSE when omitted.
    #[serde(default)]
    pub loss: LossType,
}

impl NetworkSpec {
    pub fn new(name: impl Into<String>, sizes: Vec<usize>, loss: LossType) -> Self {
        NetworkSpec { name: name.into(), sizes, loss }
    }

    /// Builds a randomly initialized network for this architecture.
    pub fn build(&self) -> Result<Network> {
        Network::with_loss(&self.sizes, self.loss)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
