pub mod dense;
pub mod node;

pub use dense::Layer;
pub use node::Node;
