pub mod adaptive;
pub mod leaf_node;
pub mod leaf_prediction;
pub mod node;
pub mod split_node;

pub use adaptive::{AdaptiveSplitState, AlternativeTree};
pub use leaf_node::LeafNode;
pub use leaf_prediction::LeafPredictor;
pub use node::{LearnContext, Node, StructuralChange};
pub use split_node::SplitNode;
