pub mod bounds;
pub mod config;
pub mod counters;
mod iadem_tree;
pub mod instance_conditional_test;
pub mod lots_and_holes;
pub mod nodes;
pub mod split_criteria;
pub mod virtual_nodes;

pub use config::{AdaptiveConfig, Iadem3Parameters, IademConfig};
pub use iadem_tree::IademTree;
