//! Doubles and fixtures shared by the unit tests.

mod dummies;
mod fixtures;
mod spies;
mod stubs;

pub use dummies::ClassifierNoneVotes;
pub use fixtures::{header_binary, header_numeric, instance_of};
pub use spies::{TrainSpyClassifier, TrainSpyHandle};
pub use stubs::{FailingVirtualNode, OracleClassifier, ScriptedDriftEstimator, VecStream};
