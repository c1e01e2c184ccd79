mod failing_virtual_node;
mod oracle_classifier;
mod scripted_drift_estimator;
mod vec_stream;

pub use failing_virtual_node::FailingVirtualNode;
pub use oracle_classifier::OracleClassifier;
pub(crate) use oracle_classifier::one_hot;
pub use scripted_drift_estimator::ScriptedDriftEstimator;
pub use vec_stream::VecStream;
