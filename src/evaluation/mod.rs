mod estimators;
mod evaluators;
mod measurement;
mod preview;

pub use estimators::{BasicEstimator, Estimator};
pub use evaluators::{BasicClassificationEvaluator, PerformanceEvaluator};
pub use measurement::Measurement;
pub use preview::learning_curve::{CurveFormat, LearningCurve};
pub use preview::snapshot::Snapshot;
