pub mod learning_curve;
pub mod snapshot;
