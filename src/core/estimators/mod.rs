mod gaussian_estimator;
mod greenwald_khanna_quantile_summary;

pub use gaussian_estimator::GaussianEstimator;
pub use greenwald_khanna_quantile_summary::{GkTuple, GreenwaldKhannaQuantileSummary};
