mod drift_estimator;
mod ewma_chart_drift_estimator;

pub use drift_estimator::DriftEstimator;
pub use ewma_chart_drift_estimator::EwmaChartDriftEstimator;
