/// Error-rate estimator that also signals concept drift.
///
/// Nodes feed it one 0/1 prediction error per record. `delay` is the number of
/// samples seen since the last reset and is used as the estimate's age.
pub trait DriftEstimator: Send {
    fn input(&mut self, error: f64);
    fn estimation(&self) -> f64;
    fn delay(&self) -> u64;
    /// True only right after the sample that triggered the detection.
    fn change(&self) -> bool;
    fn in_warning_zone(&self) -> bool;
    fn reset(&mut self);
    fn clone_box(&self) -> Box<dyn DriftEstimator>;
}

impl Clone for Box<dyn DriftEstimator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn DriftEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriftEstimator")
            .field("estimation", &self.estimation())
            .field("delay", &self.delay())
            .field("change", &self.change())
            .finish()
    }
}
