//! Concentration bounds used to compare estimates built from finite samples.

/// Half-width of the confidence interval around a proportion `estimate` observed
/// over `n` samples. Small proportions use the tighter Chernoff bound when it wins.
pub fn hoeffding_bound(estimate: f64, n: f64, confidence: f64) -> f64 {
    if n <= 0.0 {
        return 1.0;
    }
    let log_term = (2.0 / confidence).ln();
    let hoeffding = (log_term / (2.0 * n)).sqrt();
    if estimate < 1.0 / 6.0 {
        let estimate = estimate.max(0.0);
        let chernoff = (3.0 * log_term
            + (9.0 * log_term * log_term + 12.0 * n * estimate * log_term).sqrt())
            / (2.0 * n);
        chernoff.min(hoeffding).min(1.0)
    } else {
        hoeffding.min(1.0)
    }
}

/// Minimum difference between two error averages, estimated over `n1` and `n2`
/// samples, to call them different with significance `alpha`.
pub fn average_comparison_bound(n1: f64, n2: f64, alpha: f64) -> f64 {
    ((1.0 / n1 + 1.0 / n2) * (1.0 / alpha).ln() / 2.0).sqrt()
}
