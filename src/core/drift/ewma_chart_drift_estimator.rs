use crate::core::drift::DriftEstimator;
use tracing::debug;

/// EWMA control chart for the error rate of a stream classifier (Ross et al., 2012).
#[derive(Clone, Debug)]
pub struct EwmaChartDriftEstimator {
    lambda: f64,
    min_instances: u64,
    n: u64,
    sum: f64,
    p: f64,
    s: f64,
    z: f64,
    change: bool,
    warning: bool,
}

impl EwmaChartDriftEstimator {
    pub const DEFAULT_LAMBDA: f64 = 0.2;
    pub const DEFAULT_MIN_INSTANCES: u64 = 30;

    pub fn new(lambda: f64, min_instances: u64) -> Self {
        Self {
            lambda,
            min_instances,
            n: 0,
            sum: 0.0,
            p: 0.0,
            s: 0.0,
            z: 0.0,
            change: false,
            warning: false,
        }
    }

    /// Control limit for an in-control run length of about 1000 samples.
    fn control_limit(p: f64) -> f64 {
        3.97 - 6.56 * p + 48.73 * p.powi(3) - 330.13 * p.powi(5) + 848.18 * p.powi(7)
    }
}

impl Default for EwmaChartDriftEstimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LAMBDA, Self::DEFAULT_MIN_INSTANCES)
    }
}

impl DriftEstimator for EwmaChartDriftEstimator {
    fn input(&mut self, error: f64) {
        if self.change {
            self.reset();
        }

        self.n += 1;
        self.sum += error;
        self.p = self.sum / self.n as f64;

        let decay = 1.0 - (1.0 - self.lambda).powf(2.0 * self.n as f64);
        self.s = (self.p * (1.0 - self.p) * self.lambda * decay / (2.0 - self.lambda))
            .max(0.0)
            .sqrt();
        self.z += self.lambda * (error - self.z);

        self.change = false;
        self.warning = false;
        if self.n < self.min_instances {
            return;
        }

        let limit = Self::control_limit(self.p);
        if self.z > self.p + limit * self.s {
            debug!(estimation = self.p, z = self.z, samples = self.n, "ewma chart change");
            self.change = true;
        } else if self.z > self.p + 0.5 * limit * self.s {
            self.warning = true;
        }
    }

    fn estimation(&self) -> f64 {
        self.p
    }

    fn delay(&self) -> u64 {
        self.n
    }

    fn change(&self) -> bool {
        self.change
    }

    fn in_warning_zone(&self) -> bool {
        self.warning
    }

    fn reset(&mut self) {
        *self = Self::new(self.lambda, self.min_instances);
    }

    fn clone_box(&self) -> Box<dyn DriftEstimator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(est: &mut EwmaChartDriftEstimator, error: f64, times: usize) -> usize {
        let mut changes = 0;
        for _ in 0..times {
            est.input(error);
            if est.change() {
                changes += 1;
            }
        }
        changes
    }

    #[test]
    fn tracks_mean_error_and_age() {
        let mut est = EwmaChartDriftEstimator::default();
        for i in 0..10 {
            est.input(if i % 2 == 0 { 1.0 } else { 0.0 });
        }
        assert!((est.estimation() - 0.5).abs() < 1e-12);
        assert_eq!(est.delay(), 10);
    }

    #[test]
    fn stable_error_never_signals() {
        let mut est = EwmaChartDriftEstimator::default();
        assert_eq!(feed(&mut est, 0.0, 2000), 0);
    }

    #[test]
    fn jump_in_error_rate_is_detected_and_then_resets() {
        let mut est = EwmaChartDriftEstimator::default();
        let mut rng_state = 7u64;
        for _ in 0..1000 {
            rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let err = if (rng_state >> 33) % 20 == 0 { 1.0 } else { 0.0 };
            est.input(err);
        }
        let mut detected_at = None;
        for i in 0..200 {
            est.input(1.0);
            if est.change() {
                detected_at = Some(i);
                break;
            }
        }
        assert!(detected_at.is_some());

        est.input(0.0);
        assert!(!est.change());
        assert_eq!(est.delay(), 1);
    }

    #[test]
    fn clone_box_is_independent() {
        let mut est = EwmaChartDriftEstimator::default();
        est.input(1.0);
        let copy = est.clone_box();
        est.input(0.0);
        assert_eq!(copy.delay(), 1);
        assert_eq!(est.delay(), 2);
    }
}
