pub trait Estimator: Default + Send {
    fn add(&mut self, value: f64, weight: f64);
    fn estimation(&self) -> f64;
    fn total_weight(&self) -> f64;
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Plain weighted average over everything seen. `NaN` until the first sample.
#[derive(Debug, Clone, Default)]
pub struct BasicEstimator {
    weighted_sum: f64,
    weight: f64,
}

impl Estimator for BasicEstimator {
    fn add(&mut self, value: f64, weight: f64) {
        if !value.is_finite() || !weight.is_finite() || weight <= 0.0 {
            return;
        }
        self.weighted_sum += value * weight;
        self.weight += weight;
    }

    fn estimation(&self) -> f64 {
        if self.weight > 0.0 {
            self.weighted_sum / self.weight
        } else {
            f64::NAN
        }
    }

    fn total_weight(&self) -> f64 {
        self.weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_estimator_is_nan() {
        assert!(BasicEstimator::default().estimation().is_nan());
    }

    #[test]
    fn weights_scale_contributions() {
        let mut e = BasicEstimator::default();
        e.add(1.0, 3.0);
        e.add(0.0, 1.0);
        assert!((e.estimation() - 0.75).abs() < 1e-12);
        assert_eq!(e.total_weight(), 4.0);

        e.add(1.0, 0.0);
        e.add(f64::NAN, 1.0);
        assert_eq!(e.total_weight(), 4.0);

        e.reset();
        assert!(e.estimation().is_nan());
    }
}
