use crate::utils::math::normal_probability;

#[derive(Clone, Debug, Default)]
pub struct GaussianEstimator {
    weight_sum: f64,
    mean: f64,
    variance_sum: f64,
}

impl GaussianEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_observation(&mut self, value: f64, weight: f64) {
        if !value.is_finite() || !weight.is_finite() || weight <= 0.0 {
            return;
        }

        if self.weight_sum > 0.0 {
            self.weight_sum += weight;
            let last_mean = self.mean;
            self.mean += weight * (value - last_mean) / self.weight_sum;
            self.variance_sum += weight * (value - last_mean) * (value - self.mean);
        } else {
            self.mean = value;
            self.weight_sum = weight;
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        if self.weight_sum > 1.0 {
            self.variance_sum / (self.weight_sum - 1.0)
        } else {
            0.0
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn total_weight_observed(&self) -> f64 {
        self.weight_sum
    }

    pub fn weight_at_or_below(&self, value: f64) -> f64 {
        let std_dev = self.std_dev();
        if std_dev > 0.0 {
            normal_probability((value - self.mean) / std_dev) * self.weight_sum
        } else if value >= self.mean {
            self.weight_sum
        } else {
            0.0
        }
    }

    pub fn probability_density(&self, value: f64) -> f64 {
        if self.weight_sum <= 0.0 {
            return 0.0;
        }
        let std_dev = self.std_dev();
        if std_dev > 0.0 {
            let diff = value - self.mean;
            let normal_const = (2.0 * std::f64::consts::PI).sqrt();
            return (1.0 / (normal_const * std_dev))
                * ((-diff * diff) / (2.0 * std_dev * std_dev)).exp();
        }
        if value == self.mean { 1.0 } else { 0.0 }
    }
}
