use crate::classifiers::attribute_class_observers::attribute_class_observer::{
    AttributeClassObserver, NumericAttributeClassObserver, is_observable, thin_evenly,
};
use crate::core::estimators::GaussianEstimator;
use std::any::Any;

#[derive(Clone, Debug)]
pub struct GaussianNumericAttributeClassObserver {
    min_value_observed_per_class: Vec<f64>,
    max_value_observed_per_class: Vec<f64>,
    attribute_value_distribution_per_class: Vec<Option<GaussianEstimator>>,
    num_bins_option: usize,
}

impl Default for GaussianNumericAttributeClassObserver {
    fn default() -> Self {
        Self::with_num_bins(10)
    }
}

impl GaussianNumericAttributeClassObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_num_bins(num_bins: usize) -> Self {
        Self {
            min_value_observed_per_class: Vec::new(),
            max_value_observed_per_class: Vec::new(),
            attribute_value_distribution_per_class: Vec::new(),
            num_bins_option: num_bins.max(1),
        }
    }

    #[inline]
    fn ensure_class(&mut self, class_val: usize) {
        if class_val >= self.attribute_value_distribution_per_class.len() {
            let new_len = class_val + 1;
            self.attribute_value_distribution_per_class
                .resize_with(new_len, || None);
            self.min_value_observed_per_class.resize(new_len, 0.0);
            self.max_value_observed_per_class.resize(new_len, 0.0);
        }
    }

    fn observed_range(&self) -> Option<(f64, f64)> {
        let mut min_val = f64::INFINITY;
        let mut max_val = f64::NEG_INFINITY;
        for (i, est) in self.attribute_value_distribution_per_class.iter().enumerate() {
            if est.is_some() {
                min_val = min_val.min(self.min_value_observed_per_class[i]);
                max_val = max_val.max(self.max_value_observed_per_class[i]);
            }
        }
        (min_val <= max_val).then_some((min_val, max_val))
    }
}

impl AttributeClassObserver for GaussianNumericAttributeClassObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize, weight: f64) {
        if !is_observable(att_val, weight) || !att_val.is_finite() {
            return;
        }
        self.ensure_class(class_val);

        match &mut self.attribute_value_distribution_per_class[class_val] {
            Some(est) => {
                let min = &mut self.min_value_observed_per_class[class_val];
                *min = min.min(att_val);
                let max = &mut self.max_value_observed_per_class[class_val];
                *max = max.max(att_val);
                est.add_observation(att_val, weight);
            }
            slot @ None => {
                let mut est = GaussianEstimator::new();
                est.add_observation(att_val, weight);
                *slot = Some(est);
                self.min_value_observed_per_class[class_val] = att_val;
                self.max_value_observed_per_class[class_val] = att_val;
            }
        }
    }

    fn probability_of_attribute_value_given_class(
        &self,
        att_val: f64,
        class_val: usize,
    ) -> Option<f64> {
        if att_val.is_nan() {
            return None;
        }
        match self.attribute_value_distribution_per_class.get(class_val) {
            Some(Some(est)) if est.total_weight_observed() > 0.0 => {
                Some(est.probability_density(att_val))
            }
            _ => None,
        }
    }

    fn total_weight_observed(&self) -> f64 {
        self.class_distribution().iter().sum()
    }

    fn class_distribution(&self) -> Vec<f64> {
        self.attribute_value_distribution_per_class
            .iter()
            .map(|est| est.as_ref().map_or(0.0, |e| e.total_weight_observed()))
            .collect()
    }

    fn reset(&mut self) {
        *self = Self::with_num_bins(self.num_bins_option);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl NumericAttributeClassObserver for GaussianNumericAttributeClassObserver {
    fn number_of_cut_points(&self) -> usize {
        self.cut_point_suggestions(self.num_bins_option).len()
    }

    /// `num_bins` values equally spaced strictly inside the observed range, thinned
    /// to `max_cut_points`.
    fn cut_point_suggestions(&self, max_cut_points: usize) -> Vec<f64> {
        let Some((min_val, max_val)) = self.observed_range() else {
            return Vec::new();
        };
        let range = max_val - min_val;
        let bins = self.num_bins_option as f64;
        let points = (0..self.num_bins_option)
            .map(|i| (range / (bins + 1.0)) * (i as f64 + 1.0) + min_val)
            .filter(|&v| v > min_val && v < max_val)
            .collect();
        thin_evenly(points, max_cut_points)
    }

    fn left_class_distribution(&self, cut_value: f64) -> Vec<f64> {
        self.attribute_value_distribution_per_class
            .iter()
            .enumerate()
            .map(|(class_idx, est)| {
                let Some(est) = est else {
                    return 0.0;
                };
                if cut_value < self.min_value_observed_per_class[class_idx] {
                    0.0
                } else if cut_value >= self.max_value_observed_per_class[class_idx] {
                    est.total_weight_observed()
                } else {
                    est.weight_at_or_below(cut_value)
                }
            })
            .collect()
    }

    fn cut_value_goes_left(&self) -> bool {
        true
    }
}
