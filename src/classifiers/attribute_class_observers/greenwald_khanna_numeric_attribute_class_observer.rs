use crate::classifiers::attribute_class_observers::attribute_class_observer::{
    AttributeClassObserver, NumericAttributeClassObserver, is_observable, thin_evenly,
};
use crate::core::estimators::GreenwaldKhannaQuantileSummary;
use std::any::Any;

#[derive(Clone, Debug)]
pub struct GreenwaldKhannaNumericAttributeClassObserver {
    summaries: Vec<Option<GreenwaldKhannaQuantileSummary>>,
    max_tuples: usize,
}

impl GreenwaldKhannaNumericAttributeClassObserver {
    pub fn new(max_tuples: usize) -> Self {
        Self {
            summaries: Vec::new(),
            max_tuples,
        }
    }

    fn pooled_cut_points(&self) -> Vec<f64> {
        let mut values: Vec<f64> = self
            .summaries
            .iter()
            .flatten()
            .flat_map(|s| s.tuples().iter().map(|t| t.value))
            .collect();
        values.sort_by(f64::total_cmp);
        values.dedup();
        values.pop();
        values
    }
}

impl AttributeClassObserver for GreenwaldKhannaNumericAttributeClassObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize, weight: f64) {
        if !is_observable(att_val, weight) || !att_val.is_finite() {
            return;
        }
        if class_val >= self.summaries.len() {
            self.summaries.resize_with(class_val + 1, || None);
        }
        let max_tuples = self.max_tuples;
        self.summaries[class_val]
            .get_or_insert_with(|| GreenwaldKhannaQuantileSummary::new(max_tuples))
            .insert(att_val, weight);
    }

    /// Laplace-smoothed share of the class weight falling in the pooled cell that
    /// contains `att_val`.
    fn probability_of_attribute_value_given_class(
        &self,
        att_val: f64,
        class_val: usize,
    ) -> Option<f64> {
        if att_val.is_nan() {
            return None;
        }
        let summary = self.summaries.get(class_val)?.as_ref()?;
        let mut boundaries = self.pooled_cut_points();
        if let Some(max) = self
            .summaries
            .iter()
            .flatten()
            .filter_map(|s| s.tuples().last())
            .map(|t| t.value)
            .reduce(f64::max)
        {
            boundaries.push(max);
        }

        let cell = boundaries.partition_point(|&b| b < att_val);
        let upper = match boundaries.get(cell) {
            Some(&b) => summary.weight_at_or_below(b),
            None => summary.total_weight(),
        };
        let lower = match cell.checked_sub(1).and_then(|i| boundaries.get(i)) {
            Some(&b) => summary.weight_at_or_below(b),
            None => 0.0,
        };
        let cells = (boundaries.len() + 1) as f64;
        Some(((upper - lower).max(0.0) + 1.0) / (summary.total_weight() + cells))
    }

    fn total_weight_observed(&self) -> f64 {
        self.class_distribution().iter().sum()
    }

    fn class_distribution(&self) -> Vec<f64> {
        self.summaries
            .iter()
            .map(|s| s.as_ref().map_or(0.0, |s| s.total_weight()))
            .collect()
    }

    fn reset(&mut self) {
        self.summaries.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl NumericAttributeClassObserver for GreenwaldKhannaNumericAttributeClassObserver {
    fn number_of_cut_points(&self) -> usize {
        self.pooled_cut_points().len()
    }

    fn cut_point_suggestions(&self, max_cut_points: usize) -> Vec<f64> {
        thin_evenly(self.pooled_cut_points(), max_cut_points)
    }

    fn left_class_distribution(&self, cut_value: f64) -> Vec<f64> {
        self.summaries
            .iter()
            .map(|s| s.as_ref().map_or(0.0, |s| s.weight_at_or_below(cut_value)))
            .collect()
    }

    fn cut_value_goes_left(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9
    }

    #[test]
    fn cut_points_pool_classes_and_drop_the_maximum() {
        let mut obs = GreenwaldKhannaNumericAttributeClassObserver::new(10);
        for v in [1.0, 2.0, 3.0] {
            obs.observe_attribute_class(v, 0, 1.0);
        }
        for v in [3.0, 4.0] {
            obs.observe_attribute_class(v, 1, 1.0);
        }
        assert_eq!(obs.cut_point_suggestions(10), vec![1.0, 2.0, 3.0]);
        assert_eq!(obs.number_of_cut_points(), 3);
        assert_eq!(obs.cut_point_suggestions(1).len(), 1);
    }

    #[test]
    fn left_distribution_counts_values_at_or_below_cut() {
        let mut obs = GreenwaldKhannaNumericAttributeClassObserver::new(10);
        obs.observe_attribute_class(1.0, 0, 2.0);
        obs.observe_attribute_class(5.0, 0, 1.0);
        obs.observe_attribute_class(2.0, 1, 1.0);
        assert_eq!(obs.left_class_distribution(2.0), vec![2.0, 1.0]);
        assert_eq!(obs.class_distribution(), vec![3.0, 1.0]);
        assert!(obs.cut_value_goes_left());
    }

    #[test]
    fn probability_prefers_dense_cells() {
        let mut obs = GreenwaldKhannaNumericAttributeClassObserver::new(20);
        for _ in 0..10 {
            obs.observe_attribute_class(1.0, 0, 1.0);
        }
        obs.observe_attribute_class(9.0, 0, 1.0);
        let dense = obs.probability_of_attribute_value_given_class(1.0, 0).unwrap();
        let sparse = obs.probability_of_attribute_value_given_class(5.0, 0).unwrap();
        assert!(dense > sparse);
        assert!(obs.probability_of_attribute_value_given_class(1.0, 3).is_none());
    }

    #[test]
    fn missing_values_and_reset() {
        let mut obs = GreenwaldKhannaNumericAttributeClassObserver::new(5);
        obs.observe_attribute_class(f64::NAN, 0, 1.0);
        assert!(approx_eq(obs.total_weight_observed(), 0.0));
        obs.observe_attribute_class(1.0, 0, 1.0);
        obs.reset();
        assert!(obs.class_distribution().is_empty());
    }
}
