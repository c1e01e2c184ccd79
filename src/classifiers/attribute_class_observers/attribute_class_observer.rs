use std::any::Any;

/// Per-leaf statistics of one attribute, split by class.
///
/// Missing values (`NaN`) and non-positive weights are ignored by every
/// implementation.
pub trait AttributeClassObserver: Send {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize, weight: f64);
    fn probability_of_attribute_value_given_class(
        &self,
        att_val: f64,
        class_val: usize,
    ) -> Option<f64>;
    fn total_weight_observed(&self) -> f64;
    fn class_distribution(&self) -> Vec<f64>;
    fn reset(&mut self);
    fn as_any(&self) -> &dyn Any;
}

/// Numeric observers also propose binary cut points and how the observed weight
/// falls on the left of each.
pub trait NumericAttributeClassObserver: AttributeClassObserver {
    fn number_of_cut_points(&self) -> usize;
    fn cut_point_suggestions(&self, max_cut_points: usize) -> Vec<f64>;
    fn left_class_distribution(&self, cut_value: f64) -> Vec<f64>;
    fn cut_value_goes_left(&self) -> bool;
}

pub(crate) fn is_observable(att_val: f64, weight: f64) -> bool {
    !att_val.is_nan() && weight.is_finite() && weight > 0.0
}

/// Keeps at most `max` of the sorted `points`, picked evenly across the range.
pub(crate) fn thin_evenly(points: Vec<f64>, max: usize) -> Vec<f64> {
    if max == 0 {
        return Vec::new();
    }
    if points.len() <= max {
        return points;
    }
    let step = points.len() as f64 / max as f64;
    (0..max)
        .map(|i| points[((i as f64 + 0.5) * step) as usize])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thinning_keeps_order_and_bound() {
        let points: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let thinned = thin_evenly(points.clone(), 4);
        assert_eq!(thinned, vec![12.0, 37.0, 62.0, 87.0]);
        assert_eq!(thin_evenly(points[..3].to_vec(), 4), vec![0.0, 1.0, 2.0]);
        assert!(thin_evenly(points, 0).is_empty());
    }
}
