use crate::classifiers::attribute_class_observers::attribute_class_observer::{
    AttributeClassObserver, is_observable,
};
use std::any::Any;

#[derive(Clone, Debug, Default)]
pub struct NominalAttributeClassObserver {
    total_weight_observed: f64,
    attribute_value_distribution_per_class: Vec<Vec<f64>>,
}

impl NominalAttributeClassObserver {
    pub fn new() -> NominalAttributeClassObserver {
        Self::default()
    }

    #[inline]
    fn ensure_value(&mut self, class_val: usize, att_val_int: usize) {
        if class_val >= self.attribute_value_distribution_per_class.len() {
            self.attribute_value_distribution_per_class
                .resize_with(class_val + 1, Vec::new);
        }
        let row = &mut self.attribute_value_distribution_per_class[class_val];
        if att_val_int >= row.len() {
            row.resize(att_val_int + 1, 0.0);
        }
    }

    pub fn number_of_values(&self) -> usize {
        self.attribute_value_distribution_per_class
            .iter()
            .map(|row| row.len())
            .max()
            .unwrap_or(0)
    }

    pub fn value_class_distribution(&self, val_index: usize) -> Vec<f64> {
        self.attribute_value_distribution_per_class
            .iter()
            .map(|row| row.get(val_index).copied().unwrap_or(0.0))
            .collect()
    }

    pub fn class_dists_resulting_from_multiway_split(&self) -> Vec<Vec<f64>> {
        (0..self.number_of_values())
            .map(|v| self.value_class_distribution(v))
            .collect()
    }

    pub fn class_dists_resulting_from_binary_split(&self, val_index: usize) -> Vec<Vec<f64>> {
        let lhs = self.value_class_distribution(val_index);
        let rhs = self
            .attribute_value_distribution_per_class
            .iter()
            .zip(&lhs)
            .map(|(row, left)| (row.iter().sum::<f64>() - left).max(0.0))
            .collect();
        vec![lhs, rhs]
    }
}

impl AttributeClassObserver for NominalAttributeClassObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize, weight: f64) {
        if !is_observable(att_val, weight) || att_val < 0.0 {
            return;
        }
        let att_val_int = att_val as usize;
        self.ensure_value(class_val, att_val_int);
        self.attribute_value_distribution_per_class[class_val][att_val_int] += weight;
        self.total_weight_observed += weight;
    }

    fn probability_of_attribute_value_given_class(
        &self,
        att_val: f64,
        class_val: usize,
    ) -> Option<f64> {
        if att_val.is_nan() || att_val < 0.0 {
            return None;
        }
        let row = self.attribute_value_distribution_per_class.get(class_val)?;
        if row.is_empty() {
            return None;
        }
        let count = row.get(att_val as usize).copied().unwrap_or(0.0);
        let sum: f64 = row.iter().sum();
        let k = row.len() as f64;
        Some((count + 1.0) / (sum + k))
    }

    fn total_weight_observed(&self) -> f64 {
        self.total_weight_observed
    }

    fn class_distribution(&self) -> Vec<f64> {
        self.attribute_value_distribution_per_class
            .iter()
            .map(|row| row.iter().sum())
            .collect()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
