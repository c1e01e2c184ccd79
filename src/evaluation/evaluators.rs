use crate::core::instances::Instance;
use crate::evaluation::{Estimator, Measurement};
use crate::utils::math::max_index;

pub trait PerformanceEvaluator {
    fn reset(&mut self);
    fn add_result(&mut self, instance: &dyn Instance, votes: Vec<f64>);
    fn performance(&self) -> Vec<Measurement>;
}

/// Weighted accuracy and Cohen's kappa over every scored record.
///
/// Records with a missing class, an empty vote vector or a non-positive weight
/// are ignored.
pub struct BasicClassificationEvaluator<E: Estimator> {
    number_of_classes: usize,
    accuracy: E,
    predicted_share: Vec<E>,
    actual_share: Vec<E>,
    weight_seen: f64,
    instances_seen: u64,
}

impl<E: Estimator> BasicClassificationEvaluator<E> {
    pub fn new(number_of_classes: usize) -> Self {
        let number_of_classes = number_of_classes.max(1);
        Self {
            number_of_classes,
            accuracy: E::default(),
            predicted_share: (0..number_of_classes).map(|_| E::default()).collect(),
            actual_share: (0..number_of_classes).map(|_| E::default()).collect(),
            weight_seen: 0.0,
            instances_seen: 0,
        }
    }

    pub fn weight_seen(&self) -> f64 {
        self.weight_seen
    }

    pub fn instances_seen(&self) -> u64 {
        self.instances_seen
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy.estimation()
    }

    pub fn kappa(&self) -> f64 {
        if self.accuracy.total_weight() <= 0.0 {
            return 0.0;
        }
        let p0 = self.accuracy.estimation();
        let pc: f64 = self
            .predicted_share
            .iter()
            .zip(&self.actual_share)
            .map(|(p, a)| p.estimation() * a.estimation())
            .sum();
        if pc >= 1.0 {
            return 0.0;
        }
        (p0 - pc) / (1.0 - pc)
    }
}

impl<E: Estimator> PerformanceEvaluator for BasicClassificationEvaluator<E> {
    fn reset(&mut self) {
        *self = Self::new(self.number_of_classes);
    }

    fn add_result(&mut self, instance: &dyn Instance, votes: Vec<f64>) {
        let weight = instance.weight();
        if votes.is_empty() || !(weight > 0.0) {
            return;
        }
        let Some(class_val) = instance.class_value() else {
            return;
        };
        let actual = class_val as usize;
        if class_val < 0.0 || actual >= self.number_of_classes {
            return;
        }
        let predicted = max_index(&votes);

        self.weight_seen += weight;
        self.instances_seen += 1;
        self.accuracy
            .add(if predicted == actual { 1.0 } else { 0.0 }, weight);
        for class in 0..self.number_of_classes {
            self.predicted_share[class].add(if class == predicted { 1.0 } else { 0.0 }, weight);
            self.actual_share[class].add(if class == actual { 1.0 } else { 0.0 }, weight);
        }
    }

    fn performance(&self) -> Vec<Measurement> {
        vec![
            Measurement::new("accuracy", self.accuracy()),
            Measurement::new("kappa", self.kappa()),
            Measurement::new("weight_seen", self.weight_seen),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::BasicEstimator;
    use crate::testing::{header_binary, instance_of};

    const EPS: f64 = 1e-12;

    fn evaluator() -> BasicClassificationEvaluator<BasicEstimator> {
        BasicClassificationEvaluator::new(2)
    }

    #[test]
    fn starts_without_data() {
        let e = evaluator();
        assert!(e.accuracy().is_nan());
        assert_eq!(e.kappa(), 0.0);
        assert_eq!(e.instances_seen(), 0);
    }

    #[test]
    fn perfect_predictions_give_unit_kappa() {
        let header = header_binary();
        let mut e = evaluator();
        for i in 0..10 {
            let class = (i % 2) as f64;
            let mut votes = vec![0.0, 0.0];
            votes[i % 2] = 1.0;
            e.add_result(&instance_of(&header, &[0.0, 0.0, class]), votes);
        }
        assert!((e.accuracy() - 1.0).abs() < EPS);
        assert!((e.kappa() - 1.0).abs() < EPS);
        assert_eq!(e.instances_seen(), 10);
        assert_eq!(e.weight_seen(), 10.0);
    }

    #[test]
    fn majority_guessing_has_zero_kappa() {
        let header = header_binary();
        let mut e = evaluator();
        for i in 0..10 {
            let class = if i < 8 { 0.0 } else { 1.0 };
            e.add_result(&instance_of(&header, &[0.0, 0.0, class]), vec![0.9, 0.1]);
        }
        assert!((e.accuracy() - 0.8).abs() < EPS);
        assert!(e.kappa().abs() < EPS);
    }

    #[test]
    fn empty_votes_and_missing_class_are_ignored() {
        let header = header_binary();
        let mut e = evaluator();
        e.add_result(&instance_of(&header, &[0.0, 0.0, 1.0]), Vec::new());
        e.add_result(&instance_of(&header, &[0.0, 0.0, f64::NAN]), vec![1.0, 0.0]);
        assert_eq!(e.instances_seen(), 0);

        let names: Vec<_> = e.performance().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["accuracy", "kappa", "weight_seen"]);
    }

    #[test]
    fn reset_forgets_everything() {
        let header = header_binary();
        let mut e = evaluator();
        e.add_result(&instance_of(&header, &[0.0, 0.0, 1.0]), vec![0.0, 1.0]);
        e.reset();
        assert!(e.accuracy().is_nan());
        assert_eq!(e.weight_seen(), 0.0);
    }
}
