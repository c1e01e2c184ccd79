use crate::classifiers::iadem::instance_conditional_test::InstanceConditionalTest;
use crate::classifiers::iadem::split_criteria::MeritBounds;
use std::cmp::Ordering;

/// Candidate split of a leaf: the test, the class distribution each branch would
/// receive, and the confidence interval on the resulting impurity.
#[derive(Clone, Debug)]
pub struct AttributeSplitSuggestion {
    split_test: Box<dyn InstanceConditionalTest>,
    resulting_class_distributions: Vec<Vec<f64>>,
    merit: MeritBounds,
    attribute_index: usize,
}

impl AttributeSplitSuggestion {
    pub fn new(
        split_test: Box<dyn InstanceConditionalTest>,
        resulting_class_distributions: Vec<Vec<f64>>,
        merit: MeritBounds,
        attribute_index: usize,
    ) -> Self {
        Self {
            split_test,
            resulting_class_distributions,
            merit,
            attribute_index,
        }
    }

    pub fn split_test(&self) -> &dyn InstanceConditionalTest {
        self.split_test.as_ref()
    }

    pub fn number_of_splits(&self) -> usize {
        self.resulting_class_distributions.len()
    }

    pub fn resulting_class_distribution_from_split(&self, split_index: usize) -> Option<&[f64]> {
        self.resulting_class_distributions
            .get(split_index)
            .map(Vec::as_slice)
    }

    pub fn merit(&self) -> f64 {
        self.merit.upper
    }

    pub fn merit_lower_bound(&self) -> f64 {
        self.merit.lower
    }

    pub fn merit_bounds(&self) -> MeritBounds {
        self.merit
    }

    pub fn attribute_index(&self) -> usize {
        self.attribute_index
    }

    pub fn majority_branch_fraction(&self) -> f64 {
        let weights: Vec<f64> = self
            .resulting_class_distributions
            .iter()
            .map(|d| d.iter().sum())
            .collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        weights.iter().copied().fold(0.0, f64::max) / total
    }

    /// Ascending by merit upper bound, then lower bound, then attribute index.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.merit
            .upper
            .total_cmp(&other.merit.upper)
            .then(self.merit.lower.total_cmp(&other.merit.lower))
            .then(self.attribute_index.cmp(&other.attribute_index))
    }

    pub fn is_better_than(&self, other: &Self) -> bool {
        (self.merit.upper, self.merit.lower) < (other.merit.upper, other.merit.lower)
    }
}
