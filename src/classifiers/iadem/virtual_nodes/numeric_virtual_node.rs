use crate::classifiers::attribute_class_observers::{
    AttributeClassObserver, NumericAttributeClassObserver,
};
use crate::classifiers::conditional_tests::attribute_split_suggestion::AttributeSplitSuggestion;
use crate::classifiers::iadem::instance_conditional_test::NumericAttributeBinaryTest;
use crate::classifiers::iadem::virtual_nodes::virtual_node::{SplitContext, VirtualNode, sized};
use crate::error::Result;
use std::any::Any;

pub struct NumericVirtualNode {
    attribute_index: usize,
    observer: Box<dyn NumericAttributeClassObserver>,
    best_split: Option<AttributeSplitSuggestion>,
    heuristic_measure_updated: bool,
}

impl NumericVirtualNode {
    pub fn new(attribute_index: usize, observer: Box<dyn NumericAttributeClassObserver>) -> Self {
        Self {
            attribute_index,
            observer,
            best_split: None,
            heuristic_measure_updated: false,
        }
    }

    fn split_at(&self, cut: f64, number_of_classes: usize) -> Option<Vec<Vec<f64>>> {
        let total = self.observer.class_distribution();
        let left = self.observer.left_class_distribution(cut);
        let right: Vec<f64> = total
            .iter()
            .enumerate()
            .map(|(i, t)| (t - left.get(i).copied().unwrap_or(0.0)).max(0.0))
            .collect();

        let left_sum: f64 = left.iter().sum();
        let right_sum: f64 = right.iter().sum();
        if left_sum <= 0.0 || right_sum <= 0.0 {
            return None;
        }
        Some(vec![
            sized(left, number_of_classes),
            sized(right, number_of_classes),
        ])
    }
}

impl VirtualNode for NumericVirtualNode {
    fn learn(&mut self, value: f64, class_val: usize, weight: f64) {
        if value.is_nan() {
            return;
        }
        self.observer.observe_attribute_class(value, class_val, weight);
        self.heuristic_measure_updated = false;
    }

    fn update_heuristic_measure(&mut self, ctx: &SplitContext) -> Result<()> {
        if self.heuristic_measure_updated {
            return Ok(());
        }
        self.best_split = None;

        let goes_left = self.observer.cut_value_goes_left();
        for cut in self.observer.cut_point_suggestions(ctx.max_cut_points) {
            let Some(branches) = self.split_at(cut, ctx.number_of_classes) else {
                continue;
            };
            let Some(merit) = ctx.evaluator.merit_bounds(&branches)? else {
                continue;
            };
            let test = NumericAttributeBinaryTest::new(self.attribute_index, cut, goes_left);
            let candidate =
                AttributeSplitSuggestion::new(Box::new(test), branches, merit, self.attribute_index);
            if self
                .best_split
                .as_ref()
                .is_none_or(|best| candidate.is_better_than(best))
            {
                self.best_split = Some(candidate);
            }
        }

        self.heuristic_measure_updated = true;
        Ok(())
    }

    fn heuristic_measure_updated(&self) -> bool {
        self.heuristic_measure_updated
    }

    fn best_split_suggestion(&self) -> Option<&AttributeSplitSuggestion> {
        self.best_split.as_ref()
    }

    fn attribute_index(&self) -> usize {
        self.attribute_index
    }

    fn observer(&self) -> &dyn AttributeClassObserver {
        self.observer.as_ref()
    }

    fn reset(&mut self) {
        self.observer.reset();
        self.best_split = None;
        self.heuristic_measure_updated = false;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
