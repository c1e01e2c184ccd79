use crate::classifiers::attribute_class_observers::{
    AttributeClassObserver, NominalAttributeClassObserver,
};
use crate::classifiers::conditional_tests::attribute_split_suggestion::AttributeSplitSuggestion;
use crate::classifiers::iadem::instance_conditional_test::{
    InstanceConditionalTest, NominalAttributeBinaryTest, NominalAttributeMultiwayTest,
};
use crate::classifiers::iadem::virtual_nodes::virtual_node::{SplitContext, VirtualNode, sized};
use crate::error::Result;
use crate::utils::math::count_non_zero;
use std::any::Any;

pub struct NominalVirtualNode {
    attribute_index: usize,
    number_of_values: usize,
    observer: NominalAttributeClassObserver,
    best_split: Option<AttributeSplitSuggestion>,
    heuristic_measure_updated: bool,
}

impl NominalVirtualNode {
    pub fn new(attribute_index: usize, number_of_values: usize) -> Self {
        Self {
            attribute_index,
            number_of_values,
            observer: NominalAttributeClassObserver::new(),
            best_split: None,
            heuristic_measure_updated: false,
        }
    }

    fn consider(
        &mut self,
        ctx: &SplitContext,
        test: Box<dyn InstanceConditionalTest>,
        branches: Vec<Vec<f64>>,
    ) -> Result<()> {
        let branches: Vec<Vec<f64>> = branches
            .into_iter()
            .map(|b| sized(b, ctx.number_of_classes))
            .collect();
        let non_empty = branches
            .iter()
            .filter(|b| count_non_zero(b) > 0)
            .count();
        if non_empty < 2 {
            return Ok(());
        }
        let Some(merit) = ctx.evaluator.merit_bounds(&branches)? else {
            return Ok(());
        };
        let candidate = AttributeSplitSuggestion::new(test, branches, merit, self.attribute_index);
        if self
            .best_split
            .as_ref()
            .is_none_or(|best| candidate.is_better_than(best))
        {
            self.best_split = Some(candidate);
        }
        Ok(())
    }
}

impl VirtualNode for NominalVirtualNode {
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

        if ctx.policy.allows_multiway() {
            let test = NominalAttributeMultiwayTest::new(self.attribute_index, self.number_of_values);
            let branches = self.observer.class_dists_resulting_from_multiway_split();
            self.consider(ctx, Box::new(test), branches)?;
        }
        if ctx.policy.allows_binary() {
            for value in 0..self.observer.number_of_values() {
                let test = NominalAttributeBinaryTest::new(self.attribute_index, value);
                let branches = self.observer.class_dists_resulting_from_binary_split(value);
                self.consider(ctx, Box::new(test), branches)?;
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
        &self.observer
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
