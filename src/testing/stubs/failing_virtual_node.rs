use crate::classifiers::attribute_class_observers::{
    AttributeClassObserver, NominalAttributeClassObserver,
};
use crate::classifiers::conditional_tests::attribute_split_suggestion::AttributeSplitSuggestion;
use crate::classifiers::iadem::virtual_nodes::{SplitContext, VirtualNode};
use crate::error::{IademError, Result};
use std::any::Any;

/// Observes like a nominal virtual node but fails every heuristic update with a
/// computation error.
pub struct FailingVirtualNode {
    attribute_index: usize,
    observer: NominalAttributeClassObserver,
}

impl FailingVirtualNode {
    pub fn new(attribute_index: usize) -> Self {
        Self {
            attribute_index,
            observer: NominalAttributeClassObserver::new(),
        }
    }
}

impl VirtualNode for FailingVirtualNode {
    fn learn(&mut self, value: f64, class_val: usize, weight: f64) {
        self.observer.observe_attribute_class(value, class_val, weight);
    }

    fn update_heuristic_measure(&mut self, _ctx: &SplitContext) -> Result<()> {
        Err(IademError::Computation {
            context: "failing virtual node",
            value: -1.0,
        })
    }

    fn heuristic_measure_updated(&self) -> bool {
        false
    }

    fn best_split_suggestion(&self) -> Option<&AttributeSplitSuggestion> {
        None
    }

    fn attribute_index(&self) -> usize {
        self.attribute_index
    }

    fn observer(&self) -> &dyn AttributeClassObserver {
        &self.observer
    }

    fn reset(&mut self) {
        self.observer.reset();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
