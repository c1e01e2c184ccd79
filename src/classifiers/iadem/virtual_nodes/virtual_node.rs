use crate::classifiers::attribute_class_observers::AttributeClassObserver;
use crate::classifiers::conditional_tests::attribute_split_suggestion::AttributeSplitSuggestion;
use crate::classifiers::iadem::config::SplitTestPolicy;
use crate::classifiers::iadem::split_criteria::SplitEvaluator;
use crate::error::Result;
use std::any::Any;

#[derive(Clone, Copy, Debug)]
pub struct SplitContext {
    pub evaluator: SplitEvaluator,
    pub policy: SplitTestPolicy,
    pub number_of_classes: usize,
    pub max_cut_points: usize,
}

/// Per-attribute split candidate generator held by a leaf.
///
/// The cached suggestion is only trusted while `heuristic_measure_updated` holds;
/// learning any value invalidates it.
pub trait VirtualNode: Send {
    fn learn(&mut self, value: f64, class_val: usize, weight: f64);
    fn update_heuristic_measure(&mut self, ctx: &SplitContext) -> Result<()>;
    fn heuristic_measure_updated(&self) -> bool;
    fn best_split_suggestion(&self) -> Option<&AttributeSplitSuggestion>;
    fn attribute_index(&self) -> usize;
    fn observer(&self) -> &dyn AttributeClassObserver;
    fn reset(&mut self);
    fn as_any(&self) -> &dyn Any;
}

/// Pads a class distribution with zeros up to `len` entries; longer ones are kept whole.
pub(crate) fn sized(mut dist: Vec<f64>, len: usize) -> Vec<f64> {
    dist.resize(len.max(dist.len()), 0.0);
    dist
}
