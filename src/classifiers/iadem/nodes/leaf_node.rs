use crate::classifiers::conditional_tests::attribute_split_suggestion::AttributeSplitSuggestion;
use crate::classifiers::iadem::config::IademConfig;
use crate::classifiers::iadem::nodes::leaf_prediction::LeafPredictor;
use crate::classifiers::iadem::nodes::node::{LearnContext, prediction_error};
use crate::classifiers::iadem::virtual_nodes::{
    NominalVirtualNode, NumericVirtualNode, VirtualNode,
};
use crate::core::drift::DriftEstimator;
use crate::core::instances::Instance;
use crate::error::Result;
use crate::utils::math::{count_non_zero, sum};

/// Records a leaf of the adaptive tree must absorb before an undecided split
/// attempt falls back to the best candidate.
pub const FAST_SPLIT_MIN_RECORDS: u64 = 5000;

#[derive(Default)]
pub struct LeafNode {
    class_distribution: Vec<f64>,
    virtual_nodes: Vec<Option<Box<dyn VirtualNode>>>,
    weight_seen_at_last_split_evaluation: f64,
    records_seen: u64,
    split_enabled: bool,
    predictor: LeafPredictor,
    estimator: Option<Box<dyn DriftEstimator>>,
}

impl LeafNode {
    pub fn new(
        number_of_classes: usize,
        predictor: LeafPredictor,
        estimator: Option<Box<dyn DriftEstimator>>,
    ) -> Self {
        Self {
            class_distribution: vec![0.0; number_of_classes],
            virtual_nodes: Vec::new(),
            weight_seen_at_last_split_evaluation: 0.0,
            records_seen: 0,
            split_enabled: true,
            predictor,
            estimator,
        }
    }

    /// Seeds the per-attribute candidates, indexed by attribute; the leaf only
    /// builds its own when none were given.
    pub fn with_virtual_nodes(mut self, virtual_nodes: Vec<Option<Box<dyn VirtualNode>>>) -> Self {
        self.virtual_nodes = virtual_nodes;
        self
    }

    pub fn class_distribution(&self) -> &[f64] {
        &self.class_distribution
    }

    pub fn weight_seen(&self) -> f64 {
        sum(&self.class_distribution)
    }

    pub fn records_seen(&self) -> u64 {
        self.records_seen
    }

    pub fn split_enabled(&self) -> bool {
        self.split_enabled
    }

    pub fn set_split_enabled(&mut self, enabled: bool) {
        self.split_enabled = enabled;
    }

    pub fn estimator(&self) -> Option<&dyn DriftEstimator> {
        self.estimator.as_deref()
    }

    pub fn virtual_node(&self, attribute_index: usize) -> Option<&dyn VirtualNode> {
        self.virtual_nodes.get(attribute_index)?.as_deref()
    }

    pub fn class_votes(&self, instance: &dyn Instance) -> Vec<f64> {
        self.predictor
            .votes(instance, &self.class_distribution, &self.virtual_nodes)
    }

    fn ensure_virtual_nodes(&mut self, instance: &dyn Instance, config: &IademConfig) {
        if !self.virtual_nodes.is_empty() {
            return;
        }
        let class_index = instance.class_index();
        self.virtual_nodes = (0..instance.number_of_attributes())
            .map(|i| {
                if i == class_index {
                    return None;
                }
                let attribute = instance.attribute_at_index(i)?;
                let vn: Box<dyn VirtualNode> = if attribute.is_nominal() {
                    let values = instance.header().number_of_values_at_index(i).unwrap_or(0);
                    Box::new(NominalVirtualNode::new(i, values))
                } else {
                    let observer = config.numeric_estimator.new_observer(config.numeric_max_bins);
                    Box::new(NumericVirtualNode::new(i, observer))
                };
                Some(vn)
            })
            .collect();
    }

    /// Absorbs one labelled record. When the leaf carries an estimator, it is first
    /// fed the leaf's own 0/1 error on the record.
    pub fn learn(&mut self, instance: &dyn Instance, class_val: usize, ctx: &LearnContext) {
        let weight = instance.weight();

        if self.estimator.is_some() {
            let error = prediction_error(&self.class_votes(instance), class_val);
            if let Some(estimator) = self.estimator.as_mut() {
                estimator.input(error);
            }
        }
        self.predictor.record_outcome(
            instance,
            class_val,
            weight,
            &self.class_distribution,
            &self.virtual_nodes,
        );

        if class_val >= self.class_distribution.len() {
            self.class_distribution.resize(class_val + 1, 0.0);
        }
        self.class_distribution[class_val] += weight;
        self.records_seen += 1;

        self.ensure_virtual_nodes(instance, ctx.config);
        for vn in self.virtual_nodes.iter_mut().flatten() {
            if let Some(value) = instance.value_at_index(vn.attribute_index()) {
                vn.learn(value, class_val, weight);
            }
        }
    }

    pub fn attempt_to_split(
        &mut self,
        ctx: &mut LearnContext,
    ) -> Result<Option<AttributeSplitSuggestion>> {
        if !self.split_enabled {
            return Ok(None);
        }
        let weight_seen = self.weight_seen();
        if weight_seen - self.weight_seen_at_last_split_evaluation < ctx.config.grace_period as f64
        {
            return Ok(None);
        }
        if count_non_zero(&self.class_distribution) < 2 {
            return Ok(None);
        }
        self.weight_seen_at_last_split_evaluation = weight_seen;

        for vn in self.virtual_nodes.iter_mut().flatten() {
            if !vn.heuristic_measure_updated() {
                vn.update_heuristic_measure(&ctx.split)?;
            }
        }

        let mut candidates: Vec<&AttributeSplitSuggestion> = self
            .virtual_nodes
            .iter()
            .flatten()
            .filter_map(|vn| vn.best_split_suggestion())
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }
        candidates.sort_by(|a, b| a.compare(b));
        let best = candidates[0];

        if self.is_decisive(&candidates, ctx)?
            && best.majority_branch_fraction() <= ctx.config.max_branch_fraction
        {
            return Ok(Some(best.clone()));
        }

        if ctx.adaptive.is_some() && self.records_seen > FAST_SPLIT_MIN_RECORDS {
            ctx.counters.splits_by_breaking_ties += 1;
            return Ok(Some(best.clone()));
        }
        Ok(None)
    }

    fn is_decisive(
        &self,
        sorted: &[&AttributeSplitSuggestion],
        ctx: &LearnContext,
    ) -> Result<bool> {
        let d = ctx.config.attribute_differentiation;
        let best = sorted[0].merit_bounds();

        if let [_, _, ..] = sorted {
            let worst = sorted[sorted.len() - 1].merit_bounds();
            let pic = best.percent_in_common(&worst);
            let different = pic <= d;
            let tight_tie = pic >= 1.0 - d && best.width() <= d && worst.width() <= d;
            return Ok(different || tight_tie);
        }

        let Some(unsplit) = ctx
            .split
            .evaluator
            .class_distribution_bounds(&self.class_distribution)?
        else {
            return Ok(false);
        };
        Ok(best.percent_in_common(&unsplit) <= d && best.upper < unsplit.upper)
    }

    /// Forgets everything learned so far; the estimator restarts as well.
    pub fn reset(&mut self) {
        self.class_distribution.iter_mut().for_each(|c| *c = 0.0);
        for vn in self.virtual_nodes.iter_mut().flatten() {
            vn.reset();
        }
        self.weight_seen_at_last_split_evaluation = 0.0;
        self.records_seen = 0;
        self.predictor.reset();
        if let Some(estimator) = self.estimator.as_mut() {
            estimator.reset();
        }
    }
}

impl std::fmt::Debug for LeafNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeafNode")
            .field("class_distribution", &self.class_distribution)
            .field("records_seen", &self.records_seen)
            .field("split_enabled", &self.split_enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::iadem::config::{AdaptiveConfig, IademConfig};
    use crate::classifiers::iadem::counters::TreeCounters;
    use crate::classifiers::iadem::instance_conditional_test::NumericAttributeBinaryTest;
    use crate::testing::{header_binary, instance_of};

    fn config() -> IademConfig {
        IademConfig {
            grace_period: 50,
            ..Default::default()
        }
    }

    fn leaf() -> LeafNode {
        LeafNode::new(2, LeafPredictor::MajorityClass, None)
    }

    #[test]
    fn learning_updates_distribution_and_observers() {
        let header = header_binary();
        let config = config();
        let mut counters = TreeCounters::default();
        let ctx = LearnContext::new(&config, None, &mut counters, 2);
        let mut leaf = leaf();

        leaf.learn(&instance_of(&header, &[0.4, 1.0, 1.0]), 1, &ctx);
        leaf.learn(&instance_of(&header, &[f64::NAN, 0.0, 0.0]), 0, &ctx);

        assert_eq!(leaf.class_distribution(), &[1.0, 1.0]);
        assert_eq!(leaf.records_seen(), 2);
        assert!(leaf.virtual_node(2).is_none());
        let numeric = leaf.virtual_node(0).unwrap();
        assert_eq!(numeric.observer().total_weight_observed(), 1.0);
        let nominal = leaf.virtual_node(1).unwrap();
        assert_eq!(nominal.observer().total_weight_observed(), 2.0);
    }

    #[test]
    fn splits_on_the_separating_attribute_after_the_grace_period() {
        let header = header_binary();
        let config = config();
        let mut counters = TreeCounters::default();
        let mut ctx = LearnContext::new(&config, None, &mut counters, 2);
        let mut leaf = leaf();

        for i in 0..49 {
            let x = (i % 10) as f64 / 10.0;
            let class = usize::from(x >= 0.5);
            leaf.learn(&instance_of(&header, &[x, (i % 2) as f64, class as f64]), class, &ctx);
            assert!(leaf.attempt_to_split(&mut ctx).unwrap().is_none());
        }

        let mut decision = None;
        for i in 49..2000 {
            let x = (i % 10) as f64 / 10.0;
            let class = usize::from(x >= 0.5);
            leaf.learn(&instance_of(&header, &[x, (i % 2) as f64, class as f64]), class, &ctx);
            if let Some(suggestion) = leaf.attempt_to_split(&mut ctx).unwrap() {
                decision = Some(suggestion);
                break;
            }
        }

        let suggestion = decision.expect("separable data should split");
        assert_eq!(suggestion.attribute_index(), 0);
        assert!(suggestion.split_test().as_any().is::<NumericAttributeBinaryTest>());
        assert_eq!(ctx.counters.splits_by_breaking_ties, 0);
    }

    #[test]
    fn pure_or_disabled_leaves_never_split() {
        let header = header_binary();
        let config = config();
        let mut counters = TreeCounters::default();
        let mut ctx = LearnContext::new(&config, None, &mut counters, 2);

        let mut pure = leaf();
        for i in 0..200 {
            pure.learn(&instance_of(&header, &[i as f64, 0.0, 0.0]), 0, &ctx);
        }
        assert!(pure.attempt_to_split(&mut ctx).unwrap().is_none());

        let mut disabled = leaf();
        disabled.set_split_enabled(false);
        for i in 0..200 {
            let class = usize::from(i >= 100);
            disabled.learn(&instance_of(&header, &[i as f64, 0.0, class as f64]), class, &ctx);
        }
        assert!(disabled.attempt_to_split(&mut ctx).unwrap().is_none());
    }

    #[test]
    fn adaptive_leaf_breaks_ties_after_enough_records() {
        let header = header_binary();
        let config = IademConfig {
            grace_period: 10_000,
            ..Default::default()
        };
        let adaptive = AdaptiveConfig::default();
        let mut counters = TreeCounters::default();
        let mut ctx = LearnContext::new(&config, Some(&adaptive), &mut counters, 2);
        let mut leaf = LeafNode::new(2, LeafPredictor::MajorityClass, Some(adaptive.new_estimator()));

        // Constant numeric attribute and a nominal one independent of the class.
        for i in 0..10_000u32 {
            let class = (i % 2) as usize;
            leaf.learn(&instance_of(&header, &[3.0, ((i / 2) % 2) as f64, class as f64]), class, &ctx);
        }
        assert!(leaf.records_seen() > FAST_SPLIT_MIN_RECORDS);
        assert!(leaf.attempt_to_split(&mut ctx).unwrap().is_some());
        assert_eq!(ctx.counters.splits_by_breaking_ties, 1);
        assert!(leaf.estimator().is_some());
    }

    #[test]
    fn reset_clears_statistics_but_keeps_structure() {
        let header = header_binary();
        let config = config();
        let mut counters = TreeCounters::default();
        let ctx = LearnContext::new(&config, None, &mut counters, 2);
        let mut leaf = leaf();
        for i in 0..20 {
            leaf.learn(&instance_of(&header, &[i as f64, 1.0, 1.0]), 1, &ctx);
        }
        leaf.reset();
        assert_eq!(leaf.class_distribution(), &[0.0, 0.0]);
        assert_eq!(leaf.records_seen(), 0);
        assert_eq!(leaf.virtual_node(0).unwrap().observer().total_weight_observed(), 0.0);
    }
}
