use crate::classifiers::iadem::config::{AdaptiveConfig, IademConfig};
use crate::classifiers::iadem::counters::{NodeCount, TreeCounters};
use crate::classifiers::iadem::nodes::leaf_node::LeafNode;
use crate::classifiers::iadem::nodes::leaf_prediction::LeafPredictor;
use crate::classifiers::iadem::nodes::split_node::SplitNode;
use crate::classifiers::iadem::virtual_nodes::SplitContext;
use crate::core::instances::Instance;
use crate::error::Result;
use crate::utils::math::max_index;
use tracing::{debug, info};

pub struct LearnContext<'a> {
    pub config: &'a IademConfig,
    pub split: SplitContext,
    pub adaptive: Option<&'a AdaptiveConfig>,
    pub counters: &'a mut TreeCounters,
}

impl<'a> LearnContext<'a> {
    pub fn new(
        config: &'a IademConfig,
        adaptive: Option<&'a AdaptiveConfig>,
        counters: &'a mut TreeCounters,
        number_of_classes: usize,
    ) -> Self {
        Self {
            config,
            split: SplitContext {
                evaluator: config.split_evaluator(),
                policy: config.split_test_policy,
                number_of_classes,
                max_cut_points: config.numeric_max_bins,
            },
            adaptive,
            counters,
        }
    }

    pub fn number_of_classes(&self) -> usize {
        self.split.number_of_classes
    }

    pub fn new_leaf(&self) -> LeafNode {
        LeafNode::new(
            self.number_of_classes(),
            LeafPredictor::new(self.config.leaf_prediction),
            self.adaptive.map(AdaptiveConfig::new_estimator),
        )
    }
}

/// Replacement a split node asks its parent slot to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralChange {
    Prune,
    Swap(usize),
}

pub(crate) fn prediction_error(votes: &[f64], class_val: usize) -> f64 {
    if max_index(votes) == class_val { 0.0 } else { 1.0 }
}

#[derive(Debug)]
pub enum Node {
    Leaf(LeafNode),
    Split(SplitNode),
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Split(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&SplitNode> {
        match self {
            Node::Split(split) => Some(split),
            Node::Leaf(_) => None,
        }
    }

    pub fn class_distribution(&self) -> &[f64] {
        match self {
            Node::Leaf(leaf) => leaf.class_distribution(),
            Node::Split(split) => split.class_distribution(),
        }
    }

    pub fn class_votes(&self, instance: &dyn Instance) -> Vec<f64> {
        match self {
            Node::Leaf(leaf) => leaf.class_votes(instance),
            Node::Split(split) => split.class_votes(instance),
        }
    }

    pub fn count_nodes(&self) -> NodeCount {
        match self {
            Node::Leaf(_) => NodeCount::LEAF,
            Node::Split(split) => split.count_nodes(),
        }
    }

    /// Learns one record, replacing this node in place when it splits, is pruned
    /// or is swapped for an alternative.
    pub fn learn(
        &mut self,
        instance: &dyn Instance,
        class_val: usize,
        ctx: &mut LearnContext,
        level: usize,
    ) -> Result<()> {
        match self {
            Node::Leaf(leaf) => {
                leaf.learn(instance, class_val, ctx);
                let Some(suggestion) = leaf.attempt_to_split(ctx)? else {
                    return Ok(());
                };
                let old = std::mem::take(leaf);
                let split = SplitNode::from_leaf(old, &suggestion, ctx);
                let branches = split.number_of_children();
                ctx.counters.add(NodeCount {
                    nodes: branches,
                    leaves: branches.saturating_sub(1),
                });
                debug!(
                    attribute = suggestion.attribute_index(),
                    merit_lower = suggestion.merit_lower_bound(),
                    merit_upper = suggestion.merit(),
                    branches,
                    level,
                    "split committed"
                );
                *self = Node::Split(split);
            }
            Node::Split(split) => {
                let Some(change) = split.learn(instance, class_val, ctx, level)? else {
                    return Ok(());
                };
                match change {
                    StructuralChange::Prune => {
                        let removed = split.count_nodes();
                        let Some(mut leaf) = split.take_shadow_leaf() else {
                            return Ok(());
                        };
                        leaf.set_split_enabled(true);
                        ctx.counters.remove(removed);
                        ctx.counters.add(NodeCount::LEAF);
                        ctx.counters.pruned_subtrees += 1;
                        info!(
                            removed_nodes = removed.nodes,
                            nodes = ctx.counters.nodes,
                            pruned = ctx.counters.pruned_subtrees,
                            level,
                            "subtree pruned"
                        );
                        *self = Node::Leaf(leaf);
                    }
                    StructuralChange::Swap(index) => {
                        let Some(promoted) = split.take_alternative(index) else {
                            return Ok(());
                        };
                        let removed = split.count_nodes();
                        ctx.counters.remove(removed);
                        ctx.counters.interchanged_trees += 1;
                        info!(
                            removed_nodes = removed.nodes,
                            nodes = ctx.counters.nodes,
                            interchanged = ctx.counters.interchanged_trees,
                            level,
                            "alternative subtree swapped in"
                        );
                        *self = promoted;
                    }
                }
            }
        }
        Ok(())
    }
}
