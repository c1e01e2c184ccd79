//! Drift handling attached to split nodes of the adaptive tree: a shadow
//! prediction leaf, alternative subtrees grown after a detected change, and the
//! rules that swap, discard or prune them.

use crate::classifiers::iadem::bounds::average_comparison_bound;
use crate::classifiers::iadem::counters::NodeCount;
use crate::classifiers::iadem::instance_conditional_test::InstanceConditionalTest;
use crate::classifiers::iadem::nodes::leaf_node::LeafNode;
use crate::classifiers::iadem::nodes::node::{LearnContext, Node, StructuralChange, prediction_error};
use crate::core::drift::DriftEstimator;
use crate::core::instances::Instance;
use crate::error::Result;
use tracing::{debug, info};

/// Both error estimates must be older than this before they are compared.
pub const MIN_COMPARISON_AGE: u64 = 600;
/// An alternative that has seen this many records without beating the main
/// subtree is dropped.
pub const STALE_ALTERNATIVE_RECORDS: u64 = 10_000;

#[derive(Debug)]
pub struct AlternativeTree {
    root: Node,
    estimator: Box<dyn DriftEstimator>,
    records_seen: u64,
}

impl AlternativeTree {
    pub fn new(root: Node, estimator: Box<dyn DriftEstimator>) -> Self {
        Self {
            root,
            estimator,
            records_seen: 0,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn estimator(&self) -> &dyn DriftEstimator {
        self.estimator.as_ref()
    }

    pub fn records_seen(&self) -> u64 {
        self.records_seen
    }
}

enum Verdict {
    Swap,
    Discard(&'static str),
}

#[derive(Debug)]
pub struct AdaptiveSplitState {
    estimator: Box<dyn DriftEstimator>,
    shadow_leaf: LeafNode,
    alternatives: Vec<AlternativeTree>,
}

impl AdaptiveSplitState {
    pub fn new(estimator: Box<dyn DriftEstimator>, shadow_leaf: LeafNode) -> Self {
        Self {
            estimator,
            shadow_leaf,
            alternatives: Vec::new(),
        }
    }

    pub fn with_alternative(mut self, alternative: AlternativeTree) -> Self {
        self.alternatives.push(alternative);
        self
    }

    pub fn estimator(&self) -> &dyn DriftEstimator {
        self.estimator.as_ref()
    }

    pub fn shadow_leaf(&self) -> &LeafNode {
        &self.shadow_leaf
    }

    pub fn alternatives(&self) -> &[AlternativeTree] {
        &self.alternatives
    }

    pub(crate) fn into_shadow_leaf(self) -> LeafNode {
        self.shadow_leaf
    }

    pub(crate) fn take_alternative(&mut self, index: usize) -> Option<Node> {
        (index < self.alternatives.len()).then(|| self.alternatives.remove(index).root)
    }

    /// Runs the per-record drift bookkeeping of the owning split node. Returns the
    /// replacement the owner's slot must apply, if any; discarding an alternative
    /// and resetting the shadow leaf are handled here.
    pub(crate) fn update(
        &mut self,
        instance: &dyn Instance,
        class_val: usize,
        main_error: f64,
        test: &dyn InstanceConditionalTest,
        ctx: &mut LearnContext,
        level: usize,
    ) -> Result<Option<StructuralChange>> {
        self.estimator.input(main_error);
        self.shadow_leaf.learn(instance, class_val, ctx);

        for alternative in &mut self.alternatives {
            let error = prediction_error(&alternative.root.class_votes(instance), class_val);
            alternative.estimator.input(error);
            alternative.records_seen += 1;
            alternative.root.learn(instance, class_val, ctx, level + 1)?;
        }

        let confidence = ctx.config.split_confidence;
        let main_err = self.estimator.estimation();
        let main_age = self.estimator.delay();

        let verdict = self.alternatives.iter().enumerate().find_map(|(index, alt)| {
            let alt_err = alt.estimator.estimation();
            let alt_age = alt.estimator.delay();
            let mature = main_age > MIN_COMPARISON_AGE && alt_age > MIN_COMPARISON_AGE;
            let bound = average_comparison_bound(main_age as f64, alt_age as f64, confidence);

            if mature && main_err - alt_err > bound {
                return Some((index, Verdict::Swap));
            }
            let duplicate = mature
                && alt
                    .root
                    .as_split()
                    .is_some_and(|split| split.split_test().is_equivalent_to(test));
            if duplicate {
                return Some((index, Verdict::Discard("same test as the main subtree")));
            }
            if mature && alt_err - main_err > bound {
                return Some((index, Verdict::Discard("significantly worse")));
            }
            if alt.records_seen > STALE_ALTERNATIVE_RECORDS && alt_err >= main_err {
                return Some((index, Verdict::Discard("never improved")));
            }
            None
        });

        match verdict {
            Some((index, Verdict::Swap)) => return Ok(Some(StructuralChange::Swap(index))),
            Some((index, Verdict::Discard(reason))) => {
                let discarded = self.alternatives.remove(index);
                let removed = discarded.root.count_nodes();
                ctx.counters.remove(removed);
                ctx.counters.deleted_trees += 1;
                info!(
                    reason,
                    removed_nodes = removed.nodes,
                    nodes = ctx.counters.nodes,
                    deleted = ctx.counters.deleted_trees,
                    level,
                    "alternative subtree discarded"
                );
                return Ok(None);
            }
            None => {}
        }

        if let Some(leaf_estimator) = self.shadow_leaf.estimator() {
            let leaf_err = leaf_estimator.estimation();
            let leaf_age = leaf_estimator.delay();
            if main_age > MIN_COMPARISON_AGE && leaf_age > MIN_COMPARISON_AGE {
                let bound = average_comparison_bound(main_age as f64, leaf_age as f64, confidence);
                if main_err - leaf_err > bound {
                    return Ok(Some(StructuralChange::Prune));
                }
                if leaf_err - main_err > bound {
                    debug!(leaf_err, main_err, level, "shadow leaf reset");
                    self.shadow_leaf.reset();
                }
            }
        }

        if self.estimator.change() {
            let spawn = ctx
                .adaptive
                .filter(|a| a.can_spawn_alternative(level, self.alternatives.len()));
            if let Some(adaptive) = spawn {
                let root = Node::Leaf(ctx.new_leaf());
                self.alternatives
                    .push(AlternativeTree::new(root, adaptive.new_estimator()));
                ctx.counters.add(NodeCount::LEAF);
                debug!(
                    level,
                    alternatives = self.alternatives.len(),
                    main_err,
                    "alternative subtree spawned"
                );
            }
        }
        Ok(None)
    }
}
