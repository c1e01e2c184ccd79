use crate::classifiers::conditional_tests::attribute_split_suggestion::AttributeSplitSuggestion;
use crate::classifiers::iadem::counters::NodeCount;
use crate::classifiers::iadem::instance_conditional_test::InstanceConditionalTest;
use crate::classifiers::iadem::nodes::adaptive::{AdaptiveSplitState, AlternativeTree};
use crate::classifiers::iadem::nodes::leaf_node::LeafNode;
use crate::classifiers::iadem::nodes::node::{LearnContext, Node, StructuralChange, prediction_error};
use crate::core::instances::Instance;
use crate::error::{IademError, Result};
use tracing::warn;

pub struct SplitNode {
    class_distribution: Vec<f64>,
    split_test: Box<dyn InstanceConditionalTest>,
    children: Vec<Node>,
    adaptive: Option<AdaptiveSplitState>,
}

impl SplitNode {
    pub fn new(
        split_test: Box<dyn InstanceConditionalTest>,
        class_distribution: Vec<f64>,
        children: Vec<Node>,
    ) -> Self {
        Self {
            class_distribution,
            split_test,
            children,
            adaptive: None,
        }
    }

    pub fn with_adaptive_state(mut self, state: AdaptiveSplitState) -> Self {
        self.adaptive = Some(state);
        self
    }

    /// Turns a leaf into a split node with one fresh leaf per branch. In the
    /// adaptive tree the old leaf stays behind as the shadow prediction leaf.
    pub fn from_leaf(
        mut leaf: LeafNode,
        suggestion: &AttributeSplitSuggestion,
        ctx: &LearnContext,
    ) -> Self {
        let children = (0..suggestion.number_of_splits())
            .map(|_| Node::Leaf(ctx.new_leaf()))
            .collect();
        let node = Self::new(
            suggestion.split_test().clone_box(),
            leaf.class_distribution().to_vec(),
            children,
        );
        match ctx.adaptive {
            Some(adaptive) => {
                leaf.set_split_enabled(false);
                node.with_adaptive_state(AdaptiveSplitState::new(adaptive.new_estimator(), leaf))
            }
            None => node,
        }
    }

    pub fn split_test(&self) -> &dyn InstanceConditionalTest {
        self.split_test.as_ref()
    }

    pub fn class_distribution(&self) -> &[f64] {
        &self.class_distribution
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn number_of_children(&self) -> usize {
        self.children.len()
    }

    pub fn adaptive_state(&self) -> Option<&AdaptiveSplitState> {
        self.adaptive.as_ref()
    }

    pub fn alternatives(&self) -> &[AlternativeTree] {
        match &self.adaptive {
            Some(state) => state.alternatives(),
            None => &[],
        }
    }

    pub fn shadow_leaf(&self) -> Option<&LeafNode> {
        self.adaptive.as_ref().map(AdaptiveSplitState::shadow_leaf)
    }

    pub fn class_votes(&self, instance: &dyn Instance) -> Vec<f64> {
        match self
            .split_test
            .branch_for_instance(instance)
            .and_then(|branch| self.children.get(branch))
        {
            Some(child) => child.class_votes(instance),
            None => self.class_distribution.clone(),
        }
    }

    pub fn count_nodes(&self) -> NodeCount {
        let mut count = NodeCount {
            nodes: 1,
            leaves: 0,
        };
        for child in &self.children {
            count += child.count_nodes();
        }
        for alternative in self.alternatives() {
            count += alternative.root().count_nodes();
        }
        count
    }

    pub(crate) fn take_shadow_leaf(&mut self) -> Option<LeafNode> {
        self.adaptive.take().map(AdaptiveSplitState::into_shadow_leaf)
    }

    pub(crate) fn take_alternative(&mut self, index: usize) -> Option<Node> {
        self.adaptive.as_mut()?.take_alternative(index)
    }

    pub fn learn(
        &mut self,
        instance: &dyn Instance,
        class_val: usize,
        ctx: &mut LearnContext,
        level: usize,
    ) -> Result<Option<StructuralChange>> {
        if class_val >= self.class_distribution.len() {
            self.class_distribution.resize(class_val + 1, 0.0);
        }
        self.class_distribution[class_val] += instance.weight();

        if self.adaptive.is_some() {
            let main_error = prediction_error(&self.class_votes(instance), class_val);
            if let Some(state) = self.adaptive.as_mut() {
                let change = state.update(
                    instance,
                    class_val,
                    main_error,
                    self.split_test.as_ref(),
                    ctx,
                    level,
                )?;
                if change.is_some() {
                    return Ok(change);
                }
            }
        }

        let Some(branch) = self.split_test.branch_for_instance(instance) else {
            return Ok(None);
        };
        if branch >= self.children.len() {
            let max = self.split_test.max_branches();
            if branch >= max {
                warn!(branch, max, test = %self.split_test.describe_condition_for_branch(0), "branch outside the split test");
                return Err(IademError::BranchOutOfRange { branch, max });
            }
            let added = branch + 1 - self.children.len();
            self.children
                .extend((0..added).map(|_| Node::Leaf(ctx.new_leaf())));
            ctx.counters.add(NodeCount {
                nodes: added,
                leaves: added,
            });
        }
        self.children[branch].learn(instance, class_val, ctx, level)?;
        Ok(None)
    }
}

impl std::fmt::Debug for SplitNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplitNode")
            .field("test", &self.split_test)
            .field("class_distribution", &self.class_distribution)
            .field("children", &self.children)
            .field("alternatives", &self.alternatives().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::iadem::config::IademConfig;
    use crate::classifiers::iadem::counters::TreeCounters;
    use crate::classifiers::iadem::instance_conditional_test::{
        NominalAttributeMultiwayTest, NumericAttributeBinaryTest,
    };
    use crate::testing::{header_binary, instance_of};

    fn numeric_split(ctx: &LearnContext) -> SplitNode {
        SplitNode::new(
            Box::new(NumericAttributeBinaryTest::new(0, 0.5, true)),
            vec![0.0, 0.0],
            vec![Node::Leaf(ctx.new_leaf()), Node::Leaf(ctx.new_leaf())],
        )
    }

    #[test]
    fn routes_to_children_and_falls_back_on_missing_values() {
        let header = header_binary();
        let config = IademConfig::default();
        let mut counters = TreeCounters::default();
        let mut ctx = LearnContext::new(&config, None, &mut counters, 2);
        let mut node = numeric_split(&ctx);

        node.learn(&instance_of(&header, &[0.2, 0.0, 0.0]), 0, &mut ctx, 0).unwrap();
        node.learn(&instance_of(&header, &[0.9, 0.0, 1.0]), 1, &mut ctx, 0).unwrap();
        node.learn(&instance_of(&header, &[f64::NAN, 0.0, 1.0]), 1, &mut ctx, 0).unwrap();

        assert_eq!(node.class_distribution(), &[1.0, 2.0]);
        assert_eq!(node.children()[0].class_distribution(), &[1.0, 0.0]);
        assert_eq!(node.children()[1].class_distribution(), &[0.0, 1.0]);

        let missing = instance_of(&header, &[f64::NAN, 0.0, 0.0]);
        assert_eq!(node.class_votes(&missing), vec![1.0, 2.0]);
        let left = instance_of(&header, &[0.5, 0.0, 0.0]);
        assert_eq!(node.class_votes(&left), vec![1.0, 0.0]);
    }

    #[test]
    fn multiway_split_grows_up_to_the_declared_values() {
        let header = header_binary();
        let config = IademConfig::default();
        let mut counters = TreeCounters::default();
        let mut ctx = LearnContext::new(&config, None, &mut counters, 2);
        let mut node = SplitNode::new(
            Box::new(NominalAttributeMultiwayTest::new(1, 2)),
            vec![0.0, 0.0],
            vec![Node::Leaf(ctx.new_leaf())],
        );
        ctx.counters.add(node.count_nodes());

        node.learn(&instance_of(&header, &[0.0, 1.0, 1.0]), 1, &mut ctx, 0).unwrap();
        assert_eq!(node.number_of_children(), 2);
        assert_eq!(ctx.counters.node_count(), node.count_nodes());
        assert_eq!(node.count_nodes(), NodeCount { nodes: 3, leaves: 2 });

        let err = node
            .learn(&instance_of(&header, &[0.0, 2.0, 1.0]), 1, &mut ctx, 0)
            .unwrap_err();
        assert_eq!(err, IademError::BranchOutOfRange { branch: 2, max: 2 });
        assert_eq!(node.number_of_children(), 2);
    }

    #[test]
    fn from_leaf_keeps_distribution_and_counts_children() {
        let header = header_binary();
        let config = IademConfig {
            grace_period: 20,
            ..Default::default()
        };
        let mut counters = TreeCounters::default();
        let mut ctx = LearnContext::new(&config, None, &mut counters, 2);
        let mut leaf = ctx.new_leaf();
        let mut suggestion = None;
        for i in 0..2000 {
            let x = (i % 20) as f64;
            let class = usize::from(x >= 10.0);
            leaf.learn(&instance_of(&header, &[x, 0.0, class as f64]), class, &ctx);
            suggestion = leaf.attempt_to_split(&mut ctx).unwrap();
            if suggestion.is_some() {
                break;
            }
        }
        let suggestion = suggestion.unwrap();
        let dist = leaf.class_distribution().to_vec();
        let node = SplitNode::from_leaf(leaf, &suggestion, &ctx);

        assert_eq!(node.class_distribution(), dist.as_slice());
        assert_eq!(node.number_of_children(), 2);
        assert!(node.children().iter().all(Node::is_leaf));
        assert!(node.adaptive_state().is_none());
        assert_eq!(node.count_nodes(), NodeCount { nodes: 3, leaves: 2 });
    }
}
