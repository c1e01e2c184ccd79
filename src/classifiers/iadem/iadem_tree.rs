use crate::classifiers::Classifier;
use crate::classifiers::iadem::config::{AdaptiveConfig, IademConfig};
use crate::classifiers::iadem::counters::{NodeCount, TreeCounters};
use crate::classifiers::iadem::nodes::{LearnContext, Node};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::{IademError, Result};
use crate::evaluation::Measurement;
use crate::utils::math::normalize_votes;
use std::sync::Arc;

/// Incremental decision tree that splits once the merit intervals of the
/// candidate attributes can be told apart.
///
/// Built with [`IademTree::new_adaptive`], every split node also watches its own
/// error and grows alternative subtrees on drift, swapping one in or pruning
/// back to a leaf when that is significantly better.
pub struct IademTree {
    config: IademConfig,
    adaptive: Option<AdaptiveConfig>,
    header: Option<Arc<InstanceHeader>>,
    root: Option<Node>,
    counters: TreeCounters,
    weight_seen: f64,
}

impl IademTree {
    pub fn new(config: IademConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            adaptive: None,
            header: None,
            root: None,
            counters: TreeCounters::default(),
            weight_seen: 0.0,
        })
    }

    pub fn new_adaptive(config: IademConfig, adaptive: AdaptiveConfig) -> Result<Self> {
        let mut tree = Self::new(config)?;
        tree.adaptive = Some(adaptive);
        Ok(tree)
    }

    pub fn is_adaptive(&self) -> bool {
        self.adaptive.is_some()
    }

    pub fn config(&self) -> &IademConfig {
        &self.config
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn counters(&self) -> &TreeCounters {
        &self.counters
    }

    pub fn number_of_nodes(&self) -> usize {
        self.counters.nodes
    }

    pub fn number_of_leaves(&self) -> usize {
        self.counters.leaves
    }

    pub fn number_of_internal_nodes(&self) -> usize {
        self.counters.internal_nodes()
    }

    pub fn splits_by_breaking_ties(&self) -> u64 {
        self.counters.splits_by_breaking_ties
    }

    pub fn interchanged_trees(&self) -> u64 {
        self.counters.interchanged_trees
    }

    pub fn deleted_trees(&self) -> u64 {
        self.counters.deleted_trees
    }

    pub fn pruned_subtrees(&self) -> u64 {
        self.counters.pruned_subtrees
    }

    pub fn training_weight_seen(&self) -> f64 {
        self.weight_seen
    }

    pub fn count_nodes_by_traversal(&self) -> NodeCount {
        self.root
            .as_ref()
            .map_or(NodeCount::default(), Node::count_nodes)
    }

    fn number_of_classes(&self, instance: &dyn Instance) -> usize {
        self.header
            .as_ref()
            .map_or_else(|| instance.number_of_classes(), |h| h.number_of_classes())
    }
}

impl Classifier for IademTree {
    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        let number_of_classes = self.number_of_classes(instance);
        let votes = self
            .root
            .as_ref()
            .map(|root| root.class_votes(instance))
            .unwrap_or_default();
        normalize_votes(votes, number_of_classes)
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) {
        self.header = Some(header);
    }

    fn train_on_instance(&mut self, instance: &dyn Instance) -> Result<()> {
        let Some(class_value) = instance.class_value() else {
            return Ok(());
        };
        let weight = instance.weight();
        if !(weight > 0.0) {
            return Ok(());
        }
        let number_of_classes = self.number_of_classes(instance);
        if class_value < 0.0 || class_value as usize >= number_of_classes {
            return Err(IademError::InvalidMeasureInput(format!(
                "class value {class_value} outside the {number_of_classes} known classes"
            )));
        }
        let class_val = class_value as usize;

        let mut ctx = LearnContext::new(
            &self.config,
            self.adaptive.as_ref(),
            &mut self.counters,
            number_of_classes,
        );
        if self.root.is_none() {
            let leaf = ctx.new_leaf();
            ctx.counters.add(NodeCount::LEAF);
            self.root = Some(Node::Leaf(leaf));
        }
        if let Some(root) = self.root.as_mut() {
            root.learn(instance, class_val, &mut ctx, 0)?;
        }
        self.weight_seen += weight;
        Ok(())
    }

    fn get_model_measurements(&self) -> Vec<Measurement> {
        let mut measurements = vec![
            Measurement::new("nodes", self.number_of_nodes() as f64),
            Measurement::new("leaves", self.number_of_leaves() as f64),
            Measurement::new("internal_nodes", self.number_of_internal_nodes() as f64),
            Measurement::new("splits_by_breaking_ties", self.splits_by_breaking_ties() as f64),
        ];
        if self.is_adaptive() {
            measurements.extend([
                Measurement::new("interchanged_trees", self.interchanged_trees() as f64),
                Measurement::new("deleted_trees", self.deleted_trees() as f64),
                Measurement::new("pruned_subtrees", self.pruned_subtrees() as f64),
            ]);
        }
        measurements
    }
}
