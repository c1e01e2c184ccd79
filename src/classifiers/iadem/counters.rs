#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeCount {
    pub nodes: usize,
    pub leaves: usize,
}

impl NodeCount {
    pub const LEAF: NodeCount = NodeCount {
        nodes: 1,
        leaves: 1,
    };

    pub fn internal_nodes(&self) -> usize {
        self.nodes - self.leaves
    }
}

impl std::ops::Add for NodeCount {
    type Output = NodeCount;

    fn add(self, rhs: NodeCount) -> NodeCount {
        NodeCount {
            nodes: self.nodes + rhs.nodes,
            leaves: self.leaves + rhs.leaves,
        }
    }
}

impl std::ops::AddAssign for NodeCount {
    fn add_assign(&mut self, rhs: NodeCount) {
        *self = *self + rhs;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeCounters {
    pub nodes: usize,
    pub leaves: usize,
    pub splits_by_breaking_ties: u64,
    pub interchanged_trees: u64,
    pub deleted_trees: u64,
    pub pruned_subtrees: u64,
}

impl TreeCounters {
    pub fn internal_nodes(&self) -> usize {
        self.nodes.saturating_sub(self.leaves)
    }

    pub fn node_count(&self) -> NodeCount {
        NodeCount {
            nodes: self.nodes,
            leaves: self.leaves,
        }
    }

    pub fn add(&mut self, count: NodeCount) {
        self.nodes += count.nodes;
        self.leaves += count.leaves;
    }

    pub fn remove(&mut self, count: NodeCount) {
        debug_assert!(count.nodes <= self.nodes && count.leaves <= self.leaves);
        self.nodes = self.nodes.saturating_sub(count.nodes);
        self.leaves = self.leaves.saturating_sub(count.leaves);
    }
}
