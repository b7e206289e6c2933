//! Optional exploratory utility: the full take/skip tree over the catalog.
//! Exponential in the number of items, so it is capped at `MAX_TREE_ITEMS`
//! and is not used by either solver.

use anyhow::{anyhow, Result};
use knap_challenges::{Challenge, Item};
use knap_structs::trace::Decision;
use serde::{Deserialize, Serialize};

pub const MAX_TREE_ITEMS: usize = 12;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DecisionNode {
    /// Number of items decided on the way to this node.
    pub depth: usize,
    /// Item and decision on the edge leading here; `None` at the root.
    pub item: Option<usize>,
    pub decision: Option<Decision>,
    pub total_weight: u64,
    pub total_value: u64,
    /// Infeasible nodes exceed the capacity and are not expanded.
    pub feasible: bool,
    pub children: Vec<DecisionNode>,
}

impl DecisionNode {
    pub fn num_nodes(&self) -> usize {
        1 + self.children.iter().map(DecisionNode::num_nodes).sum::<usize>()
    }

    pub fn num_leaves(&self) -> usize {
        if self.children.is_empty() {
            1
        } else {
            self.children.iter().map(DecisionNode::num_leaves).sum()
        }
    }

    /// Best value over feasible nodes, which is the optimum of the instance.
    pub fn best_value(&self) -> u64 {
        let own = if self.feasible { self.total_value } else { 0 };
        self.children
            .iter()
            .map(DecisionNode::best_value)
            .fold(own, u64::max)
    }
}

pub fn build(challenge: &Challenge) -> Result<DecisionNode> {
    challenge.validate()?;
    if challenge.num_items() > MAX_TREE_ITEMS {
        return Err(anyhow!(
            "Decision tree is limited to {} items, got {}",
            MAX_TREE_ITEMS,
            challenge.num_items()
        ));
    }
    let mut root = DecisionNode {
        depth: 0,
        item: None,
        decision: None,
        total_weight: 0,
        total_value: 0,
        feasible: true,
        children: Vec::new(),
    };
    expand(&mut root, challenge.items(), challenge.capacity() as u64);
    Ok(root)
}

fn expand(node: &mut DecisionNode, items: &[Item], capacity: u64) {
    let Some(item) = items.get(node.depth) else {
        return;
    };
    let total_weight = node.total_weight + item.weight() as u64;
    let mut take = DecisionNode {
        depth: node.depth + 1,
        item: Some(item.id()),
        decision: Some(Decision::Taken),
        total_weight,
        total_value: node.total_value + item.value() as u64,
        feasible: total_weight <= capacity,
        children: Vec::new(),
    };
    if take.feasible {
        expand(&mut take, items, capacity);
    }
    let mut skip = DecisionNode {
        depth: node.depth + 1,
        item: Some(item.id()),
        decision: Some(Decision::Skipped),
        total_weight: node.total_weight,
        total_value: node.total_value,
        feasible: true,
        children: Vec::new(),
    };
    expand(&mut skip, items, capacity);
    node.children = vec![take, skip];
}
