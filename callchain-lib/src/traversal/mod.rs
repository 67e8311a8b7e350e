use std::collections::{HashSet, VecDeque};
use crate::function_id::FunctionId;
use crate::graph::CallGraph;

/// Result of a graph traversal
#[derive(Debug, Clone, Default)]
pub struct TraversalResult {
    pub reachable: HashSet<FunctionId>,
    pub visited_order: Vec<FunctionId>,
}

impl TraversalResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: FunctionId) {
        if self.reachable.insert(id.clone()) {
            self.visited_order.push(id);
        }
    }

    pub fn merge(&mut self, other: TraversalResult) {
        for id in other.visited_order {
            self.add_node(id);
        }
    }
}

/// Depth-first search traversal starting from a single node
#[must_use]
pub fn dfs_traversal(graph: &CallGraph, start: &FunctionId) -> TraversalResult {
    let mut result = TraversalResult::new();
    let mut stack = vec![start.clone()];

    while let Some(current) = stack.pop() {
        if result.reachable.contains(&current) {
            continue;
        }
        // Push in reverse so callees are visited in call order
        for edge in graph.get_edges_from(&current).into_iter().rev() {
            if !result.reachable.contains(&edge.to) {
                stack.push(edge.to.clone());
            }
        }
        result.add_node(current);
    }

    result
}

/// Breadth-first search traversal starting from a single node
#[must_use]
pub fn bfs_traversal(graph: &CallGraph, start: &FunctionId) -> TraversalResult {
    let mut result = TraversalResult::new();
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(current) = queue.pop_front() {
        if result.reachable.contains(&current) {
            continue;
        }
        for edge in graph.get_edges_from(&current) {
            if !result.reachable.contains(&edge.to) {
                queue.push_back(edge.to.clone());
            }
        }
        result.add_node(current);
    }

    result
}

/// Traverse from multiple entry points
#[must_use]
pub fn traversal_from_entries(graph: &CallGraph, entries: &[FunctionId]) -> TraversalResult {
    let mut result = TraversalResult::new();
    for entry in entries {
        result.merge(dfs_traversal(graph, entry));
    }
    result
}
