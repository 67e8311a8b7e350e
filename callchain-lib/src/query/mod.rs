use std::collections::{BTreeSet, HashSet, VecDeque};
use crate::error::GraphError;
use crate::function_id::FunctionId;
use crate::graph::{CallGraph, GraphEdge, GraphNode};
use crate::traversal::dfs_traversal;

/// Query interface for call graph analysis
pub trait GraphQuery {
    /// Get all functions reachable from the given function, itself included
    ///
    /// # Errors
    ///
    /// Returns an error if the function is not found in the graph.
    fn reachable_from(&self, id: &FunctionId) -> Result<HashSet<FunctionId>, GraphError>;

    /// Functions called directly or indirectly by `id`, in discovery order.
    /// `id` itself only appears when it is reached again through a cycle.
    ///
    /// # Errors
    ///
    /// Returns an error if the function is not found in the graph.
    fn nested_calls(&self, id: &FunctionId) -> Result<Vec<FunctionId>, GraphError>;

    /// Functions that call `id` directly or indirectly, in discovery order
    ///
    /// # Errors
    ///
    /// Returns an error if the function is not found in the graph.
    fn transitive_callers(&self, id: &FunctionId) -> Result<Vec<FunctionId>, GraphError>;

    fn direct_callers(&self, id: &FunctionId) -> Vec<FunctionId>;
    fn direct_callees(&self, id: &FunctionId) -> Vec<FunctionId>;

    /// Resolve a user-supplied name to node ids.
    ///
    /// Tries a full id, then an exact function name (`Type::method`), then the
    /// last name segment (`method`). Internal functions win over external ones.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing matches.
    fn find_functions(&self, name: &str) -> Result<Vec<FunctionId>, GraphError>;

    fn get_function(&self, id: &FunctionId) -> Option<&GraphNode>;
    fn external_calls(&self) -> Vec<&GraphEdge>;
}

impl GraphQuery for CallGraph {
    fn reachable_from(&self, id: &FunctionId) -> Result<HashSet<FunctionId>, GraphError> {
        ensure_known(self, id)?;
        Ok(dfs_traversal(self, id).reachable)
    }

    fn nested_calls(&self, id: &FunctionId) -> Result<Vec<FunctionId>, GraphError> {
        ensure_known(self, id)?;
        Ok(closure(id, |current| {
            self.get_edges_from(current).into_iter().map(|e| &e.to).collect()
        }))
    }

    fn transitive_callers(&self, id: &FunctionId) -> Result<Vec<FunctionId>, GraphError> {
        ensure_known(self, id)?;
        Ok(closure(id, |current| {
            self.get_edges_to(current).into_iter().map(|e| &e.from).collect()
        }))
    }

    fn direct_callers(&self, id: &FunctionId) -> Vec<FunctionId> {
        self.get_edges_to(id)
            .iter()
            .map(|e| e.from.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn direct_callees(&self, id: &FunctionId) -> Vec<FunctionId> {
        self.get_edges_from(id)
            .iter()
            .map(|e| e.to.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn find_functions(&self, name: &str) -> Result<Vec<FunctionId>, GraphError> {
        let exact_id = FunctionId::new(name.to_string());
        if self.contains(&exact_id) {
            return Ok(vec![exact_id]);
        }

        let matching = |external: bool, short: bool| -> Vec<FunctionId> {
            self.nodes
                .values()
                .filter(|n| n.is_external == external)
                .filter(|n| {
                    if short {
                        n.metadata.short_name() == name
                    } else {
                        n.metadata.name == name
                    }
                })
                .map(|n| n.id.clone())
                .collect()
        };

        for (external, short) in [(false, false), (false, true), (true, false)] {
            let found = matching(external, short);
            if !found.is_empty() {
                return Ok(found);
            }
        }
        Err(GraphError::FunctionNotFound(name.to_string()))
    }

    fn get_function(&self, id: &FunctionId) -> Option<&GraphNode> {
        self.get_node(id)
    }

    fn external_calls(&self) -> Vec<&GraphEdge> {
        self.edges
            .iter()
            .filter(|e| self.nodes.get(&e.to).is_some_and(|n| n.is_external))
            .collect()
    }
}

fn ensure_known(graph: &CallGraph, id: &FunctionId) -> Result<(), GraphError> {
    if graph.contains(id) {
        Ok(())
    } else {
        Err(GraphError::FunctionNotFound(id.to_string()))
    }
}

/// Breadth-first closure over `next`, excluding `start` unless revisited
fn closure<'g, F>(start: &FunctionId, next: F) -> Vec<FunctionId>
where
    F: Fn(&FunctionId) -> Vec<&'g FunctionId>,
{
    let mut found = Vec::new();
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(current) = queue.pop_front() {
        for neighbour in next(&current) {
            if seen.insert(neighbour.clone()) {
                found.push(neighbour.clone());
                queue.push_back(neighbour.clone());
            }
        }
    }

    found
}
