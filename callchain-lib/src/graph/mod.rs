use std::collections::{BTreeMap, HashSet};
use crate::ast::FunctionDef;
use crate::error::GraphError;
use crate::function_id::FunctionId;

/// Node in the call graph representing a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: FunctionId,
    pub is_external: bool,
    pub metadata: FunctionDef,
}

impl GraphNode {
    #[must_use]
    pub fn internal(id: FunctionId, metadata: FunctionDef) -> Self {
        GraphNode {
            id,
            is_external: false,
            metadata,
        }
    }

    #[must_use]
    pub fn external(id: FunctionId, metadata: FunctionDef) -> Self {
        GraphNode {
            id,
            is_external: true,
            metadata,
        }
    }
}

/// Edge in the call graph representing a function call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: FunctionId,
    pub to: FunctionId,
    pub line: usize,
}

impl GraphEdge {
    #[must_use]
    pub fn new(from: FunctionId, to: FunctionId, line: usize) -> Self {
        GraphEdge { from, to, line }
    }
}

/// Call dependency graph. Nodes are kept ordered so exports are stable.
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    pub nodes: BTreeMap<FunctionId, GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl CallGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node into the graph
    ///
    /// # Errors
    ///
    /// Returns an error if the node already exists in the graph.
    pub fn insert_node(&mut self, node: GraphNode) -> Result<(), GraphError> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Insert an edge into the graph
    ///
    /// # Errors
    ///
    /// Returns an error if the from or to node does not exist.
    pub fn insert_edge(&mut self, edge: GraphEdge) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&edge.from) {
            return Err(GraphError::MissingNode { role: "from", id: edge.from });
        }
        if !self.nodes.contains_key(&edge.to) {
            return Err(GraphError::MissingNode { role: "to", id: edge.to });
        }
        self.edges.push(edge);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, id: &FunctionId) -> bool {
        self.nodes.contains_key(id)
    }

    #[must_use]
    pub fn get_node(&self, id: &FunctionId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Get all edges originating from a node
    #[must_use]
    pub fn get_edges_from(&self, id: &FunctionId) -> Vec<&GraphEdge> {
        self.edges.iter().filter(|e| e.from == *id).collect()
    }

    /// Get all edges pointing to a node
    #[must_use]
    pub fn get_edges_to(&self, id: &FunctionId) -> Vec<&GraphEdge> {
        self.edges.iter().filter(|e| e.to == *id).collect()
    }

    /// Subgraph holding only `keep` and the edges between them
    #[must_use]
    pub fn restrict_to(&self, keep: &HashSet<FunctionId>) -> CallGraph {
        let nodes = self
            .nodes
            .iter()
            .filter(|(id, _)| keep.contains(*id))
            .map(|(id, node)| (id.clone(), node.clone()))
            .collect();
        let edges = self
            .edges
            .iter()
            .filter(|e| keep.contains(&e.from) && keep.contains(&e.to))
            .cloned()
            .collect();
        CallGraph { nodes, edges }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Signature;

    fn create_test_node(name: &str) -> (FunctionId, GraphNode) {
        let func_def = FunctionDef::new(name.to_string(), Signature::empty(), "demo".to_string());
        let fn_id = func_def.fn_id();
        let node = GraphNode::internal(fn_id.clone(), func_def);
        (fn_id, node)
    }

    #[test]
    fn test_graph_node_kinds() {
        let (id, node) = create_test_node("process_data");
        assert!(!node.is_external);
        assert_eq!(node.id, id);

        let ext = GraphNode::external(
            FunctionId::external("print"),
            FunctionDef::new("print".to_string(), Signature::empty(), "<external>".to_string()),
        );
        assert!(ext.is_external);
    }

    #[test]
    fn test_call_graph_new() {
        let graph = CallGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_insert_duplicate_node() {
        let mut graph = CallGraph::new();
        let (_, node) = create_test_node("process_data");
        graph.insert_node(node.clone()).unwrap();
        assert!(matches!(graph.insert_node(node), Err(GraphError::DuplicateNode(_))));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_insert_edge() {
        let mut graph = CallGraph::new();
        let (id1, node1) = create_test_node("process_data");
        let (id2, node2) = create_test_node("validate_input");
        graph.insert_node(node1).unwrap();
        graph.insert_node(node2).unwrap();

        graph.insert_edge(GraphEdge::new(id1, id2, 9)).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges[0].line, 9);
    }

    #[test]
    fn test_insert_edge_missing_endpoint() {
        let mut graph = CallGraph::new();
        let (id1, node1) = create_test_node("process_data");
        let (id2, _) = create_test_node("validate_input");
        graph.insert_node(node1).unwrap();

        let err = graph.insert_edge(GraphEdge::new(id1.clone(), id2.clone(), 1)).unwrap_err();
        assert!(matches!(err, GraphError::MissingNode { role: "to", .. }));

        let err = graph.insert_edge(GraphEdge::new(id2, id1, 1)).unwrap_err();
        assert!(matches!(err, GraphError::MissingNode { role: "from", .. }));
    }

    #[test]
    fn test_edges_from_and_to() {
        let mut graph = CallGraph::new();
        let (id1, node1) = create_test_node("process_data");
        let (id2, node2) = create_test_node("validate_input");
        let (id3, node3) = create_test_node("transform_data");
        graph.insert_node(node1).unwrap();
        graph.insert_node(node2).unwrap();
        graph.insert_node(node3).unwrap();

        graph.insert_edge(GraphEdge::new(id1.clone(), id2.clone(), 5)).unwrap();
        graph.insert_edge(GraphEdge::new(id1.clone(), id3.clone(), 10)).unwrap();

        assert_eq!(graph.get_edges_from(&id1).len(), 2);
        assert_eq!(graph.get_edges_to(&id3).len(), 1);
        assert!(graph.get_edges_from(&id2).is_empty());
    }

    #[test]
    fn test_restrict_to() {
        let mut graph = CallGraph::new();
        let (id1, node1) = create_test_node("process_data");
        let (id2, node2) = create_test_node("validate_input");
        let (id3, node3) = create_test_node("transform_data");
        graph.insert_node(node1).unwrap();
        graph.insert_node(node2).unwrap();
        graph.insert_node(node3).unwrap();
        graph.insert_edge(GraphEdge::new(id1.clone(), id2.clone(), 5)).unwrap();
        graph.insert_edge(GraphEdge::new(id1.clone(), id3.clone(), 10)).unwrap();

        let keep: HashSet<FunctionId> = [id1.clone(), id2.clone()].into_iter().collect();
        let sub = graph.restrict_to(&keep);
        assert_eq!(sub.node_count(), 2);
        assert_eq!(sub.edge_count(), 1);
        assert!(!sub.contains(&id3));
    }
}
