use std::fmt::Write as _;
use crate::function_id::FunctionId;
use crate::graph::CallGraph;

/// Generate Graphviz DOT format for the call graph.
///
/// Nodes in `highlight` are drawn with a bold gold fill so the selected
/// function stands out from the functions it reaches.
#[must_use]
pub fn to_dot(graph: &CallGraph, highlight: &[FunctionId]) -> String {
    let mut output = String::new();
    output.push_str("digraph CallGraph {\n");
    output.push_str("    rankdir=LR;\n");
    output.push_str("    node [shape=box];\n\n");

    for (id, node) in &graph.nodes {
        let style = if highlight.contains(id) {
            ", style=\"filled,bold\", fillcolor=gold"
        } else if node.is_external {
            ", style=filled, fillcolor=lightgray"
        } else {
            ", style=filled, fillcolor=lightblue"
        };

        // one path segment per label line
        let label = escape(id.as_str()).replace("::", "\\n");
        let _ = writeln!(output, "    \"{}\" [label=\"{}\"{}];", escape(id.as_str()), label, style);
    }

    output.push('\n');

    for edge in &graph.edges {
        let label = if edge.line > 0 {
            format!(" [label=\"L{}\"]", edge.line)
        } else {
            String::new()
        };
        let _ = writeln!(
            output,
            "    \"{}\" -> \"{}\"{};",
            escape(edge.from.as_str()),
            escape(edge.to.as_str()),
            label
        );
    }

    output.push_str("}\n");
    output
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionDef, Signature};
    use crate::graph::{GraphEdge, GraphNode};

    fn node(name: &str) -> GraphNode {
        let func = FunctionDef::new(name.to_string(), Signature::empty(), "demo".to_string());
        GraphNode::internal(func.fn_id(), func)
    }

    #[test]
    fn test_to_dot_empty() {
        let dot = to_dot(&CallGraph::new(), &[]);
        assert!(dot.starts_with("digraph CallGraph {"));
        assert!(dot.contains("rankdir=LR"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_to_dot_node_styles() {
        let mut graph = CallGraph::new();
        let process = node("process_data");
        let process_id = process.id.clone();
        graph.insert_node(process).unwrap();
        graph.insert_node(node("check_format")).unwrap();
        let print = FunctionDef::new("print".to_string(), Signature::empty(), "<external>".to_string());
        graph
            .insert_node(GraphNode::external(FunctionId::external("print"), print))
            .unwrap();

        let dot = to_dot(&graph, &[process_id]);
        assert!(dot.contains("fillcolor=gold"));
        assert!(dot.contains("fillcolor=lightblue"));
        assert!(dot.contains("fillcolor=lightgray"));
    }

    #[test]
    fn test_to_dot_label_splits_path() {
        let mut graph = CallGraph::new();
        graph.insert_node(node("deep_validation")).unwrap();
        let dot = to_dot(&graph, &[]);
        assert!(dot.contains("label=\"demo\\ndeep_validation\\n() -> ()\""));
    }

    #[test]
    fn test_to_dot_edge_line_label() {
        let mut graph = CallGraph::new();
        let a = node("process_data");
        let b = node("transform_data");
        let (a_id, b_id) = (a.id.clone(), b.id.clone());
        graph.insert_node(a).unwrap();
        graph.insert_node(b).unwrap();
        graph.insert_edge(GraphEdge::new(a_id, b_id, 12)).unwrap();

        let dot = to_dot(&graph, &[]);
        assert!(dot.contains(
            "\"demo::process_data::() -> ()\" -> \"demo::transform_data::() -> ()\" [label=\"L12\"];"
        ));
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape("a\"b"), "a\\\"b");
    }
}
