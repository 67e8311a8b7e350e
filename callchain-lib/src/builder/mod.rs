use std::collections::{HashMap, HashSet};
use tracing::debug;
use crate::ast::{AbstractAST, FunctionDef, Signature};
use crate::error::GraphError;
use crate::function_id::{generate_id, FunctionId, EXTERNAL_MODULE};
use crate::graph::{CallGraph, GraphEdge, GraphNode};
use crate::traversal::{dfs_traversal, TraversalResult};

/// Builder for constructing a call graph from ASTs
pub struct CallGraphBuilder {
    asts: Vec<AbstractAST>,
    ids: HashSet<FunctionId>,
    // (module, name) -> id, so calls resolve whatever the callee's signature is
    by_name: HashMap<(String, String), FunctionId>,
}

impl CallGraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        CallGraphBuilder {
            asts: vec![],
            ids: HashSet::new(),
            by_name: HashMap::new(),
        }
    }

    /// Add an abstract syntax tree to the builder
    ///
    /// # Errors
    ///
    /// Returns an error if a duplicate function ID is encountered.
    pub fn add_ast(&mut self, ast: AbstractAST) -> Result<(), GraphError> {
        for func in &ast.functions {
            let fn_id = func.fn_id();
            if !self.ids.insert(fn_id.clone()) {
                return Err(GraphError::DuplicateFunction(fn_id));
            }
            self.by_name
                .insert((func.module.clone(), func.name.clone()), fn_id);
        }
        debug!(
            module = ast.module_path(),
            functions = ast.functions.len(),
            "added AST to call graph builder"
        );
        self.asts.push(ast);
        Ok(())
    }

    /// Build the complete call graph
    ///
    /// # Errors
    ///
    /// Returns an error if graph construction fails.
    pub fn build(&self) -> Result<CallGraph, GraphError> {
        let mut graph = CallGraph::new();

        for func_def in self.functions() {
            graph.insert_node(GraphNode::internal(func_def.fn_id(), func_def.clone()))?;
        }

        for func_def in self.functions() {
            let from_id = func_def.fn_id();

            for call in &func_def.calls {
                let to_id = match &call.target_module {
                    Some(module) if module == EXTERNAL_MODULE => FunctionId::external(&call.target_name),
                    Some(module) => self
                        .by_name
                        .get(&(module.clone(), call.target_name.clone()))
                        .cloned()
                        .unwrap_or_else(|| generate_id(module, &call.target_name, &Signature::empty())),
                    None => FunctionId::external(&call.target_name),
                };

                if !graph.contains(&to_id) {
                    let external_func = FunctionDef::new(
                        call.target_name.clone(),
                        Signature::empty(),
                        EXTERNAL_MODULE.to_string(),
                    );
                    graph.insert_node(GraphNode::external(to_id.clone(), external_func))?;
                }

                graph.insert_edge(GraphEdge::new(from_id.clone(), to_id, call.line))?;
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built call graph"
        );
        Ok(graph)
    }

    /// Build graph and traverse from entry points
    ///
    /// # Errors
    ///
    /// Returns an error if graph construction fails or entry points are not found.
    pub fn build_from_entries(
        &self,
        entries: &[FunctionId],
    ) -> Result<(CallGraph, TraversalResult), GraphError> {
        let graph = self.build()?;
        let mut result = TraversalResult::new();

        for entry in entries {
            if !graph.contains(entry) {
                return Err(GraphError::FunctionNotFound(entry.to_string()));
            }
            result.merge(dfs_traversal(&graph, entry));
        }

        Ok((graph, result))
    }

    fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.asts.iter().flat_map(|ast| ast.functions.iter())
    }
}

impl Default for CallGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
