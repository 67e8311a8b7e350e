use crate::ast::{AbstractAST, FunctionCall, FunctionDef, Signature};
use crate::builder::CallGraphBuilder;
use crate::error::GraphError;
use crate::graph::CallGraph;
use super::stage::Stage;

/// Module path the pipeline methods live under, as translators name it
pub const STAGES_MODULE: &str = "stages";

/// Call graph of the pipeline built from `Stage::direct_callees`
///
/// # Errors
///
/// Only on an internally inconsistent stage table.
pub fn declared_call_graph() -> Result<CallGraph, GraphError> {
    let mut ast = AbstractAST::new(STAGES_MODULE.to_string());
    for stage in Stage::ALL {
        let calls = stage
            .direct_callees()
            .iter()
            .map(|callee| FunctionCall::new(callee.qualified_name(), Some(STAGES_MODULE.to_string()), 0))
            .collect();
        ast.add_function(
            FunctionDef::new(stage.qualified_name(), Signature::empty(), STAGES_MODULE.to_string())
                .with_calls(calls),
        );
    }

    let mut builder = CallGraphBuilder::new();
    builder.add_ast(ast)?;
    builder.build()
}
