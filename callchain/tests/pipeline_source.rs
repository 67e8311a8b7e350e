//! The pipeline's declared call graph must agree with the graph extracted
//! from its own source.

use std::collections::BTreeSet;
use std::path::Path;
use callchain::translator_trait::Translator;
use callchain::translators::RustTranslator;
use callchain_lib::builder::CallGraphBuilder;
use callchain_lib::function_id::FunctionId;
use callchain_lib::graph::CallGraph;
use callchain_lib::pipeline::{declared_call_graph, Stage, STAGES_MODULE};
use callchain_lib::query::GraphQuery;

const STAGES_SOURCE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../callchain-lib/src/pipeline/stages.rs");

fn extracted_graph() -> CallGraph {
    let ast = RustTranslator
        .translate_file(Path::new(STAGES_SOURCE), Some(STAGES_MODULE))
        .unwrap();
    let mut builder = CallGraphBuilder::new();
    builder.add_ast(ast).unwrap();
    builder.build().unwrap()
}

fn stage_id(graph: &CallGraph, stage: Stage) -> FunctionId {
    let ids = graph.find_functions(&stage.qualified_name()).unwrap();
    assert_eq!(ids.len(), 1, "{stage}");
    ids[0].clone()
}

fn internal_names(graph: &CallGraph, ids: &[FunctionId]) -> BTreeSet<String> {
    ids.iter()
        .filter_map(|id| graph.get_node(id))
        .filter(|node| !node.is_external)
        .map(|node| node.metadata.name.clone())
        .collect()
}

#[test]
fn test_every_stage_is_a_method() {
    let graph = extracted_graph();
    for stage in Stage::ALL {
        let id = stage_id(&graph, stage);
        assert!(!graph.get_node(&id).unwrap().is_external, "{stage}");
    }
}

#[test]
fn test_direct_callees_match_declared() {
    let graph = extracted_graph();
    for stage in Stage::ALL {
        let id = stage_id(&graph, stage);
        let expected: BTreeSet<String> = stage.direct_callees().iter().map(|s| s.qualified_name()).collect();
        assert_eq!(internal_names(&graph, &graph.direct_callees(&id)), expected, "{stage}");
    }
}

#[test]
fn test_nested_calls_match_declared_graph() {
    let extracted = extracted_graph();
    let declared = declared_call_graph().unwrap();
    for stage in Stage::ALL {
        let from_source = internal_names(&extracted, &extracted.nested_calls(&stage_id(&extracted, stage)).unwrap());
        let from_table = internal_names(&declared, &declared.nested_calls(&stage_id(&declared, stage)).unwrap());
        assert_eq!(from_source, from_table, "{stage}");
    }
}

#[test]
fn test_deep_validation_reached_only_through_validation() {
    let graph = extracted_graph();
    let callers = graph
        .transitive_callers(&stage_id(&graph, Stage::DeepValidation))
        .unwrap();
    let names = internal_names(&graph, &callers);
    for stage in [Stage::CheckFormat, Stage::ValidateInput, Stage::ProcessData] {
        assert!(names.contains(&stage.qualified_name()), "{stage}");
    }
    assert!(!names.contains(&Stage::TransformData.qualified_name()));
}
