//! Glue between source files and the call-graph library: load a file into an
//! abstract AST, build its graph, and resolve user-supplied function names.

use std::path::{Path, PathBuf};
use callchain_lib::ast::AbstractAST;
use callchain_lib::builder::CallGraphBuilder;
use callchain_lib::error::GraphError;
use callchain_lib::function_id::FunctionId;
use callchain_lib::graph::CallGraph;
use callchain_lib::query::GraphQuery;
use tracing::{debug, info};
use crate::language::Language;
use crate::translator_factory::get_translator;
use crate::translator_trait::{default_module, read_source, TranslateError};

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    #[error("cannot detect language of {}; pass --language", .0.display())]
    UndetectedLanguage(PathBuf),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A source file with its translated AST
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub language: Language,
    pub source: String,
    pub ast: AbstractAST,
}

/// Language from an explicit name, else from the file extension
///
/// # Errors
///
/// Returns an error if the name is unknown or the extension is not recognised.
pub fn detect_language(name: Option<&str>, path: &Path) -> Result<Language, AnalysisError> {
    match name {
        Some(name) => Language::from_name(name).ok_or_else(|| AnalysisError::UnknownLanguage(name.to_string())),
        None => Language::from_file_path(path).ok_or_else(|| AnalysisError::UndetectedLanguage(path.to_path_buf())),
    }
}

/// Read and translate `path`. The module defaults to the file stem.
///
/// # Errors
///
/// Returns an error if the language cannot be determined or the file cannot
/// be read or parsed.
pub fn load_source(path: &Path, language: Option<&str>, module: Option<&str>) -> Result<LoadedSource, AnalysisError> {
    let language = detect_language(language, path)?;
    let module = module.map_or_else(|| default_module(path), str::to_string);
    debug!(path = %path.display(), %language, %module, "loading source");

    let source = read_source(path)?;
    let ast = get_translator(language).translate(&source, &module)?;
    info!(functions = ast.functions.len(), %language, "translated {}", path.display());

    Ok(LoadedSource {
        path: path.to_path_buf(),
        language,
        source,
        ast,
    })
}

/// # Errors
///
/// Returns an error if the AST defines the same function twice.
pub fn build_graph(ast: &AbstractAST) -> Result<CallGraph, AnalysisError> {
    let mut builder = CallGraphBuilder::new();
    builder.add_ast(ast.clone())?;
    let graph = builder.build()?;
    debug!(nodes = graph.node_count(), edges = graph.edge_count(), "built call graph");
    Ok(graph)
}

/// Resolve each name with `GraphQuery::find_functions`, keeping first-seen order
///
/// # Errors
///
/// Returns an error for the first name that matches nothing.
pub fn resolve_functions(graph: &CallGraph, names: &[String]) -> Result<Vec<FunctionId>, AnalysisError> {
    let mut resolved: Vec<FunctionId> = Vec::new();
    for name in names {
        let ids = graph.find_functions(name)?;
        if ids.len() > 1 {
            info!(name = %name, matches = ids.len(), "name matches several functions, using all");
        }
        for id in ids {
            if !resolved.contains(&id) {
                resolved.push(id);
            }
        }
    }
    Ok(resolved)
}

/// Function name of a node, or the raw id when the node is unknown
#[must_use]
pub fn display_name(graph: &CallGraph, id: &FunctionId) -> String {
    graph
        .get_node(id)
        .map_or_else(|| id.to_string(), |node| node.metadata.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PYTHON: &str = "\
def process_data(data):
    return validate_input(data)

def validate_input(data):
    return data
";

    fn python_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".py").tempfile().unwrap();
        file.write_all(PYTHON.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language(None, Path::new("demo.js")).unwrap(), Language::JavaScript);
        assert_eq!(detect_language(Some("rust"), Path::new("demo.js")).unwrap(), Language::Rust);
        assert!(matches!(
            detect_language(Some("cobol"), Path::new("demo.js")),
            Err(AnalysisError::UnknownLanguage(_))
        ));
        assert!(matches!(
            detect_language(None, Path::new("demo.txt")),
            Err(AnalysisError::UndetectedLanguage(_))
        ));
    }

    #[test]
    fn test_load_and_build() {
        let file = python_file();
        let loaded = load_source(file.path(), None, Some("demo")).unwrap();
        assert_eq!(loaded.language, Language::Python);
        assert_eq!(loaded.ast.module_path, "demo");

        let graph = build_graph(&loaded.ast).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_resolve_functions() {
        let file = python_file();
        let loaded = load_source(file.path(), None, Some("demo")).unwrap();
        let graph = build_graph(&loaded.ast).unwrap();

        let names = vec!["validate_input".to_string(), "validate_input".to_string()];
        let ids = resolve_functions(&graph, &names).unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(display_name(&graph, &ids[0]), "validate_input");

        assert!(matches!(
            resolve_functions(&graph, &["missing".to_string()]),
            Err(AnalysisError::Graph(GraphError::FunctionNotFound(_)))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_source(Path::new("/no/such/demo.py"), None, None),
            Err(AnalysisError::Translate(TranslateError::Io { .. }))
        ));
    }
}
