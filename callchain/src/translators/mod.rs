pub mod javascript;
pub mod python;
pub mod rust;

pub use javascript::JavaScriptTranslator;
pub use python::PythonTranslator;
pub use rust::RustTranslator;

use callchain_lib::ast::{AbstractAST, FunctionCall, FunctionDef, Span};
use tracing::debug;
use tree_sitter::{Node, Parser, Tree};
use crate::translator_trait::TranslateError;

/// Name of the pseudo function holding top-level calls
pub const MODULE_FUNCTION: &str = "<module>";

pub(crate) fn parse(
    language: tree_sitter::Language,
    name: &'static str,
    source: &str,
) -> Result<Tree, TranslateError> {
    let mut parser = Parser::new();
    parser
        .set_language(language)
        .map_err(|_| TranslateError::Language(name))?;
    parser.parse(source, None).ok_or(TranslateError::Parse(name))
}

pub(crate) fn text<'a>(node: Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

pub(crate) fn field_text<'a>(node: Node, field: &str, source: &'a str) -> Option<&'a str> {
    node.child_by_field_name(field).map(|n| text(n, source))
}

/// 1-based line of a node
pub(crate) fn line(node: Node) -> usize {
    node.start_position().row + 1
}

pub(crate) fn span(node: Node) -> Span {
    Span::new(node.start_byte(), node.end_byte(), line(node))
}

pub(crate) fn scoped(scope: Option<&str>, name: &str) -> String {
    match scope {
        Some(scope) => format!("{scope}::{name}"),
        None => name.to_string(),
    }
}

/// Target of a call expression as written
pub(crate) enum Callee {
    /// `f()`, `Type::f()` or a method on `self`; may resolve within the file
    Local(String),
    /// A method on any other receiver; always external
    Member(String),
}

pub(crate) fn call(callee: Callee, node: Node) -> FunctionCall {
    match callee {
        Callee::Local(name) => FunctionCall::new(name, None, line(node)),
        Callee::Member(name) => FunctionCall::external(name, line(node)),
    }
}

/// Add a function unless one with the same name is already present
pub(crate) fn push_function(ast: &mut AbstractAST, func: FunctionDef) {
    if ast.get_function(&func.name).is_some() {
        debug!(function = %func.name, module = %ast.module_path, "skipping redefinition");
        return;
    }
    ast.add_function(func);
}

/// Record top-level calls under `<module>`
pub(crate) fn push_module_calls(ast: &mut AbstractAST, calls: Vec<FunctionCall>) {
    if calls.is_empty() {
        return;
    }
    let func = FunctionDef::new(
        MODULE_FUNCTION.to_string(),
        callchain_lib::ast::Signature::empty(),
        ast.module_path.clone(),
    )
    .with_calls(calls);
    push_function(ast, func);
}
