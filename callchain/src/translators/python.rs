use callchain_lib::ast::{AbstractAST, FunctionCall, FunctionDef, Signature};
use tree_sitter::Node;
use crate::language::Language;
use crate::resolver::resolve_local_calls;
use crate::translator_trait::{TranslateError, Translator};
use super::{call, field_text, Callee, parse, push_function, push_module_calls, scoped, span, text};

const DEFINITIONS: [&str; 3] = ["function_definition", "class_definition", "decorated_definition"];

/// Translator for Python source code to abstract AST
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonTranslator;

impl PythonTranslator {
    #[must_use]
    pub fn new() -> Self {
        PythonTranslator
    }

    fn visit(node: Node, source: &str, module: &str, class: Option<&str>, ast: &mut AbstractAST) {
        match node.kind() {
            "class_definition" => {
                let name = field_text(node, "name", source);
                if let Some(body) = node.child_by_field_name("body") {
                    for child in body.named_children(&mut body.walk()) {
                        Self::visit(child, source, module, name, ast);
                    }
                }
            }
            "function_definition" => {
                let Some(name) = field_text(node, "name", source) else {
                    return;
                };
                let mut calls = Vec::new();
                if let Some(body) = node.child_by_field_name("body") {
                    Self::collect_calls(body, source, class, &mut calls);
                }
                let func = FunctionDef::new(scoped(class, name), Signature::empty(), module.to_string())
                    .with_calls(calls)
                    .with_span(span(node));
                push_function(ast, func);

                if let Some(body) = node.child_by_field_name("body") {
                    Self::visit(body, source, module, None, ast);
                }
            }
            "decorated_definition" => {
                if let Some(definition) = node.child_by_field_name("definition") {
                    Self::visit(definition, source, module, class, ast);
                }
            }
            _ => {
                for child in node.named_children(&mut node.walk()) {
                    Self::visit(child, source, module, None, ast);
                }
            }
        }
    }

    fn collect_calls(node: Node, source: &str, class: Option<&str>, calls: &mut Vec<FunctionCall>) {
        if node.kind() == "call" {
            if let Some(callee) = node
                .child_by_field_name("function")
                .and_then(|callee| Self::callee_name(callee, source, class))
            {
                calls.push(call(callee, node));
            }
        }

        for child in node.named_children(&mut node.walk()) {
            if DEFINITIONS.contains(&child.kind()) {
                continue;
            }
            Self::collect_calls(child, source, class, calls);
        }
    }

    /// `f()` -> `f`, `self.m()` -> `Class::m`, `obj.m()` -> external `m`
    fn callee_name(callee: Node, source: &str, class: Option<&str>) -> Option<Callee> {
        match callee.kind() {
            "identifier" => Some(Callee::Local(text(callee, source).to_string())),
            "attribute" => {
                let object = field_text(callee, "object", source);
                let attribute = field_text(callee, "attribute", source)?;
                match (object, class) {
                    (Some("self" | "cls"), Some(class)) => Some(Callee::Local(format!("{class}::{attribute}"))),
                    _ => Some(Callee::Member(attribute.to_string())),
                }
            }
            _ => None,
        }
    }
}

impl Translator for PythonTranslator {
    fn language(&self) -> Language {
        Language::Python
    }

    fn translate(&self, source: &str, module_path: &str) -> Result<AbstractAST, TranslateError> {
        let tree = parse(tree_sitter_python::language(), "Python", source)?;
        let root = tree.root_node();
        let mut ast = AbstractAST::new(module_path.to_string());
        let mut module_calls = Vec::new();

        for child in root.named_children(&mut root.walk()) {
            if DEFINITIONS.contains(&child.kind()) {
                Self::visit(child, source, module_path, None, &mut ast);
            } else {
                // top-level statements, `if __name__ == "__main__":` included
                Self::collect_calls(child, source, None, &mut module_calls);
                Self::visit(child, source, module_path, None, &mut ast);
            }
        }
        push_module_calls(&mut ast, module_calls);
        resolve_local_calls(&mut ast);
        tracing::debug!(module = module_path, functions = ast.functions.len(), "translated Python source");
        Ok(ast)
    }
}
