use callchain_lib::ast::{AbstractAST, FunctionCall, FunctionDef, Signature};
use tree_sitter::Node;
use crate::language::Language;
use crate::resolver::resolve_local_calls;
use crate::translator_trait::{TranslateError, Translator};
use super::{call, field_text, Callee, parse, push_function, push_module_calls, scoped, span, text};

/// Node kinds that open a new named function or class
const DECLARATIONS: [&str; 4] = [
    "function_declaration",
    "generator_function_declaration",
    "class_declaration",
    "method_definition",
];

/// Translator for JavaScript source code to abstract AST
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScriptTranslator;

impl JavaScriptTranslator {
    #[must_use]
    pub fn new() -> Self {
        JavaScriptTranslator
    }

    fn is_function_value(node: Node) -> bool {
        matches!(node.kind(), "arrow_function" | "function" | "function_expression")
    }

    fn add_function(node: Node, name: &str, body: Option<Node>, source: &str, module: &str, class: Option<&str>, ast: &mut AbstractAST) {
        let mut calls = Vec::new();
        if let Some(body) = body {
            Self::collect_calls(body, source, class, &mut calls);
        }
        let func = FunctionDef::new(scoped(class, name), Signature::empty(), module.to_string())
            .with_calls(calls)
            .with_span(span(node));
        push_function(ast, func);
    }

    /// Register declarations under `node`. Calls made outside any declaration
    /// go to `module_calls` when it is present.
    fn visit(
        node: Node,
        source: &str,
        module: &str,
        ast: &mut AbstractAST,
        module_calls: Option<&mut Vec<FunctionCall>>,
    ) {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                if let Some(name) = field_text(node, "name", source) {
                    let body = node.child_by_field_name("body");
                    Self::add_function(node, name, body, source, module, None, ast);
                    if let Some(body) = body {
                        Self::visit(body, source, module, ast, None);
                    }
                }
            }
            "class_declaration" | "class" => {
                let class = field_text(node, "name", source);
                let Some(body) = node.child_by_field_name("body") else {
                    return;
                };
                for member in body.named_children(&mut body.walk()) {
                    if member.kind() != "method_definition" {
                        continue;
                    }
                    if let Some(name) = field_text(member, "name", source) {
                        let method_body = member.child_by_field_name("body");
                        Self::add_function(member, name, method_body, source, module, class, ast);
                    }
                }
            }
            "variable_declarator" => {
                let value = node.child_by_field_name("value");
                match (field_text(node, "name", source), value) {
                    (Some(name), Some(value)) if Self::is_function_value(value) => {
                        let body = value.child_by_field_name("body");
                        Self::add_function(value, name, body, source, module, None, ast);
                    }
                    (_, Some(value)) => {
                        if let Some(calls) = module_calls {
                            Self::collect_calls(value, source, None, calls);
                        }
                        Self::visit(value, source, module, ast, None);
                    }
                    _ => {}
                }
            }
            "expression_statement" => {
                if let Some(calls) = module_calls {
                    Self::collect_calls(node, source, None, calls);
                }
                Self::visit_children(node, source, module, ast, None);
            }
            _ => Self::visit_children(node, source, module, ast, module_calls),
        }
    }

    fn visit_children(
        node: Node,
        source: &str,
        module: &str,
        ast: &mut AbstractAST,
        mut module_calls: Option<&mut Vec<FunctionCall>>,
    ) {
        for child in node.named_children(&mut node.walk()) {
            Self::visit(child, source, module, ast, module_calls.as_deref_mut());
        }
    }

    fn collect_calls(node: Node, source: &str, class: Option<&str>, calls: &mut Vec<FunctionCall>) {
        if node.kind() == "call_expression" {
            if let Some(callee) = node
                .child_by_field_name("function")
                .and_then(|callee| Self::callee_name(callee, source, class))
            {
                calls.push(call(callee, node));
            }
        }

        for child in node.named_children(&mut node.walk()) {
            if DECLARATIONS.contains(&child.kind()) {
                continue;
            }
            Self::collect_calls(child, source, class, calls);
        }
    }

    /// `f()` -> `f`, `this.m()` -> `Class::m`, `obj.m()` -> external `m`
    fn callee_name(callee: Node, source: &str, class: Option<&str>) -> Option<Callee> {
        match callee.kind() {
            "identifier" => Some(Callee::Local(text(callee, source).to_string())),
            "member_expression" => {
                let object = callee.child_by_field_name("object");
                let property = field_text(callee, "property", source)?;
                match (object.map(|o| o.kind()), class) {
                    (Some("this"), Some(class)) => Some(Callee::Local(format!("{class}::{property}"))),
                    _ => Some(Callee::Member(property.to_string())),
                }
            }
            _ => None,
        }
    }
}

impl Translator for JavaScriptTranslator {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn translate(&self, source: &str, module_path: &str) -> Result<AbstractAST, TranslateError> {
        let tree = parse(tree_sitter_javascript::language(), "JavaScript", source)?;
        let mut ast = AbstractAST::new(module_path.to_string());
        let mut module_calls = Vec::new();
        Self::visit(tree.root_node(), source, module_path, &mut ast, Some(&mut module_calls));
        push_module_calls(&mut ast, module_calls);
        resolve_local_calls(&mut ast);
        tracing::debug!(module = module_path, functions = ast.functions.len(), "translated JavaScript source");
        Ok(ast)
    }
}
