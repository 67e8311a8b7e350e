use callchain_lib::ast::{AbstractAST, FunctionCall, FunctionDef, Signature};
use tree_sitter::Node;
use crate::language::Language;
use crate::resolver::resolve_local_calls;
use crate::translator_trait::{TranslateError, Translator};
use super::{call, field_text, Callee, line, parse, push_function, scoped, span, text};

/// Translator for Rust source code to abstract AST
#[derive(Debug, Clone, Copy, Default)]
pub struct RustTranslator;

impl RustTranslator {
    #[must_use]
    pub fn new() -> Self {
        RustTranslator
    }

    /// Walk items, scoping methods by the type of their `impl` or `trait` block
    fn visit(node: Node, source: &str, module: &str, owner: Option<&str>, ast: &mut AbstractAST) {
        match node.kind() {
            "impl_item" | "trait_item" => {
                let owner_field = if node.kind() == "impl_item" { "type" } else { "name" };
                let owner_name = node
                    .child_by_field_name(owner_field)
                    .map(|ty| Self::type_name(ty, source));
                if let Some(body) = node.child_by_field_name("body") {
                    for child in body.named_children(&mut body.walk()) {
                        Self::visit(child, source, module, owner_name, ast);
                    }
                }
            }
            "function_item" => {
                let Some(name) = field_text(node, "name", source) else {
                    return;
                };
                let mut calls = Vec::new();
                if let Some(body) = node.child_by_field_name("body") {
                    Self::collect_calls(body, source, owner, &mut calls);
                }
                let func = FunctionDef::new(scoped(owner, name), Signature::empty(), module.to_string())
                    .with_calls(calls)
                    .with_span(span(node));
                push_function(ast, func);

                // nested fn items are their own functions
                if let Some(body) = node.child_by_field_name("body") {
                    Self::visit(body, source, module, None, ast);
                }
            }
            _ => {
                for child in node.named_children(&mut node.walk()) {
                    Self::visit(child, source, module, None, ast);
                }
            }
        }
    }

    /// `Foo<T>` and `crate::Foo` both name `Foo`
    fn type_name<'a>(node: Node, source: &'a str) -> &'a str {
        match node.kind() {
            "generic_type" => node
                .child_by_field_name("type")
                .map_or_else(|| text(node, source), |ty| Self::type_name(ty, source)),
            "scoped_type_identifier" => field_text(node, "name", source).unwrap_or_else(|| text(node, source)),
            _ => text(node, source),
        }
    }

    fn collect_calls(node: Node, source: &str, owner: Option<&str>, calls: &mut Vec<FunctionCall>) {
        if node.kind() == "call_expression" {
            if let Some(callee) = node
                .child_by_field_name("function")
                .and_then(|callee| Self::callee_name(callee, source, owner))
            {
                calls.push(call(callee, node));
            }
        }

        for child in node.named_children(&mut node.walk()) {
            if matches!(child.kind(), "function_item" | "impl_item" | "trait_item") {
                continue;
            }
            Self::collect_calls(child, source, owner, calls);
        }
    }

    /// `f()` and `Type::f()` as written, `self.m()` and `Self::m()` -> `Owner::m`,
    /// `value.m()` -> external `m`
    fn callee_name(callee: Node, source: &str, owner: Option<&str>) -> Option<Callee> {
        match callee.kind() {
            "identifier" => Some(Callee::Local(text(callee, source).to_string())),
            "scoped_identifier" => {
                let path = field_text(callee, "path", source);
                let name = field_text(callee, "name", source)?;
                match (path, owner) {
                    (Some("Self"), Some(owner)) => Some(Callee::Local(format!("{owner}::{name}"))),
                    _ => Some(Callee::Local(text(callee, source).to_string())),
                }
            }
            "field_expression" => {
                let receiver = field_text(callee, "value", source);
                let method = field_text(callee, "field", source)?;
                match (receiver, owner) {
                    (Some("self"), Some(owner)) => Some(Callee::Local(format!("{owner}::{method}"))),
                    _ => Some(Callee::Member(method.to_string())),
                }
            }
            "generic_function" => callee
                .child_by_field_name("function")
                .and_then(|f| Self::callee_name(f, source, owner)),
            _ => None,
        }
    }

    /// Names of all `fn` items, methods included
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn function_names(&self, source: &str) -> Result<Vec<String>, TranslateError> {
        let ast = self.translate(source, "root")?;
        Ok(ast.functions.into_iter().map(|f| f.name).collect())
    }

    /// Line of the first `fn` item called `name`
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn definition_line(&self, source: &str, name: &str) -> Result<Option<usize>, TranslateError> {
        let tree = parse(tree_sitter_rust::language(), "Rust", source)?;
        Ok(Self::find_definition(tree.root_node(), source, name).map(line))
    }

    fn find_definition<'t>(node: Node<'t>, source: &str, name: &str) -> Option<Node<'t>> {
        if node.kind() == "function_item" && field_text(node, "name", source) == Some(name) {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
        children
            .into_iter()
            .find_map(|child| Self::find_definition(child, source, name))
    }
}

impl Translator for RustTranslator {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn translate(&self, source: &str, module_path: &str) -> Result<AbstractAST, TranslateError> {
        let tree = parse(tree_sitter_rust::language(), "Rust", source)?;
        let mut ast = AbstractAST::new(module_path.to_string());
        Self::visit(tree.root_node(), source, module_path, None, &mut ast);
        resolve_local_calls(&mut ast);
        tracing::debug!(module = module_path, functions = ast.functions.len(), "translated Rust source");
        Ok(ast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callchain_lib::function_id::EXTERNAL_MODULE;

    const EXTERNAL: Option<&str> = Some(EXTERNAL_MODULE);

    const PIPELINE: &str = r#"
struct Pipeline<C> { clock: C }

impl<C: Clock> Pipeline<C> {
    fn process(&self, data: &Value) -> Option<f64> {
        println!("Processing data...");
        if self.validate(data) {
            Some(self.transform())
        } else {
            None
        }
    }

    fn validate(&self, data: &Value) -> bool {
        data.is_object() && Self::deep(data)
    }

    fn deep(data: &Value) -> bool {
        data.get("id").is_some()
    }

    fn transform(&self) -> f64 {
        self.clock.now()
    }
}

fn main() {
    let p = Pipeline { clock: SystemClock };
    helper();
    p.process(&sample());
}

fn helper() {}
"#;

    fn calls_of<'a>(ast: &'a AbstractAST, name: &str) -> Vec<(&'a str, Option<&'a str>)> {
        ast.get_function(name)
            .unwrap()
            .calls
            .iter()
            .map(|c| (c.target_name.as_str(), c.target_module.as_deref()))
            .collect()
    }

    #[test]
    fn test_parse_simple_rust() {
        assert!(parse(tree_sitter_rust::language(), "Rust", "fn main() {}").is_ok());
    }

    #[test]
    fn test_function_names_scope_methods() {
        let names = RustTranslator.function_names(PIPELINE).unwrap();
        assert_eq!(
            names,
            vec![
                "Pipeline::process",
                "Pipeline::validate",
                "Pipeline::deep",
                "Pipeline::transform",
                "main",
                "helper"
            ]
        );
    }

    #[test]
    fn test_self_calls_resolve_to_impl_type() {
        let ast = RustTranslator.translate(PIPELINE, "demo").unwrap();
        let calls = calls_of(&ast, "Pipeline::process");
        assert!(calls.contains(&("Pipeline::validate", Some("demo"))));
        assert!(calls.contains(&("Pipeline::transform", Some("demo"))));
        assert!(calls.contains(&("Some", None)));

        let calls = calls_of(&ast, "Pipeline::validate");
        assert!(calls.contains(&("Pipeline::deep", Some("demo"))));
        assert!(calls.contains(&("is_object", EXTERNAL)));
    }

    #[test]
    fn test_field_method_call_is_external() {
        let ast = RustTranslator.translate(PIPELINE, "demo").unwrap();
        assert_eq!(calls_of(&ast, "Pipeline::transform"), vec![("now", EXTERNAL)]);
    }

    #[test]
    fn test_method_on_other_receiver_does_not_link_free_fn() {
        let source = "fn run(x: Widget) { x.helper(); helper(); }\nfn helper() {}";
        let ast = RustTranslator.translate(source, "root").unwrap();
        assert_eq!(
            calls_of(&ast, "run"),
            vec![("helper", EXTERNAL), ("helper", Some("root"))]
        );
    }

    #[test]
    fn test_free_function_calls() {
        let ast = RustTranslator.translate(PIPELINE, "demo").unwrap();
        let calls = calls_of(&ast, "main");
        assert!(calls.contains(&("helper", Some("demo"))));
        assert!(calls.contains(&("process", EXTERNAL)));
        assert!(calls.contains(&("sample", None)));
    }

    #[test]
    fn test_call_lines_and_spans() {
        let ast = RustTranslator.translate(PIPELINE, "demo").unwrap();
        let process = ast.get_function("Pipeline::process").unwrap();
        assert_eq!(process.span.unwrap().start_line, 5);
        let validate_call = process
            .calls
            .iter()
            .find(|c| c.target_name == "Pipeline::validate")
            .unwrap();
        assert_eq!(validate_call.line, 7);
    }

    #[test]
    fn test_nested_fn_is_separate() {
        let source = "fn outer() { fn inner() { leaf(); } inner(); }\nfn leaf() {}";
        let ast = RustTranslator.translate(source, "root").unwrap();
        assert_eq!(calls_of(&ast, "outer"), vec![("inner", Some("root"))]);
        assert_eq!(calls_of(&ast, "inner"), vec![("leaf", Some("root"))]);
    }

    #[test]
    fn test_definition_line() {
        assert_eq!(RustTranslator.definition_line(PIPELINE, "helper").unwrap(), Some(33));
        assert_eq!(RustTranslator.definition_line(PIPELINE, "missing").unwrap(), None);
    }
}
