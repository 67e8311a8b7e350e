use std::collections::HashSet;
use callchain_lib::ast::AbstractAST;

/// Point calls at functions defined in the same file to that file's module.
///
/// Matching is by exact name, so `Type::method` only resolves when the
/// translator already qualified the call (`self.method()` inside `impl Type`).
/// Everything else stays unresolved and becomes an external node, as do calls
/// the translator already marked external.
pub fn resolve_local_calls(ast: &mut AbstractAST) {
    let defined: HashSet<String> = ast.functions.iter().map(|f| f.name.clone()).collect();
    let module = ast.module_path.clone();

    for func in &mut ast.functions {
        for call in &mut func.calls {
            if call.target_module.is_none() && defined.contains(&call.target_name) {
                call.target_module = Some(module.clone());
            }
        }
    }
}
