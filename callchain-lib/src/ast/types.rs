use std::fmt;
use serde::Serialize;

/// Function signature with parameters and return type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub params: Vec<(String, String)>, // (name, type)
    pub return_type: String,
}

impl Signature {
    #[must_use]
    pub fn new(params: Vec<(String, String)>, return_type: String) -> Self {
        Signature { params, return_type }
    }

    #[must_use]
    pub fn empty() -> Self {
        Signature {
            params: vec![],
            return_type: "()".to_string(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params_str = self
            .params
            .iter()
            .map(|(name, ty)| format!("{name}: {ty}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "({}) -> {}", params_str, self.return_type)
    }
}

/// Location of a function body in its source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start_byte: usize,
    pub end_byte: usize,
    /// 1-based
    pub start_line: usize,
}

impl Span {
    #[must_use]
    pub fn new(start_byte: usize, end_byte: usize, start_line: usize) -> Self {
        Span { start_byte, end_byte, start_line }
    }

    #[must_use]
    pub fn contains(&self, start: usize, end: usize) -> bool {
        self.start_byte <= start && end <= self.end_byte
    }
}

/// A function call within another function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionCall {
    pub target_name: String,
    pub target_module: Option<String>, // None = unresolved/external
    pub line: usize,
}

impl FunctionCall {
    #[must_use]
    pub fn new(target_name: String, target_module: Option<String>, line: usize) -> Self {
        FunctionCall {
            target_name,
            target_module,
            line,
        }
    }

    /// A call that must never resolve to a function in the same file, such as
    /// a method on a receiver other than `self`
    #[must_use]
    pub fn external(target_name: String, line: usize) -> Self {
        FunctionCall::new(target_name, Some(crate::function_id::EXTERNAL_MODULE.to_string()), line)
    }

    #[must_use]
    pub fn is_external(&self) -> bool {
        self.target_module.as_deref() == Some(crate::function_id::EXTERNAL_MODULE)
    }
}

/// A function definition extracted from source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub signature: Signature,
    pub calls: Vec<FunctionCall>,
    pub module: String,
    pub span: Option<Span>,
}

impl FunctionDef {
    #[must_use]
    pub fn new(name: String, signature: Signature, module: String) -> Self {
        FunctionDef {
            name,
            signature,
            calls: vec![],
            module,
            span: None,
        }
    }

    #[must_use]
    pub fn with_calls(mut self, calls: Vec<FunctionCall>) -> Self {
        self.calls = calls;
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn add_call(&mut self, call: FunctionCall) {
        self.calls.push(call);
    }

    /// Last path segment of the name, `Type::method` -> `method`
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn fn_id(&self) -> crate::function_id::FunctionId {
        crate::function_id::generate_id(&self.module, &self.name, &self.signature)
    }
}

/// Language-independent view of one source file
#[derive(Debug, Clone, Serialize)]
pub struct AbstractAST {
    pub functions: Vec<FunctionDef>,
    pub module_path: String,
}

impl AbstractAST {
    #[must_use]
    pub fn new(module_path: String) -> Self {
        AbstractAST {
            functions: vec![],
            module_path,
        }
    }

    #[must_use]
    pub fn get_function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn add_function(&mut self, func: FunctionDef) {
        self.functions.push(func);
    }

    #[must_use]
    pub fn module_path(&self) -> &str {
        &self.module_path
    }
}
