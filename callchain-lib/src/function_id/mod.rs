use std::fmt;
use serde::Serialize;
use crate::ast::Signature;

/// Prefix of nodes for calls that resolve to no known definition
pub const EXTERNAL_MODULE: &str = "<external>";

/// Unique identifier for a function: `module::name::signature`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FunctionId(String);

impl FunctionId {
    #[must_use]
    pub fn new(id: String) -> Self {
        FunctionId(id)
    }

    /// Identifier of an unresolved call target
    #[must_use]
    pub fn external(name: &str) -> Self {
        FunctionId(format!("{EXTERNAL_MODULE}::{name}::()"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_external(&self) -> bool {
        self.0.starts_with(EXTERNAL_MODULE)
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate a unique function ID from module, name, and signature
#[must_use]
pub fn generate_id(module: &str, name: &str, signature: &Signature) -> FunctionId {
    FunctionId::new(format!("{module}::{name}::{signature}"))
}
