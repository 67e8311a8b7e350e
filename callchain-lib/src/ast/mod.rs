mod types;

pub use types::{AbstractAST, FunctionCall, FunctionDef, Signature, Span};
