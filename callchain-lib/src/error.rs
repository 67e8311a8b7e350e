use crate::function_id::FunctionId;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("node already exists: {0}")]
    DuplicateNode(FunctionId),

    #[error("duplicate function ID: {0}")]
    DuplicateFunction(FunctionId),

    #[error("{role} node does not exist: {id}")]
    MissingNode { role: &'static str, id: FunctionId },

    #[error("function not found: {0}")]
    FunctionNotFound(String),
}

/// Hard failures of the demo pipeline. Soft validation failures are `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("missing key: {0:?}")]
    MissingKey(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("highlighted function not found: {0}")]
    HighlightedNotFound(String),

    #[error("highlighted function has no source span: {0}")]
    NoSpan(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
