//! Call-graph model and the demo pipeline whose call chain it describes.

pub mod ast;
pub mod builder;
pub mod error;
pub mod export;
pub mod function_id;
pub mod graph;
pub mod pipeline;
pub mod query;
pub mod search;
pub mod traversal;
