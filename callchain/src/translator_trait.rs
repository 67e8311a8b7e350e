use std::path::{Path, PathBuf};
use callchain_lib::ast::AbstractAST;
use crate::language::Language;

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to set {0} language")]
    Language(&'static str),

    #[error("failed to parse {0} source")]
    Parse(&'static str),
}

/// Trait for language-specific translators
pub trait Translator {
    fn language(&self) -> Language;

    /// Translate source text to an abstract AST
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed.
    fn translate(&self, source: &str, module_path: &str) -> Result<AbstractAST, TranslateError>;

    /// Translate a source file; the module defaults to the file stem
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn translate_file(&self, path: &Path, module_path: Option<&str>) -> Result<AbstractAST, TranslateError> {
        let source = read_source(path)?;
        let module = module_path.map_or_else(|| default_module(path), str::to_string);
        self.translate(&source, &module)
    }
}

/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_source(path: &Path) -> Result<String, TranslateError> {
    std::fs::read_to_string(path).map_err(|source| TranslateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[must_use]
pub fn default_module(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("root")
        .to_string()
}
