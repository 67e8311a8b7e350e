use crate::translator_trait::Translator;
use crate::translators::{JavaScriptTranslator, PythonTranslator, RustTranslator};
use crate::language::Language;

/// Factory for creating translators based on language
#[must_use]
pub fn get_translator(language: Language) -> Box<dyn Translator> {
    match language {
        Language::Rust => Box::new(RustTranslator::new()),
        Language::Python => Box::new(PythonTranslator::new()),
        Language::JavaScript => Box::new(JavaScriptTranslator::new()),
    }
}
