pub mod analysis;
pub mod language;
pub mod resolver;
pub mod translator_factory;
pub mod translator_trait;
pub mod translators;
