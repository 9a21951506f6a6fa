//! Translate Adapter

mod http_translator;

pub use http_translator::{HttpTranslator, HttpTranslatorConfig};
