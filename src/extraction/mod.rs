pub mod document;
pub mod normalizer;

pub use document::{extract_pdf_text, DocumentExtractor, TextExtractor};
pub use normalizer::normalize;
