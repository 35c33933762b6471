//! Text extraction adapters.

mod file_text_extractor;

pub use file_text_extractor::FileTextExtractor;
