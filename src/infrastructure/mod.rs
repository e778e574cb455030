pub mod pdf_reader;
pub mod record_store;

pub use pdf_reader::{ExtractedText, LopdfExtractor, TextExtractor};
pub use record_store::{JsonlStore, ResultSink};
