pub mod document;
pub mod loaders;

pub use document::{display_name, document_id_from_path, Document, SummaryRecord};
pub use loaders::list_documents;
