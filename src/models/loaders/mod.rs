pub mod folder_loader;

pub use folder_loader::list_documents;
