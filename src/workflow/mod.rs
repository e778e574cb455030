pub mod document_ctx;
pub mod document_flow;
pub mod progress;

pub use document_ctx::DocumentCtx;
pub use document_flow::{DocumentFailure, DocumentFlow, DocumentStage, DocumentSummary};
pub use progress::{ProgressEvent, ProgressListener, TracingProgress};
