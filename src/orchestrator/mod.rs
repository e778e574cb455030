//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PathBuf>，并发分发)
//!     ↓
//! workflow::DocumentFlow (处理单个文档)
//!     ↓
//! services (能力层：去停用词 / 摘要 / 关键词)
//!     ↓
//! infrastructure (基础设施：PDF 提取 / 结果存储)
//! ```
//!
//! 编排层只做调度和统计，不做具体业务判断。

pub mod batch_processor;

pub use batch_processor::{
    App, BatchOptions, BatchProcessor, BatchReport, BatchStatus, DocumentOutcome,
};
