//! # PDF Digest
//!
//! 批量读取文件夹中的 PDF 文档，为每个文档生成抽取式摘要和关键词，并写入存储
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 与外部打交道，只暴露能力
//! - `LopdfExtractor` - 打开 PDF，逐页提取文本
//! - `JsonlStore` - 每个文档追加一条记录
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 纯函数，只处理单段文本
//! - `filter_stopwords` - 去停用词
//! - `summarize` - 按词频选句
//! - `extract_keywords` - 按词频选词
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文档"的完整处理流程
//! - `DocumentCtx` - 上下文封装（索引 + 路径 + 文档标识）
//! - `DocumentFlow` - 流程编排（提取 → 去停用词 → 摘要/关键词 → 保存）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 枚举文档、并发分发、汇总结果
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, StoreTarget};
pub use error::{AppError, AppResult};
pub use infrastructure::{ExtractedText, JsonlStore, LopdfExtractor, ResultSink, TextExtractor};
pub use models::{Document, SummaryRecord};
pub use orchestrator::{App, BatchOptions, BatchProcessor, BatchReport, BatchStatus, DocumentOutcome};
pub use workflow::{DocumentCtx, DocumentFailure, DocumentFlow, DocumentStage, ProgressEvent, ProgressListener};
