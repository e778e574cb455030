//! 进度通知
//!
//! 只用于观察，不影响处理结果

use crate::workflow::document_flow::DocumentStage;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 进度事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// 批处理开始
    BatchStarted { total: usize, max_concurrent: usize },
    /// 目录中没有待处理文档
    NoDocuments { folder: PathBuf },
    /// 文档提取完成，开始处理
    Processing {
        index: usize,
        name: String,
        page_count: usize,
    },
    /// 文档结果已保存
    Saved { index: usize, name: String },
    /// 文档处理失败
    Failed {
        index: usize,
        name: String,
        stage: Option<DocumentStage>,
        message: String,
    },
    /// 所有任务结束
    BatchFinished { succeeded: usize, failed: usize },
}

/// 进度监听
pub trait ProgressListener: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

/// 把进度写入 tracing 日志
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressListener for TracingProgress {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::BatchStarted {
                total,
                max_concurrent,
            } => {
                info!("✓ 找到 {} 个待处理的文档", total);
                info!("📋 最多同时处理 {} 个", max_concurrent);
            }
            ProgressEvent::NoDocuments { folder } => {
                warn!("⚠️ 目录中没有找到文档: {}", folder.display());
            }
            ProgressEvent::Processing {
                index,
                name,
                page_count,
            } => {
                info!("[文档 {}] 正在处理 '{}' ({} 页)", index, name, page_count);
            }
            ProgressEvent::Saved { index, name } => {
                info!("[文档 {}] ✓ 已保存 '{}' 的摘要和关键词", index, name);
            }
            ProgressEvent::Failed {
                index,
                name,
                stage,
                message,
            } => match stage {
                Some(stage) => error!(
                    "[文档 {}] ❌ 处理 '{}' 出错 (阶段: {}): {}",
                    index, name, stage, message
                ),
                None => error!("[文档 {}] ❌ 处理 '{}' 出错: {}", index, name, message),
            },
            ProgressEvent::BatchFinished { succeeded, failed } => {
                info!("✓ 全部任务结束: 成功 {}, 失败 {}", succeeded, failed);
            }
        }
    }
}
