//! 文档处理流程 - 流程层
//!
//! 核心职责：定义"一个文档"的完整处理流程
//!
//! 流程顺序：
//! 1. 提取文本（阻塞线程池）
//! 2. 去停用词、生成摘要、提取关键词（阻塞线程池）
//! 3. 写入存储
//!
//! 任何一步失败都在本流程内转换为 `DocumentFailure`，不会影响其他文档。

use std::fmt;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::infrastructure::{ResultSink, TextExtractor};
use crate::models::{Document, SummaryRecord};
use crate::services::{extract_keywords, filter_stopwords, summarize};
use crate::utils::logging::truncate_text;
use crate::workflow::document_ctx::DocumentCtx;
use crate::workflow::progress::{ProgressEvent, ProgressListener};

/// 单个文档所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStage {
    Pending,
    Extracting,
    Filtering,
    Summarizing,
    KeywordExtracting,
    Persisting,
    Completed,
    Failed,
}

impl fmt::Display for DocumentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentStage::Pending => "等待",
            DocumentStage::Extracting => "提取文本",
            DocumentStage::Filtering => "去停用词",
            DocumentStage::Summarizing => "生成摘要",
            DocumentStage::KeywordExtracting => "提取关键词",
            DocumentStage::Persisting => "保存",
            DocumentStage::Completed => "完成",
            DocumentStage::Failed => "失败",
        };
        f.write_str(name)
    }
}

/// 单个文档处理成功的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub record: SummaryRecord,
    pub page_count: usize,
}

/// 单个文档处理失败
///
/// `stage` 为出错时所处的阶段；任务异常退出（panic）时无法得知，记为 `None`。
#[derive(Debug, Error)]
#[error("{error}")]
pub struct DocumentFailure {
    pub stage: Option<DocumentStage>,
    pub error: AppError,
}

/// 文档处理流程
///
/// - 不持有文档数据，只持有能力（提取器、存储、进度）
/// - 可以廉价 clone，每个并发任务一份
pub struct DocumentFlow<E, S> {
    extractor: Arc<E>,
    sink: Arc<S>,
    progress: Arc<dyn ProgressListener>,
    summary_sentences: usize,
    keyword_count: usize,
    verbose_logging: bool,
}

impl<E, S> Clone for DocumentFlow<E, S> {
    fn clone(&self) -> Self {
        Self {
            extractor: Arc::clone(&self.extractor),
            sink: Arc::clone(&self.sink),
            progress: Arc::clone(&self.progress),
            summary_sentences: self.summary_sentences,
            keyword_count: self.keyword_count,
            verbose_logging: self.verbose_logging,
        }
    }
}

impl<E, S> DocumentFlow<E, S>
where
    E: TextExtractor,
    S: ResultSink,
{
    pub fn new(
        extractor: Arc<E>,
        sink: Arc<S>,
        progress: Arc<dyn ProgressListener>,
        summary_sentences: usize,
        keyword_count: usize,
    ) -> Self {
        Self {
            extractor,
            sink,
            progress,
            summary_sentences,
            keyword_count,
            verbose_logging: false,
        }
    }

    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    /// 执行完整流程，并通过进度通道报告结果
    pub async fn run(&self, ctx: &DocumentCtx) -> Result<DocumentSummary, DocumentFailure> {
        let stage = StageCell::new();

        match self.execute(ctx, &stage).await {
            Ok(summary) => {
                stage.advance(ctx, DocumentStage::Completed);
                self.progress.on_event(&ProgressEvent::Saved {
                    index: ctx.index,
                    name: ctx.name.clone(),
                });
                Ok(summary)
            }
            Err(error) => {
                let failed_at = stage.get();
                stage.advance(ctx, DocumentStage::Failed);
                self.progress.on_event(&ProgressEvent::Failed {
                    index: ctx.index,
                    name: ctx.name.clone(),
                    stage: Some(failed_at),
                    message: error.to_string(),
                });
                Err(DocumentFailure {
                    stage: Some(failed_at),
                    error,
                })
            }
        }
    }

    async fn execute(&self, ctx: &DocumentCtx, stage: &StageCell) -> AppResult<DocumentSummary> {
        // ========== 1. 提取文本 ==========
        stage.advance(ctx, DocumentStage::Extracting);
        let document = self.extract(ctx).await?;

        self.progress.on_event(&ProgressEvent::Processing {
            index: ctx.index,
            name: ctx.name.clone(),
            page_count: document.page_count,
        });

        // ========== 2. 去停用词、摘要与关键词 ==========
        let page_count = document.page_count;
        let (summary, keywords) = self.analyze(ctx, document, stage).await?;

        if self.verbose_logging {
            info!("[文档 {}] 摘要: {}", ctx.index, truncate_text(&summary, 120));
            info!("[文档 {}] 关键词: {}", ctx.index, keywords.join(", "));
        }

        // ========== 3. 保存 ==========
        stage.advance(ctx, DocumentStage::Persisting);
        let record = SummaryRecord {
            document_id: ctx.document_id.clone(),
            summary,
            keywords,
        };
        self.sink.store(&record).await?;

        Ok(DocumentSummary { record, page_count })
    }

    /// 在阻塞线程池中提取文本
    async fn extract(&self, ctx: &DocumentCtx) -> AppResult<Document> {
        let extractor = Arc::clone(&self.extractor);
        let path = ctx.path.clone();

        let extracted = tokio::task::spawn_blocking(move || extractor.extract(&path)).await??;

        Ok(Document {
            path: ctx.path.clone(),
            text: extracted.text,
            page_count: extracted.page_count,
        })
    }

    /// 在阻塞线程池中完成文本分析，大文档不会占住异步工作线程
    async fn analyze(
        &self,
        ctx: &DocumentCtx,
        document: Document,
        stage: &StageCell,
    ) -> AppResult<(String, Vec<String>)> {
        let ctx = ctx.clone();
        let stage = stage.clone();
        let summary_sentences = self.summary_sentences;
        let keyword_count = self.keyword_count;

        let analysis = tokio::task::spawn_blocking(move || {
            stage.advance(&ctx, DocumentStage::Filtering);
            let processed_text = filter_stopwords(&document.text);

            stage.advance(&ctx, DocumentStage::Summarizing);
            let summary = summarize(&processed_text, summary_sentences);

            stage.advance(&ctx, DocumentStage::KeywordExtracting);
            let keywords = extract_keywords(&processed_text, keyword_count);

            (summary, keywords)
        })
        .await?;

        Ok(analysis)
    }
}

/// 当前阶段，阻塞线程中的分析步骤也会推进它
#[derive(Clone)]
struct StageCell(Arc<Mutex<DocumentStage>>);

impl StageCell {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(DocumentStage::Pending)))
    }

    fn get(&self) -> DocumentStage {
        // 阶段值是 Copy，持锁方 panic 后仍可读
        *self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn advance(&self, ctx: &DocumentCtx, next: DocumentStage) {
        let mut stage = self.0.lock().unwrap_or_else(|e| e.into_inner());
        debug!("{} {} → {}", ctx, *stage, next);
        *stage = next;
    }
}
