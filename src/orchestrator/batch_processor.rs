//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **枚举文档**：扫描目录下所有待处理的文档
//! 2. **并发控制**：使用 Semaphore 限制同时处理的文档数量
//! 3. **任务分发**：每个文档一个独立任务（tokio::spawn）
//! 4. **汇总结果**：等待所有任务结束，收集每个文档的成功/失败
//!
//! 单个文档失败只记录为该文档的结果，不会中断其他任务。
//! 只有目录不存在时整个批处理才会失败，且此时不会分发任何任务。

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{JsonlStore, LopdfExtractor, ResultSink, TextExtractor};
use crate::models::list_documents;
use crate::utils::logging;
use crate::workflow::{
    DocumentCtx, DocumentFailure, DocumentFlow, DocumentSummary, ProgressEvent,
    ProgressListener, TracingProgress,
};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 批处理参数
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub max_concurrent: usize,
    pub document_extension: String,
    pub summary_sentences: usize,
    pub keyword_count: usize,
    pub verbose_logging: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for BatchOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_concurrent: config.max_concurrent_documents,
            document_extension: config.document_extension.clone(),
            summary_sentences: config.summary_sentences,
            keyword_count: config.keyword_count,
            verbose_logging: config.verbose_logging,
        }
    }
}

/// 批处理整体状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// 目录中没有文档，未分发任何任务
    NoDocuments,
    /// 所有任务都已结束（不论成败）
    Completed,
}

/// 单个文档的处理结果
#[derive(Debug)]
pub struct DocumentOutcome {
    pub index: usize,
    pub path: PathBuf,
    pub document_id: String,
    pub result: Result<DocumentSummary, DocumentFailure>,
}

impl DocumentOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// 批处理结果：每个枚举到的文档恰好一条
#[derive(Debug)]
pub struct BatchReport {
    pub status: BatchStatus,
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    fn no_documents() -> Self {
        Self {
            status: BatchStatus::NoDocuments,
            outcomes: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// 批量文档处理器
pub struct BatchProcessor<E, S> {
    flow: DocumentFlow<E, S>,
    progress: Arc<dyn ProgressListener>,
    max_concurrent: usize,
    document_extension: String,
}

impl<E, S> BatchProcessor<E, S>
where
    E: TextExtractor,
    S: ResultSink,
{
    pub fn new(
        extractor: Arc<E>,
        sink: Arc<S>,
        progress: Arc<dyn ProgressListener>,
        options: BatchOptions,
    ) -> Self {
        let flow = DocumentFlow::new(
            extractor,
            sink,
            Arc::clone(&progress),
            options.summary_sentences,
            options.keyword_count,
        )
        .with_verbose_logging(options.verbose_logging);

        Self {
            flow,
            progress,
            // 并发数至少为 1
            max_concurrent: options.max_concurrent.max(1),
            document_extension: options.document_extension,
        }
    }

    /// 处理目录下的所有文档
    ///
    /// 返回时所有已分发的任务都已结束。
    pub async fn run_batch(&self, folder: &Path) -> AppResult<BatchReport> {
        info!("\n📁 正在扫描待处理的文档: {}", folder.display());
        let documents = list_documents(folder, &self.document_extension).await?;

        if documents.is_empty() {
            self.progress.on_event(&ProgressEvent::NoDocuments {
                folder: folder.to_path_buf(),
            });
            return Ok(BatchReport::no_documents());
        }

        self.progress.on_event(&ProgressEvent::BatchStarted {
            total: documents.len(),
            max_concurrent: self.max_concurrent,
        });

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut outcomes = Vec::with_capacity(documents.len());
        let mut pending = Vec::with_capacity(documents.len());

        for (idx, path) in documents.into_iter().enumerate() {
            let ctx = DocumentCtx::new(idx + 1, path);

            // 先拿许可再 spawn，同时在跑的任务数不超过 max_concurrent
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    let err = AppError::unexpected(format!("无法获取并发许可: {}", e));
                    outcomes.push(unscheduled(ctx, err, self.progress.as_ref()));
                    continue;
                }
            };

            let flow = self.flow.clone();
            let task_ctx = ctx.clone();
            let handle = tokio::spawn(async move {
                let _permit = permit;
                flow.run(&task_ctx).await
            });
            pending.push((ctx, handle));
        }

        // 等待所有任务结束
        let (contexts, handles): (Vec<_>, Vec<_>) = pending.into_iter().unzip();
        let results = join_all(handles).await;

        for (ctx, joined) in contexts.into_iter().zip(results) {
            match joined {
                Ok(result) => outcomes.push(DocumentOutcome {
                    index: ctx.index,
                    path: ctx.path,
                    document_id: ctx.document_id,
                    result,
                }),
                Err(join_err) => {
                    let error = AppError::from(join_err);
                    outcomes.push(unscheduled(ctx, error, self.progress.as_ref()));
                }
            }
        }
        outcomes.sort_by_key(|o| o.index);

        let report = BatchReport {
            status: BatchStatus::Completed,
            outcomes,
        };
        self.progress.on_event(&ProgressEvent::BatchFinished {
            succeeded: report.succeeded(),
            failed: report.failed(),
        });

        Ok(report)
    }
}

/// 任务没能跑完流程（未能分发或中途 panic）时，直接生成该文档的失败结果
fn unscheduled(
    ctx: DocumentCtx,
    error: AppError,
    progress: &dyn ProgressListener,
) -> DocumentOutcome {
    progress.on_event(&ProgressEvent::Failed {
        index: ctx.index,
        name: ctx.name.clone(),
        stage: None,
        message: error.to_string(),
    });
    DocumentOutcome {
        index: ctx.index,
        path: ctx.path,
        document_id: ctx.document_id,
        result: Err(DocumentFailure { stage: None, error }),
    }
}

/// 应用主结构
///
/// 根据配置组装提取器、存储和进度输出，并给出整体的成功/警告/错误提示
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<BatchReport> {
        logging::log_startup(&self.config);

        let target = self.config.store_target();
        let store = JsonlStore::new(&self.config.store_root, target);
        info!("💾 结果写入: {}", store.collection_path().display());

        let processor = BatchProcessor::new(
            Arc::new(LopdfExtractor::new()),
            Arc::new(store),
            Arc::new(TracingProgress),
            BatchOptions::from(&self.config),
        );

        let folder = Path::new(&self.config.documents_folder);
        let report = match processor.run_batch(folder).await {
            Ok(report) => report,
            Err(e) => {
                error!("❌ {}", e);
                return Err(e);
            }
        };

        match report.status {
            BatchStatus::NoDocuments => {
                warn!("⚠️ 没有找到待处理的文档，程序结束");
            }
            BatchStatus::Completed => {
                logging::print_final_stats(
                    report.succeeded(),
                    report.failed(),
                    report.total(),
                    &self.config.output_log_file,
                );
                if report.failed() == 0 {
                    info!("✅ 所有文档处理完成");
                } else {
                    warn!("⚠️ 处理完成，但有 {} 个文档失败", report.failed());
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<ProgressEvent>>);

    impl ProgressListener for Collect {
        fn on_event(&self, event: &ProgressEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn closed_pool_becomes_failed_outcome_without_task() {
        let semaphore = Arc::new(Semaphore::new(1));
        semaphore.close();
        let acquire_err = tokio_test::block_on(Arc::clone(&semaphore).acquire_owned()).unwrap_err();

        let progress = Collect::default();
        let ctx = DocumentCtx::new(2, PathBuf::from("docs/late.pdf"));
        let outcome = unscheduled(
            ctx,
            AppError::unexpected(format!("无法获取并发许可: {}", acquire_err)),
            &progress,
        );

        assert_eq!(outcome.index, 2);
        assert_eq!(outcome.document_id, "late");
        let failure = outcome.result.unwrap_err();
        assert_eq!(failure.stage, None);
        assert!(matches!(failure.error, AppError::Unexpected(_)));

        let events = progress.0.lock().unwrap();
        assert!(matches!(
            events.as_slice(),
            [ProgressEvent::Failed { index: 2, name, stage: None, .. }] if name == "late.pdf"
        ));
    }

    #[test]
    fn report_counts_follow_outcomes() {
        let failed = DocumentOutcome {
            index: 1,
            path: PathBuf::from("a.pdf"),
            document_id: "a".to_string(),
            result: Err(DocumentFailure {
                stage: None,
                error: AppError::unexpected("boom"),
            }),
        };
        let report = BatchReport {
            status: BatchStatus::Completed,
            outcomes: vec![failed],
        };

        assert_eq!(report.total(), 1);
        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures().count(), 1);
    }
}
