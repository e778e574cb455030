use pdf_digest::error::{EnumerationError, ExtractionError, PersistenceError};
use pdf_digest::{
    AppError, BatchOptions, BatchProcessor, BatchStatus, DocumentStage, ExtractedText,
    JsonlStore, ProgressEvent, ProgressListener, ResultSink, StoreTarget, SummaryRecord,
    TextExtractor,
};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 把文件当纯文本读取的提取器，页之间用 \x0c 分隔
///
/// 内容以 CORRUPT 开头视为损坏文档，以 PANIC 开头时直接 panic
#[derive(Default)]
struct PlainTextExtractor {
    delay: Option<Duration>,
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl PlainTextExtractor {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.running.fetch_sub(1, Ordering::SeqCst);

        let content = fs::read_to_string(path).map_err(|e| ExtractionError::OpenFailed {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        if content.starts_with("CORRUPT") {
            return Err(ExtractionError::OpenFailed {
                path: path.to_path_buf(),
                source: "invalid file header".into(),
            });
        }
        if content.starts_with("PANIC") {
            panic!("extractor crashed on {}", path.display());
        }

        let pages: Vec<&str> = content.split('\x0c').collect();
        Ok(ExtractedText {
            page_count: pages.len(),
            text: pages.concat(),
        })
    }
}

/// 记录所有写入的存储，可指定拒绝某些文档
#[derive(Default)]
struct MemorySink {
    records: Mutex<Vec<SummaryRecord>>,
    reject: Vec<String>,
}

impl MemorySink {
    fn rejecting(ids: &[&str]) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            reject: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.document_id.clone())
            .collect();
        ids.sort();
        ids
    }
}

impl ResultSink for MemorySink {
    async fn store(&self, record: &SummaryRecord) -> Result<(), PersistenceError> {
        if self.reject.contains(&record.document_id) {
            return Err(PersistenceError::WriteRejected {
                location: "memory".to_string(),
                source: "store is read-only".into(),
            });
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events().iter().filter(|&e| pred(e)).count()
    }
}

impl ProgressListener for RecordingProgress {
    fn on_event(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn options(max_concurrent: usize) -> BatchOptions {
    BatchOptions {
        max_concurrent,
        document_extension: "pdf".to_string(),
        summary_sentences: 3,
        keyword_count: 5,
        verbose_logging: false,
    }
}

fn write_doc(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[tokio::test]
async fn test_failed_extraction_does_not_affect_siblings() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "a.pdf", "Apples are red. Apples grow on trees.");
    write_doc(dir.path(), "b.pdf", "CORRUPT binary junk");
    write_doc(dir.path(), "c.pdf", "Carrots are orange.\x0cCarrots grow underground.");

    let sink = Arc::new(MemorySink::default());
    let progress = Arc::new(RecordingProgress::default());
    let processor = BatchProcessor::new(
        Arc::new(PlainTextExtractor::default()),
        Arc::clone(&sink),
        progress.clone(),
        options(4),
    );

    let report = processor.run_batch(dir.path()).await.unwrap();

    assert_eq!(report.status, BatchStatus::Completed);
    assert_eq!(report.total(), 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(sink.ids(), vec!["a", "c"]);

    let failure = report.failures().next().unwrap();
    assert_eq!(failure.document_id, "b");
    let err = failure.result.as_ref().unwrap_err();
    assert_eq!(err.stage, Some(DocumentStage::Extracting));
    assert!(matches!(err.error, AppError::Extraction(_)));

    assert_eq!(
        progress.count(|e| matches!(e, ProgressEvent::Failed { name, .. } if name == "b.pdf")),
        1
    );
    assert_eq!(progress.count(|e| matches!(e, ProgressEvent::Saved { .. })), 2);
    assert!(progress.events().contains(&ProgressEvent::Processing {
        index: 3,
        name: "c.pdf".to_string(),
        page_count: 2,
    }));
    assert_eq!(
        progress.events().last(),
        Some(&ProgressEvent::BatchFinished {
            succeeded: 2,
            failed: 1
        })
    );
}

#[tokio::test]
async fn test_empty_folder_warns_without_error() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "readme.txt", "not a document");

    let sink = Arc::new(MemorySink::default());
    let progress = Arc::new(RecordingProgress::default());
    let processor = BatchProcessor::new(
        Arc::new(PlainTextExtractor::default()),
        Arc::clone(&sink),
        progress.clone(),
        options(2),
    );

    let report = processor.run_batch(dir.path()).await.unwrap();

    assert_eq!(report.status, BatchStatus::NoDocuments);
    assert_eq!(report.total(), 0);
    assert!(sink.ids().is_empty());
    assert_eq!(
        progress.events(),
        vec![ProgressEvent::NoDocuments {
            folder: dir.path().to_path_buf()
        }]
    );
}

#[tokio::test]
async fn test_missing_folder_fails_before_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nowhere");

    let sink = Arc::new(MemorySink::default());
    let progress = Arc::new(RecordingProgress::default());
    let processor = BatchProcessor::new(
        Arc::new(PlainTextExtractor::default()),
        Arc::clone(&sink),
        progress.clone(),
        options(2),
    );

    let err = processor.run_batch(&missing).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Enumeration(EnumerationError::DirectoryNotFound { .. })
    ));
    assert!(progress.events().is_empty());
    assert!(sink.ids().is_empty());
}

#[tokio::test]
async fn test_persistence_failure_is_reported_per_document() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "kept.pdf", "Kept document text.");
    write_doc(dir.path(), "lost.pdf", "Lost document text.");

    let sink = Arc::new(MemorySink::rejecting(&["lost"]));
    let progress = Arc::new(RecordingProgress::default());
    let processor = BatchProcessor::new(
        Arc::new(PlainTextExtractor::default()),
        Arc::clone(&sink),
        progress.clone(),
        options(2),
    );

    let report = processor.run_batch(dir.path()).await.unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(sink.ids(), vec!["kept"]);
    let failure = report.failures().next().unwrap();
    assert_eq!(failure.document_id, "lost");
    let err = failure.result.as_ref().unwrap_err();
    assert_eq!(err.stage, Some(DocumentStage::Persisting));
    assert!(matches!(err.error, AppError::Persistence(_)));
}

#[tokio::test]
async fn test_panicking_task_becomes_unexpected_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "boom.pdf", "PANIC now");
    write_doc(dir.path(), "fine.pdf", "Fine text here.");

    let sink = Arc::new(MemorySink::default());
    let progress = Arc::new(RecordingProgress::default());
    let processor = BatchProcessor::new(
        Arc::new(PlainTextExtractor::default()),
        Arc::clone(&sink),
        progress.clone(),
        options(2),
    );

    let report = processor.run_batch(dir.path()).await.unwrap();

    assert_eq!(report.total(), 2);
    assert_eq!(sink.ids(), vec!["fine"]);
    let failure = report.failures().next().unwrap();
    assert_eq!(failure.document_id, "boom");
    assert!(matches!(
        failure.result.as_ref().unwrap_err().error,
        AppError::Unexpected(_)
    ));
    assert_eq!(
        progress.count(|e| matches!(e, ProgressEvent::Failed { name, .. } if name == "boom.pdf")),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_is_bounded_by_pool_size() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..8 {
        write_doc(dir.path(), &format!("doc{}.pdf", i), "Some words here. More words.");
    }

    let extractor = Arc::new(PlainTextExtractor::with_delay(Duration::from_millis(40)));
    let sink = Arc::new(MemorySink::default());
    let processor = BatchProcessor::new(
        Arc::clone(&extractor),
        Arc::clone(&sink),
        Arc::new(RecordingProgress::default()),
        options(2),
    );

    let report = processor.run_batch(dir.path()).await.unwrap();

    assert_eq!(report.succeeded(), 8);
    assert_eq!(sink.ids().len(), 8);
    // 结果按分发顺序排列，与完成顺序无关
    let indices: Vec<usize> = report.outcomes.iter().map(|o| o.index).collect();
    assert_eq!(indices, (1..=8).collect::<Vec<_>>());
    let peak = extractor.peak.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= 2, "peak concurrency {}", peak);
}

#[tokio::test]
async fn test_records_are_written_to_jsonl_store() {
    let docs = tempfile::tempdir().unwrap();
    let store_root = tempfile::tempdir().unwrap();
    write_doc(
        docs.path(),
        "pets.pdf",
        "Cats are great. Dogs are great too. Cats and dogs are pets.",
    );

    let store = Arc::new(JsonlStore::new(
        store_root.path(),
        StoreTarget::new("pdf summaries", "summaries"),
    ));
    let processor = BatchProcessor::new(
        Arc::new(PlainTextExtractor::default()),
        Arc::clone(&store),
        Arc::new(RecordingProgress::default()),
        BatchOptions {
            summary_sentences: 1,
            ..options(2)
        },
    );

    let report = processor.run_batch(docs.path()).await.unwrap();
    assert_eq!(report.succeeded(), 1);

    let content =
        fs::read_to_string(store_root.path().join("pdf_summaries").join("summaries.jsonl")).unwrap();
    let records: Vec<SummaryRecord> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    // 去停用词后: "Cats great. Dogs great too. Cats dogs pets."
    assert_eq!(
        records,
        vec![SummaryRecord {
            document_id: "pets".to_string(),
            summary: "Dogs great too.".to_string(),
            keywords: vec![
                "cats".to_string(),
                "great".to_string(),
                "dogs".to_string(),
                "pets".to_string()
            ],
        }]
    );
}
