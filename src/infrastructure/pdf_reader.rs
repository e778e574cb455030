//! PDF 文本提取 - 基础设施层
//!
//! 只负责"打开文档、逐页取文本"，不关心后续流程

use crate::error::ExtractionError;
use lopdf::Document as PdfDocument;
use std::path::Path;
use tracing::debug;

/// 提取结果：全文 + 页数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
}

/// 文本提取能力
///
/// 调用方会在阻塞线程池中执行 `extract`，实现可以直接做同步 I/O。
pub trait TextExtractor: Send + Sync + 'static {
    fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError>;
}

/// 基于 lopdf 的 PDF 提取器
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for LopdfExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        let doc = PdfDocument::load(path).map_err(|e| ExtractionError::OpenFailed {
            path: path.to_path_buf(),
            source: e.to_string().into(),
        })?;

        let pages = doc.get_pages();
        let page_count = pages.len();
        let mut text = String::new();

        // get_pages 返回 BTreeMap，按页码顺序遍历
        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => {
                    // 无法取出文本的页面按空页处理
                    debug!("第 {} 页没有可提取的文本 ({}): {}", page_number, path.display(), e);
                }
            }
        }

        Ok(ExtractedText { text, page_count })
    }
}
