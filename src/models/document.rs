use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 一次提取得到的文档
///
/// 只在单个处理任务内存在，生成摘要和关键词后即丢弃
#[derive(Debug, Clone)]
pub struct Document {
    /// 文档路径
    pub path: PathBuf,
    /// 拼接后的全文（可能为空）
    pub text: String,
    /// 页数
    pub page_count: usize,
}

/// 单个文档的最终产物，交给存储层写入一次
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// 文档标识（文件名去掉扩展名）
    pub document_id: String,
    /// 摘要
    pub summary: String,
    /// 关键词（按频率降序）
    pub keywords: Vec<String>,
}

/// 从路径得到文档标识：文件名去掉扩展名
pub fn document_id_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 用于日志显示的文件名
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
