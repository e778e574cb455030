use crate::error::EnumerationError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 列出目录下所有待处理的文档
///
/// 只看直接子项，文件名需以 `.{extension}` 结尾（区分大小写）。
/// 结果按文件名排序，保证调度顺序稳定。
pub async fn list_documents(
    folder: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>, EnumerationError> {
    if !fs::try_exists(folder).await.unwrap_or(false) {
        return Err(EnumerationError::DirectoryNotFound {
            path: folder.to_path_buf(),
        });
    }

    let read_failed = |source| EnumerationError::ReadFailed {
        path: folder.to_path_buf(),
        source,
    };

    let suffix = format!(".{}", extension);
    let mut documents = Vec::new();
    let mut entries = fs::read_dir(folder).await.map_err(read_failed)?;

    while let Some(entry) = entries.next_entry().await.map_err(read_failed)? {
        // 非 UTF-8 文件名只用于匹配后缀，路径本身保持原样
        if !entry.file_name().to_string_lossy().ends_with(&suffix) {
            continue;
        }

        let path = entry.path();
        // metadata 会跟随符号链接；失效的链接也保留，交给提取阶段报告失败
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => {
                tracing::debug!("跳过目录: {}", path.display());
            }
            Ok(_) => documents.push(path),
            Err(e) => {
                tracing::warn!("无法读取文件信息 {}: {}", path.display(), e);
                documents.push(path);
            }
        }
    }

    documents.sort();
    Ok(documents)
}
