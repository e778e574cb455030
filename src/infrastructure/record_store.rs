//! 结果存储 - 基础设施层
//!
//! 每个文档写一条记录。`JsonlStore` 把记录追加到
//! `<root>/<namespace>/<collection>.jsonl`，一行一条 JSON。

use crate::config::StoreTarget;
use crate::error::PersistenceError;
use crate::models::SummaryRecord;
use std::future::Future;
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// 结果写入能力
///
/// 多个任务会并发调用 `store`，实现必须保证写入不交错。
pub trait ResultSink: Send + Sync + 'static {
    fn store(
        &self,
        record: &SummaryRecord,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}

/// JSON Lines 文件存储
pub struct JsonlStore {
    target: StoreTarget,
    root: PathBuf,
    // 串行化追加写，避免并发写出半行
    write_lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(root: impl Into<PathBuf>, target: StoreTarget) -> Self {
        Self {
            target,
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn target(&self) -> &StoreTarget {
        &self.target
    }

    /// 命名空间目录
    pub fn namespace_dir(&self) -> PathBuf {
        self.root.join(&self.target.namespace)
    }

    /// 集合文件路径
    pub fn collection_path(&self) -> PathBuf {
        self.namespace_dir()
            .join(format!("{}.jsonl", self.target.collection))
    }
}

impl ResultSink for JsonlStore {
    async fn store(&self, record: &SummaryRecord) -> Result<(), PersistenceError> {
        let namespace_dir = self.namespace_dir();
        let collection_path = self.collection_path();
        let location = collection_path.display().to_string();

        let mut line = serde_json::to_string(record).map_err(|e| {
            PersistenceError::WriteRejected {
                location: location.clone(),
                source: Box::new(e),
            }
        })?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;

        fs::create_dir_all(&namespace_dir)
            .await
            .map_err(|source| PersistenceError::Unreachable {
                location: namespace_dir.display().to_string(),
                source,
            })?;

        let reject = |e: std::io::Error| PersistenceError::WriteRejected {
            location: location.clone(),
            source: Box::new(e),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&collection_path)
            .await
            .map_err(reject)?;
        file.write_all(line.as_bytes()).await.map_err(reject)?;
        file.flush().await.map_err(reject)?;

        debug!("已写入记录 {} -> {}", record.document_id, location);
        Ok(())
    }
}
