//! 文档处理上下文
//!
//! 封装"我正在处理第几个文档、是哪个文件"这一信息

use crate::models::{display_name, document_id_from_path};
use std::fmt::Display;
use std::path::PathBuf;

/// 文档处理上下文
#[derive(Debug, Clone)]
pub struct DocumentCtx {
    /// 文档索引（从1开始，仅用于日志显示）
    pub index: usize,

    /// 文档路径
    pub path: PathBuf,

    /// 文件名
    pub name: String,

    /// 文档标识（文件名去掉扩展名）
    pub document_id: String,
}

impl DocumentCtx {
    pub fn new(index: usize, path: PathBuf) -> Self {
        let name = display_name(&path);
        let document_id = document_id_from_path(&path);
        Self {
            index,
            path,
            name,
            document_id,
        }
    }
}

impl Display for DocumentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文档#{} {}]", self.index, self.name)
    }
}
