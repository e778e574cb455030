use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档文本提取错误
    #[error("提取错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// 结果持久化错误
    #[error("存储错误: {0}")]
    Persistence(#[from] PersistenceError),
    /// 文件夹枚举错误
    #[error("枚举错误: {0}")]
    Enumeration(#[from] EnumerationError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他运行时错误（任务 panic、任务被取消等）
    #[error("意外错误: {0}")]
    Unexpected(String),
}

/// 文档文本提取错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 无法打开或解析文档（损坏、格式不支持）
    #[error("无法打开文档 ({}): {source}", path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 结果持久化错误
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// 存储不可达（目录无法创建等）
    #[error("存储不可达 ({location}): {source}")]
    Unreachable {
        location: String,
        #[source]
        source: std::io::Error,
    },
    /// 存储拒绝写入
    #[error("写入被拒绝 ({location}): {source}")]
    WriteRejected {
        location: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 文件夹枚举错误
#[derive(Debug, Error)]
pub enum EnumerationError {
    /// 目录不存在
    #[error("目录不存在: {}", path.display())]
    DirectoryNotFound { path: PathBuf },
    /// 目录无法读取
    #[error("无法读取目录 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建意外错误
    pub fn unexpected(msg: impl Into<String>) -> Self {
        AppError::Unexpected(msg.into())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            AppError::Unexpected(format!("任务 panic: {}", err))
        } else {
            AppError::Unexpected(format!("任务被取消: {}", err))
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
