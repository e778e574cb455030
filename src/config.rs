use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;

/// 指定配置文件路径的环境变量
pub const CONFIG_FILE_ENV: &str = "PDF_DIGEST_CONFIG";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 待处理文档所在目录
    pub documents_folder: String,
    /// 存储命名空间（数据库名）
    pub database_name: String,
    /// 存储集合名
    pub collection_name: String,
    /// 存储根目录
    pub store_root: String,
    /// 文档扩展名（不含点）
    pub document_extension: String,
    /// 同时处理的文档数量
    pub max_concurrent_documents: usize,
    /// 摘要句子数
    pub summary_sentences: usize,
    /// 关键词数量
    pub keyword_count: usize,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            documents_folder: "pdfs".to_string(),
            database_name: "pdf_summarization3".to_string(),
            collection_name: "summaries".to_string(),
            store_root: "output_db".to_string(),
            document_extension: "pdf".to_string(),
            max_concurrent_documents: default_concurrency(),
            summary_sentences: 3,
            keyword_count: 5,
            output_log_file: "output.txt".to_string(),
            verbose_logging: false,
        }
    }
}

/// 存储目标：命名空间 + 集合
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreTarget {
    pub namespace: String,
    pub collection: String,
}

impl StoreTarget {
    /// 名称中的空格替换为下划线
    pub fn new(namespace: &str, collection: &str) -> Self {
        Self {
            namespace: namespace.replace(' ', "_"),
            collection: collection.replace(' ', "_"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            documents_folder: std::env::var("DOCUMENTS_FOLDER").unwrap_or(default.documents_folder),
            database_name: std::env::var("DATABASE_NAME").unwrap_or(default.database_name),
            collection_name: std::env::var("COLLECTION_NAME").unwrap_or(default.collection_name),
            store_root: std::env::var("STORE_ROOT").unwrap_or(default.store_root),
            document_extension: std::env::var("DOCUMENT_EXTENSION").unwrap_or(default.document_extension),
            max_concurrent_documents: std::env::var("MAX_CONCURRENT_DOCUMENTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_documents),
            summary_sentences: std::env::var("SUMMARY_SENTENCES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.summary_sentences),
            keyword_count: std::env::var("KEYWORD_COUNT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.keyword_count),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 从 TOML 文件加载配置，缺省字段取默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    fn from_toml_str(content: &str, origin: &str) -> AppResult<Self> {
        let config: Config =
            toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
                path: origin.to_string(),
                source,
            })?;
        Ok(config)
    }

    /// 设置了 `PDF_DIGEST_CONFIG` 时读取 TOML 文件，否则读取环境变量
    pub fn load() -> AppResult<Self> {
        let config = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) => Self::from_toml_file(path)?,
            Err(_) => Self::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.max_concurrent_documents == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrent_documents",
                reason: "并发数必须大于 0".to_string(),
            }
            .into());
        }
        if self.database_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database_name",
                reason: "不能为空".to_string(),
            }
            .into());
        }
        if self.collection_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "collection_name",
                reason: "不能为空".to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn store_target(&self) -> StoreTarget {
        StoreTarget::new(&self.database_name, &self.collection_name)
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
