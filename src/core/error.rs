//! 应用层统一错误类型
//!
//! 覆盖配置、文件 I/O、HTTP 客户端构建与远程请求失败，二进制入口再统一转为 `anyhow`。

use std::path::PathBuf;
use thiserror::Error;

use crate::services::request::RequestError;

#[derive(Error, Debug)]
pub enum AppError {
    /// 配置内容无效
    #[error("配置无效: {reason}")]
    Config { reason: String },

    /// 代理配置无效
    #[error("代理配置无效: {reason}")]
    ProxyConfigError { reason: String },

    /// 文件 I/O 错误
    #[error("文件 I/O 错误: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON 序列化/反序列化错误
    #[error("JSON 序列化错误: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP 客户端构建失败
    #[error("HTTP 客户端构建失败: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// 远程请求失败
    #[error("请求失败: {0}")]
    Request(#[from] RequestError),

    /// 资源未找到
    #[error("未找到资源: {0}")]
    NotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    /// 从 `std::io::Error` 和路径创建 I/O 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
