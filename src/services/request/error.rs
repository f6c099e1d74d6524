//! 请求错误类型
//!
//! 所有远程调用的失败都归一为 `RequestError`，供查询缓存与变更执行器共享。

use thiserror::Error;

/// 远程请求失败的统一表示
///
/// 需要 `Clone`：同一个错误会被缓存条目的多个观察者同时读取。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// 服务端返回了非 200/201 的状态码
    #[error("{message}")]
    Http { status: u16, message: String },

    /// 请求没有拿到任何响应（连接失败、超时、地址无效等）
    #[error("{message}")]
    Transport { message: String },

    /// 成功响应的 JSON 无法解析
    #[error("响应解析失败: {message}")]
    Decode { message: String },
}

impl RequestError {
    /// 按服务端响应构造 HTTP 错误
    ///
    /// 优先使用响应体中的 `message` 字段，缺失或为空时回退为通用文案。
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned)
            })
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP error: {status}"));

        Self::Http { status, message }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// HTTP 状态码；传输层失败时为 `None`
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }

    /// 面向用户展示的错误信息
    pub fn message(&self) -> &str {
        match self {
            Self::Http { message, .. }
            | Self::Transport { message }
            | Self::Decode { message } => message,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}
