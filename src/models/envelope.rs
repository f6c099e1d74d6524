//! 远程 API 的统一响应信封 `{status, message, data}`

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::services::request::RequestError;

/// API 响应信封
///
/// 服务端在成功时 `message` 可能缺省，集合接口的 `data` 可能为 `null`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// 从已解析的 JSON 中读取信封
    pub fn from_value(value: serde_json::Value) -> Result<Self, RequestError> {
        serde_json::from_value(value)
            .map_err(|e| RequestError::decode(format!("响应信封格式不符: {e}")))
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// 集合接口：`data` 缺失或为 `null` 时返回空列表
    pub fn into_list(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}
