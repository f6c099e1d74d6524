//! 远程 API 请求客户端
//!
//! 负责把一次 HTTP 调用归一为 `Result<Value, RequestError>`：
//! - 始终携带 JSON Content-Type，有请求体时序列化为 JSON
//! - 仅 200 / 201 视为成功
//! - 其他状态码提取响应体中的 `message` 字段作为错误信息
//!
//! 客户端本身无状态，不做重试与缓存。

use std::time::Instant;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::RequestError;
use crate::core::error::{AppError, AppResult};
use crate::core::http::build_http_client;
use crate::models::{ApiConfig, ApiResponse};

const JSON_CONTENT_TYPE: &str = "application/json";

/// 面向单个 API 基地址的请求客户端
#[derive(Debug, Clone)]
pub struct RequestClient {
    http: Client,
    base_url: Url,
}

impl RequestClient {
    pub fn new(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// 按 API 配置构建客户端（代理、超时、UA 由 `build_http_client` 统一处理）
    pub fn from_config(config: &ApiConfig) -> AppResult<Self> {
        let http = build_http_client(config)?;
        let base_url = Url::parse(&config.base_url).map_err(|e| AppError::Config {
            reason: format!("API 地址无效 {}: {e}", config.base_url),
        })?;
        Ok(Self::new(http, base_url))
    }

    /// 将端点解析为完整 URL，绝对地址原样使用
    pub fn resolve(&self, endpoint: &str) -> Result<Url, RequestError> {
        self.base_url
            .join(endpoint)
            .map_err(|e| RequestError::transport(format!("无效的请求地址 {endpoint}: {e}")))
    }

    /// 发送请求并返回解析后的 JSON
    pub async fn send(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, RequestError> {
        let url = self.resolve(endpoint)?;

        tracing::debug!(method = %method, url = %url, has_body = body.is_some(), "发送请求");
        let started = Instant::now();

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = %method, url = %url, error = %e, "请求未获得响应");
            RequestError::from(e)
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!(method = %method, url = %url, status, error = %e, "读取响应体失败");
            RequestError::from(e)
        })?;

        let result = interpret_response(status, &bytes);
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(_) => tracing::debug!(method = %method, url = %url, status, elapsed_ms, "请求完成"),
            Err(e) => {
                tracing::warn!(method = %method, url = %url, status, elapsed_ms, error = %e, "请求失败")
            }
        }
        result
    }

    /// GET 一个集合接口，`data` 为空时返回空列表
    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<Vec<T>, RequestError> {
        let value = self.send(endpoint, Method::GET, None).await?;
        Ok(ApiResponse::<Vec<T>>::from_value(value)?.into_list())
    }

    /// 发送写请求并返回完整信封
    ///
    /// 变更接口的 `data` 形状不固定（单条、列表或缺省），空响应视为没有数据的成功信封。
    pub async fn send_envelope<B>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&B>,
    ) -> Result<ApiResponse<Value>, RequestError>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| RequestError::decode(format!("请求体序列化失败: {e}")))?;
        match self.send(endpoint, method, body.as_ref()).await? {
            Value::Null => Ok(ApiResponse {
                status: "success".to_string(),
                message: String::new(),
                data: None,
            }),
            value => ApiResponse::from_value(value),
        }
    }
}

/// 按状态码与响应体归一结果
pub fn interpret_response(status: u16, body: &[u8]) -> Result<Value, RequestError> {
    match status {
        200 | 201 => {
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }
            serde_json::from_slice(body).map_err(|e| RequestError::decode(e.to_string()))
        }
        _ => Err(RequestError::from_response(status, body)),
    }
}
