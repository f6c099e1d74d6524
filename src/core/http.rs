use crate::core::error::{AppError, AppResult};
use crate::models::ApiConfig;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("Rollcall/", env!("CARGO_PKG_VERSION"));

/// 构建带代理与超时配置的 HTTP 客户端
///
/// # 参数
/// - `config`: API 连接配置（超时、可选代理）
///
/// # 返回
/// - 配置好的 reqwest::Client
pub fn build_http_client(config: &ApiConfig) -> AppResult<Client> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs.max(1)))
        .redirect(reqwest::redirect::Policy::limited(10));

    if let Some(proxy_url) = config.proxy_url.as_deref().filter(|url| !url.trim().is_empty()) {
        validate_proxy_url(proxy_url)?;
        let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| AppError::ProxyConfigError {
            reason: format!("代理 URL 无效: {e}"),
        })?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(AppError::from)
}

/// 校验代理地址的协议
fn validate_proxy_url(proxy_url: &str) -> AppResult<()> {
    let scheme = proxy_url
        .split_once("://")
        .map(|(scheme, _)| scheme)
        .ok_or_else(|| AppError::ProxyConfigError {
            reason: format!("代理 URL 缺少协议: {proxy_url}"),
        })?;

    match scheme {
        "http" | "https" | "socks5" | "socks5h" => Ok(()),
        other => Err(AppError::ProxyConfigError {
            reason: format!("不支持的代理协议: {other}"),
        }),
    }
}
