//! 请求客户端模块
//!
//! - `client`: 基于 reqwest 的远程调用与响应归一
//! - `error`: 统一的请求错误类型

pub mod client;
pub mod error;

pub use client::{interpret_response, RequestClient};
pub use error::RequestError;
pub use reqwest::Method;
