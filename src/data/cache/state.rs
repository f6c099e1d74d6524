//! 查询条目状态与观察者看到的快照

use chrono::{DateTime, Utc};
use std::any::Any;
use std::sync::Arc;

use crate::services::request::RequestError;

/// 类型擦除后的查询数据
pub type QueryData = Arc<dyn Any + Send + Sync>;

/// 查询状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Fetching,
    Success,
    Error,
}

/// 条目内部快照，经 watch 通道广播给观察者
#[derive(Clone)]
pub(crate) struct EntrySnapshot {
    pub(crate) status: QueryStatus,
    pub(crate) data: Option<QueryData>,
    pub(crate) error: Option<RequestError>,
    pub(crate) fetched_at: Option<DateTime<Utc>>,
}

impl EntrySnapshot {
    pub(crate) fn fetching() -> Self {
        Self {
            status: QueryStatus::Fetching,
            data: None,
            error: None,
            fetched_at: None,
        }
    }
}

/// 观察者读取到的带类型状态
///
/// 重新拉取期间 `data` 保留上一次成功的结果。
#[derive(Debug)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<RequestError>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            fetched_at: self.fetched_at,
        }
    }
}

impl<T: Send + Sync + 'static> QueryState<T> {
    pub(crate) fn from_snapshot(snapshot: &EntrySnapshot) -> Self {
        let data = snapshot
            .data
            .clone()
            .and_then(|data| match data.downcast::<T>() {
                Ok(typed) => Some(typed),
                Err(_) => {
                    tracing::warn!(
                        expected = std::any::type_name::<T>(),
                        "查询数据类型不匹配，已忽略"
                    );
                    None
                }
            });

        Self {
            status: snapshot.status,
            data,
            error: snapshot.error.clone(),
            fetched_at: snapshot.fetched_at,
        }
    }
}

impl<T> QueryState<T> {
    /// 首次加载中（还没有任何数据）
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Fetching && self.data.is_none()
    }

    /// 有请求在途（包括后台重新拉取）
    pub fn is_fetching(&self) -> bool {
        self.status == QueryStatus::Fetching
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }
}
