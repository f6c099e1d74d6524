//! 查询缓存层
//!
//! - `key`: 查询键（基础名 + 参数，支持前缀匹配）
//! - `lru`: 通用 LRU 缓存（容量限制 + TTL 过期），用作无观察者条目的保留区
//! - `state`: 条目状态与观察者快照
//! - `query_cache`: 请求去重、失效重拉、观察者生命周期
//! - `observer`: 查询观察者

pub mod key;
pub mod lru;
pub mod observer;
pub mod query_cache;
pub mod state;

pub use key::QueryKey;
pub use lru::LruCache;
pub use observer::QueryObserver;
pub use query_cache::{QueryCache, QueryDescriptor};
pub use state::{QueryState, QueryStatus};
