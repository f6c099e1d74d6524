//! 远程数据同步层
//!
//! 查询结果按键缓存在 `QueryCache` 中，表格外壳通过 `QueryObserver` 订阅。

pub mod cache;

pub use cache::{QueryCache, QueryDescriptor, QueryKey, QueryObserver, QueryState, QueryStatus};
