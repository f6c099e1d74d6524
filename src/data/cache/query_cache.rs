//! 远程查询缓存
//!
//! 按 `QueryKey` 保存异步查询结果，负责：
//! - 同一键的并发订阅共享一次请求
//! - 变更成功后按前缀失效并重新拉取（保留旧数据直到新结果到达）
//! - 观察者全部释放后进入有容量和回收时间的保留区
//!
//! 所有条目访问都经过同一把锁，锁从不跨越 `.await`。

use chrono::Utc;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::watch;

use super::key::QueryKey;
use super::lru::LruCache;
use super::observer::QueryObserver;
use super::state::{EntrySnapshot, QueryData, QueryStatus};
use crate::models::CacheConfig;
use crate::services::request::RequestError;

type FetchFuture<T> = BoxFuture<'static, Result<T, RequestError>>;
type ErasedFetch = Arc<dyn Fn() -> FetchFuture<QueryData> + Send + Sync>;
type TypedFetch<T> = Arc<dyn Fn() -> FetchFuture<T> + Send + Sync>;

/// 查询描述：键 + 拉取函数
pub struct QueryDescriptor<T> {
    key: QueryKey,
    fetch: TypedFetch<T>,
}

impl<T> Clone for QueryDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            fetch: Arc::clone(&self.fetch),
        }
    }
}

impl<T: Send + Sync + 'static> QueryDescriptor<T> {
    pub fn new<F, Fut>(key: QueryKey, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, RequestError>> + Send + 'static,
    {
        Self {
            key,
            fetch: Arc::new(move || fetch().boxed()),
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    fn erased_fetch(&self) -> ErasedFetch {
        let fetch = Arc::clone(&self.fetch);
        Arc::new(move || {
            let pending = fetch();
            async move { pending.await.map(|data| Arc::new(data) as QueryData) }.boxed()
        })
    }
}

struct CacheEntry {
    fetch: ErasedFetch,
    tx: watch::Sender<EntrySnapshot>,
    observers: usize,
    /// 每次发起请求递增，旧请求的结果被丢弃
    generation: u64,
}

impl CacheEntry {
    fn start_fetch(&mut self) -> (u64, FetchFuture<QueryData>) {
        self.generation += 1;
        self.tx.send_modify(|snapshot| snapshot.status = QueryStatus::Fetching);
        (self.generation, (self.fetch)())
    }
}

struct CacheInner {
    /// 有观察者的条目
    active: HashMap<QueryKey, CacheEntry>,
    /// 无观察者、等待回收的条目
    retained: LruCache<QueryKey, CacheEntry>,
}

impl CacheInner {
    fn entry_mut(&mut self, key: &QueryKey) -> Option<&mut CacheEntry> {
        match self.active.get_mut(key) {
            Some(entry) => Some(entry),
            None => self.retained.get_mut(key),
        }
    }
}

/// 查询缓存句柄，克隆后共享同一份存储
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Mutex<CacheInner>>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        let retained = LruCache::new(
            config.retained_capacity,
            Duration::from_secs(config.gc_time_secs),
        );
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                active: HashMap::new(),
                retained,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 订阅查询
    ///
    /// 该键没有条目时立即发起一次请求；已有条目（在途、已完成或在保留区中）时
    /// 直接加入，不会重复请求。必须在 tokio 运行时内调用。
    pub fn observe<T>(&self, descriptor: &QueryDescriptor<T>) -> QueryObserver<T>
    where
        T: Send + Sync + 'static,
    {
        let key = descriptor.key.clone();
        let mut pending = None;

        let rx = {
            let mut inner = self.lock();
            if let Some(entry) = inner.active.get_mut(&key) {
                entry.observers += 1;
                tracing::debug!(key = %key, observers = entry.observers, "加入已有查询");
                entry.tx.subscribe()
            } else if let Some(mut entry) = inner.retained.take(&key) {
                entry.observers = 1;
                entry.fetch = descriptor.erased_fetch();
                // 失败的结果不沿用，重新挂载即重试
                let failed = entry.tx.borrow().status == QueryStatus::Error;
                if failed {
                    pending = Some(entry.start_fetch());
                }
                let rx = entry.tx.subscribe();
                inner.active.insert(key.clone(), entry);
                tracing::debug!(key = %key, refetch = failed, "从保留区恢复查询");
                rx
            } else {
                let (tx, _) = watch::channel(EntrySnapshot::fetching());
                let mut entry = CacheEntry {
                    fetch: descriptor.erased_fetch(),
                    tx,
                    observers: 1,
                    generation: 0,
                };
                pending = Some(entry.start_fetch());
                // 在发起请求之后订阅，接收端只会看到之后的真实变化
                let rx = entry.tx.subscribe();
                inner.active.insert(key.clone(), entry);
                tracing::debug!(key = %key, "新建查询并发起请求");
                rx
            }
        };

        if let Some((generation, fetch)) = pending {
            self.spawn_fetch(key.clone(), generation, fetch);
        }

        QueryObserver::new(self.clone(), key, rx)
    }

    /// 释放一个观察者；最后一个观察者释放后条目进入保留区
    pub(crate) fn release(&self, key: &QueryKey) {
        let mut inner = self.lock();
        let Some(entry) = inner.active.get_mut(key) else {
            return;
        };

        entry.observers = entry.observers.saturating_sub(1);
        if entry.observers > 0 {
            return;
        }

        if let Some(entry) = inner.active.remove(key) {
            inner.retained.purge_expired();
            inner.retained.insert(key.clone(), entry);
            tracing::debug!(key = %key, "查询已无观察者，移入保留区");
        }
    }

    /// 精确失效
    ///
    /// 返回发起重新拉取的条目数量。
    pub fn invalidate(&self, key: &QueryKey) -> usize {
        self.invalidate_where(|candidate| candidate == key)
    }

    /// 前缀失效：`prefix` 匹配的所有键
    pub fn invalidate_matching(&self, prefix: &QueryKey) -> usize {
        self.invalidate_where(|candidate| candidate.matches_prefix(prefix))
    }

    fn invalidate_where(&self, predicate: impl Fn(&QueryKey) -> bool) -> usize {
        let (restarted, dropped) = {
            let mut inner = self.lock();
            let dropped = inner.retained.remove_where(&predicate);
            let restarted: Vec<_> = inner
                .active
                .iter_mut()
                .filter(|(key, _)| predicate(*key))
                .map(|(key, entry)| {
                    let (generation, fetch) = entry.start_fetch();
                    (key.clone(), generation, fetch)
                })
                .collect();
            (restarted, dropped)
        };

        let count = restarted.len();
        for (key, generation, fetch) in restarted {
            tracing::debug!(key = %key, generation, "查询失效，重新拉取");
            self.spawn_fetch(key, generation, fetch);
        }
        if dropped > 0 {
            tracing::debug!(dropped, "移除无观察者的失效查询");
        }
        count
    }

    /// 手动重新拉取；已有请求在途时不做任何事
    pub fn refetch(&self, key: &QueryKey) -> bool {
        let started = {
            let mut inner = self.lock();
            match inner.active.get_mut(key) {
                Some(entry) if entry.tx.borrow().status != QueryStatus::Fetching => {
                    Some(entry.start_fetch())
                }
                _ => None,
            }
        };

        match started {
            Some((generation, fetch)) => {
                self.spawn_fetch(key.clone(), generation, fetch);
                true
            }
            None => false,
        }
    }

    fn spawn_fetch(
        &self,
        key: QueryKey,
        generation: u64,
        fetch: FetchFuture<QueryData>,
    ) {
        let cache = self.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let result = fetch.await;
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            cache.apply_result(&key, generation, result, elapsed_ms);
        });
    }

    fn apply_result(
        &self,
        key: &QueryKey,
        generation: u64,
        result: Result<QueryData, RequestError>,
        elapsed_ms: u64,
    ) {
        let mut inner = self.lock();
        let Some(entry) = inner.entry_mut(key) else {
            tracing::debug!(key = %key, "查询条目已移除，丢弃结果");
            return;
        };

        if entry.generation != generation {
            tracing::debug!(
                key = %key,
                generation,
                current = entry.generation,
                "请求已被更新的请求取代，丢弃结果"
            );
            return;
        }

        match result {
            Ok(data) => {
                tracing::debug!(key = %key, elapsed_ms, "查询成功");
                entry.tx.send_modify(|snapshot| {
                    snapshot.status = QueryStatus::Success;
                    snapshot.data = Some(data);
                    snapshot.error = None;
                    snapshot.fetched_at = Some(Utc::now());
                });
            }
            Err(error) => {
                tracing::warn!(key = %key, elapsed_ms, error = %error, "查询失败");
                entry.tx.send_modify(|snapshot| {
                    snapshot.status = QueryStatus::Error;
                    snapshot.error = Some(error);
                });
            }
        }
    }

    /// 读取已缓存的数据
    pub fn get_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let mut inner = self.lock();
        let data = inner.entry_mut(key)?.tx.borrow().data.clone()?;
        match data.downcast::<T>() {
            Ok(typed) => Some(typed),
            Err(_) => {
                tracing::warn!(
                    key = %key,
                    expected = std::any::type_name::<T>(),
                    "查询数据类型不匹配"
                );
                None
            }
        }
    }

    /// 直接写入数据（例如使用变更接口的返回值）
    ///
    /// 只更新已存在的条目；在途请求的结果会被丢弃。返回是否写入。
    pub fn set_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey, data: T) -> bool {
        let mut inner = self.lock();
        let Some(entry) = inner.entry_mut(key) else {
            return false;
        };

        entry.generation += 1;
        let data: QueryData = Arc::new(data);
        entry.tx.send_modify(|snapshot| {
            snapshot.status = QueryStatus::Success;
            snapshot.data = Some(data);
            snapshot.error = None;
            snapshot.fetched_at = Some(Utc::now());
        });
        true
    }

    /// 条目数量（包括保留区）
    pub fn len(&self) -> usize {
        let inner = self.lock();
        inner.active.len() + inner.retained.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清空所有条目，现存观察者看到 `Idle`
    pub fn clear(&self) {
        let mut inner = self.lock();
        for entry in inner.active.values() {
            entry.tx.send_modify(|snapshot| {
                snapshot.status = QueryStatus::Idle;
                snapshot.data = None;
                snapshot.error = None;
                snapshot.fetched_at = None;
            });
        }
        inner.active.clear();
        inner.retained.clear();
        tracing::debug!("查询缓存已清空");
    }
}
