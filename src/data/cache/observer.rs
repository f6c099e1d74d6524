use std::marker::PhantomData;
use tokio::sync::watch;

use super::key::QueryKey;
use super::query_cache::QueryCache;
use super::state::{EntrySnapshot, QueryState};

/// 查询观察者
///
/// 持有期间条目保持活跃；释放最后一个观察者后条目进入保留区。
pub struct QueryObserver<T> {
    cache: QueryCache,
    key: QueryKey,
    rx: watch::Receiver<EntrySnapshot>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> QueryObserver<T> {
    pub(crate) fn new(cache: QueryCache, key: QueryKey, rx: watch::Receiver<EntrySnapshot>) -> Self {
        Self {
            cache,
            key,
            rx,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// 当前状态快照
    pub fn state(&self) -> QueryState<T> {
        QueryState::from_snapshot(&self.rx.borrow())
    }

    /// 等待下一次状态变化；条目被清除后返回 false
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// 等待当前请求结束，返回结束时的状态
    pub async fn settled(&mut self) -> QueryState<T> {
        loop {
            let state = QueryState::from_snapshot(&self.rx.borrow_and_update());
            if !state.is_fetching() {
                return state;
            }
            if !self.changed().await {
                return self.state();
            }
        }
    }

    /// 手动重新拉取，请求在途时返回 false
    pub fn refetch(&self) -> bool {
        self.cache.refetch(&self.key)
    }
}

impl<T> Drop for QueryObserver<T> {
    fn drop(&mut self) {
        self.cache.release(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cache::QueryDescriptor;
    use crate::services::request::RequestError;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_changed_fires_when_fetch_completes() {
        let cache = QueryCache::default();
        let gate = Arc::new(Notify::new());
        let descriptor = {
            let gate = Arc::clone(&gate);
            QueryDescriptor::new(QueryKey::new("semesters"), move || {
                let gate = Arc::clone(&gate);
                async move {
                    gate.notified().await;
                    Ok::<_, RequestError>(vec!["Fall 2024".to_string()])
                }
            })
        };

        let mut observer = cache.observe(&descriptor);
        assert_eq!(observer.key(), &QueryKey::new("semesters"));
        assert!(observer.state().is_loading());

        gate.notify_one();
        assert!(observer.changed().await);
        assert!(observer.state().is_success());
    }

    #[tokio::test]
    async fn test_new_observer_waits_for_a_real_change() {
        let cache = QueryCache::default();
        let gate = Arc::new(Notify::new());
        let descriptor = {
            let gate = Arc::clone(&gate);
            QueryDescriptor::new(QueryKey::new("events"), move || {
                let gate = Arc::clone(&gate);
                async move {
                    gate.notified().await;
                    Ok::<_, RequestError>(3_usize)
                }
            })
        };

        let mut observer = cache.observe(&descriptor);
        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(20), observer.changed()).await;
        assert!(waited.is_err());
        assert!(observer.state().is_loading());

        gate.notify_one();
        assert!(observer.changed().await);
        assert_eq!(observer.state().data.as_deref(), Some(&3));
    }

    #[tokio::test]
    async fn test_dropping_last_observer_moves_entry_to_retention() {
        let cache = QueryCache::default();
        let descriptor = QueryDescriptor::new(QueryKey::new("events"), || async {
            Ok::<_, RequestError>(Vec::<String>::new())
        });

        let first = cache.observe(&descriptor);
        let second = cache.observe(&descriptor);
        drop(first);
        // 仍有观察者时失效会重新拉取
        assert_eq!(cache.invalidate(&QueryKey::new("events")), 1);
        drop(second);
        assert_eq!(cache.invalidate(&QueryKey::new("events")), 0);
    }
}
