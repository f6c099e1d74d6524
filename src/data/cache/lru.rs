//! 通用 LRU 缓存实现
//!
//! 提供基于 LRU (Least Recently Used) 淘汰策略的缓存，支持：
//! - 容量限制：超过容量自动淘汰最久未使用的项
//! - TTL 过期：基于时间的自动失效
//!
//! 查询缓存用它保存没有观察者的条目，`ttl` 即回收时间。

use linked_hash_map::LinkedHashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// 缓存条目，包含值和插入时间
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    /// 检查是否已过期
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() > ttl
    }
}

/// LRU 缓存实现
///
/// 使用 `LinkedHashMap` 保证插入顺序，实现 LRU 淘汰策略。
#[derive(Debug)]
pub struct LruCache<K: Eq + Hash, V> {
    cache: LinkedHashMap<K, CacheEntry<V>>,
    capacity: usize,
    ttl: Duration,
}

impl<K: Eq + Hash, V> LruCache<K, V> {
    /// 创建新的 LRU 缓存
    ///
    /// # 参数
    ///
    /// - `capacity`: 缓存容量（最大条目数，0 表示不保留任何项）
    /// - `ttl`: 缓存项的生存时间
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: LinkedHashMap::new(),
            capacity,
            ttl,
        }
    }

    /// 获取缓存值
    ///
    /// 如果键存在且未过期，返回 `Some(&V)` 并将该项移至最近使用位置。
    /// 如果键不存在或已过期，返回 `None`。
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.get_mut(key).map(|value| &*value)
    }

    /// 获取可变引用，过期规则与 `get` 相同
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if self.evict_if_expired(key) {
            return None;
        }
        self.cache.get_refresh(key).map(|entry| &mut entry.value)
    }

    /// 取出缓存值（过期的项视为不存在）
    pub fn take(&mut self, key: &K) -> Option<V> {
        let entry = self.cache.remove(key)?;
        if entry.is_expired(self.ttl) {
            return None;
        }
        Some(entry.value)
    }

    /// 插入缓存值
    ///
    /// 如果键已存在，更新其值和插入时间。
    /// 如果超过容量限制，自动淘汰最久未使用的项。
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }

        if self.cache.contains_key(&key) {
            self.cache.remove(&key);
        }

        while self.cache.len() >= self.capacity {
            self.cache.pop_front();
        }

        self.cache.insert(key, CacheEntry::new(value));
    }

    /// 删除指定键
    ///
    /// 返回被删除的值（如果存在）。
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.cache.remove(key).map(|entry| entry.value)
    }

    /// 清空所有缓存
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// 获取当前缓存项数量（含尚未清理的过期项）
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// 检查缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// 获取缓存容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 清理所有过期项，返回清理数量
    pub fn purge_expired(&mut self) -> usize {
        let before = self.cache.len();
        // 按插入顺序排列，遇到第一个未过期项即可停止
        while let Some((_, entry)) = self.cache.front() {
            if !entry.is_expired(self.ttl) {
                break;
            }
            self.cache.pop_front();
        }
        before - self.cache.len()
    }

    fn evict_if_expired(&mut self, key: &K) -> bool {
        let expired = self
            .cache
            .get(key)
            .is_some_and(|entry| entry.is_expired(self.ttl));
        if expired {
            self.cache.remove(key);
        }
        expired
    }
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// 删除所有满足条件的键，返回删除数量
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&K) -> bool) -> usize {
        let doomed: Vec<K> = self
            .cache
            .keys()
            .filter(|key| predicate(key))
            .cloned()
            .collect();
        for key in &doomed {
            self.cache.remove(key);
        }
        doomed.len()
    }
}
