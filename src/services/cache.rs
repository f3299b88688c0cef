//! 限时缓存
//!
//! 基于 moka 的同步缓存，条目写入后经过 ttl 即失效，查询时只返回未过期的值。
//! 写入直接覆盖同键旧值（后写者胜）。ttl 为 0 时不缓存。

use moka::sync::Cache;
use std::hash::Hash;
use std::time::Duration;

/// 单个缓存的最大条目数
const MAX_ENTRIES: u64 = 10_000;

pub struct TtlCache<K, V> {
    inner: Option<Cache<K, V>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        let inner = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(ttl)
                .build()
        });
        Self { inner }
    }

    /// 获取未过期的缓存值
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.as_ref()?.get(key)
    }

    /// 写入缓存，过期时间为当前时间加 ttl
    pub fn insert(&self, key: K, value: V) {
        if let Some(cache) = &self.inner {
            cache.insert(key, value);
        }
    }
}
