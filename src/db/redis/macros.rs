/// Read-through caching on top of [`Cache`](crate::db::Cache).
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$future`, queues the result for a background write with `$ttl` seconds to
/// live, and returns it. Expands to an `AppResult`, so it is usually the tail
/// expression of a function returning one.
///
/// ```rust,ignore
/// async fn cached_download(&self, cache: &Cache) -> AppResult<String> {
///     let key = CacheKey::Catalog(self.url.clone());
///     cached!(cache, key, 3600, self.download())
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $future:expr) => {{
        let key = &$key;
        if let Some(cached) = $cache.get_from_cache(key).await? {
            tracing::debug!(key = %key, "Cache hit");
            Ok(cached)
        } else {
            tracing::debug!(key = %key, "Cache miss");
            let value = $future.await?;
            $cache.set_in_background(key, &value, $ttl);
            Ok(value)
        }
    }};
}
