use crate::analysis::domain::{normalize_repository_url, RepoHealth};
use crate::ports::outbound::RepoHealthSource;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// CachingRepoHealthSource wraps a RepoHealthSource and remembers every answer.
///
/// Keys are normalized, lowercased repository URLs, so a monorepo referenced
/// through several URL spellings is probed once per run. The package stage
/// and the target-repository stage share the same instance.
pub struct CachingRepoHealthSource<R: RepoHealthSource> {
    inner: R,
    cache: Arc<DashMap<String, RepoHealth>>,
}

impl<R: RepoHealthSource> CachingRepoHealthSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    fn cache_key(repository_url: &str) -> String {
        normalize_repository_url(repository_url)
            .unwrap_or_else(|| repository_url.trim().to_string())
            .to_ascii_lowercase()
    }

    /// Number of distinct repositories fetched so far
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<R: RepoHealthSource> RepoHealthSource for CachingRepoHealthSource<R> {
    async fn fetch_health(&self, repository_url: &str) -> Result<RepoHealth> {
        let key = Self::cache_key(repository_url);

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let health = self.inner.fetch_health(repository_url).await?;
        self.cache.insert(key, health.clone());
        Ok(health)
    }
}
