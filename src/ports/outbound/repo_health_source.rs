use crate::analysis::domain::RepoHealth;
use crate::shared::Result;
use async_trait::async_trait;

/// RepoHealthSource port for repository maintenance signals
///
/// # Async Support
/// Implementations must be `Send + Sync`; health for many repositories is
/// fetched concurrently.
#[async_trait]
pub trait RepoHealthSource: Send + Sync {
    /// Fetches health signals for a canonical repository URL
    ///
    /// # Returns
    /// The empty `RepoHealth` record for repositories the source cannot probe
    async fn fetch_health(&self, repository_url: &str) -> Result<RepoHealth>;
}

#[async_trait]
impl<T: RepoHealthSource + ?Sized> RepoHealthSource for std::sync::Arc<T> {
    async fn fetch_health(&self, repository_url: &str) -> Result<RepoHealth> {
        (**self).fetch_health(repository_url).await
    }
}
