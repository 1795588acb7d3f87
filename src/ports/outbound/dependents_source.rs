use crate::analysis::domain::DependentRepo;
use crate::shared::Result;
use async_trait::async_trait;

/// Dependent counts for one package
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DependentsSummary {
    pub dependents_count: u64,
    pub dependent_repos_count: u64,
}

/// DependentsSource port for the reverse-dependency API
///
/// Implementations are expected to pace their own requests.
#[async_trait]
pub trait DependentsSource: Send + Sync {
    /// Fetches the dependent-count summary of a package
    async fn fetch_summary(&self, package_name: &str) -> Result<DependentsSummary>;

    /// Fetches up to `limit` dependent repositories, most-starred first
    async fn fetch_top_dependent_repos(
        &self,
        package_name: &str,
        limit: usize,
    ) -> Result<Vec<DependentRepo>>;
}
