use async_trait::async_trait;
use e18e_analyzer::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock DependentsSource with fixed counts and top repositories
#[derive(Default)]
pub struct MockDependentsSource {
    summaries: HashMap<String, DependentsSummary>,
    top_repos: HashMap<String, Vec<DependentRepo>>,
}

impl MockDependentsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, name: &str, dependents: u64, repos: &[(&str, u64)]) -> Self {
        self.summaries.insert(
            name.to_string(),
            DependentsSummary {
                dependents_count: dependents,
                dependent_repos_count: repos.len() as u64,
            },
        );
        self.top_repos.insert(
            name.to_string(),
            repos
                .iter()
                .map(|(full_name, stars)| DependentRepo {
                    full_name: full_name.to_string(),
                    stars: *stars,
                })
                .collect(),
        );
        self
    }
}

#[async_trait]
impl DependentsSource for MockDependentsSource {
    async fn fetch_summary(&self, package_name: &str) -> Result<DependentsSummary> {
        Ok(self.summaries.get(package_name).copied().unwrap_or_default())
    }

    async fn fetch_top_dependent_repos(
        &self,
        package_name: &str,
        limit: usize,
    ) -> Result<Vec<DependentRepo>> {
        let mut repos = self.top_repos.get(package_name).cloned().unwrap_or_default();
        repos.truncate(limit);
        Ok(repos)
    }
}

/// Mock DownloadCountSource with fixed weekly downloads
#[derive(Default)]
pub struct MockDownloadSource {
    downloads: HashMap<String, u64>,
}

impl MockDownloadSource {
    pub fn new(downloads: &[(&str, u64)]) -> Self {
        Self {
            downloads: downloads.iter().map(|(n, d)| (n.to_string(), *d)).collect(),
        }
    }
}

#[async_trait]
impl DownloadCountSource for MockDownloadSource {
    async fn fetch_weekly_downloads(&self, package_names: &[String]) -> Result<HashMap<String, u64>> {
        Ok(package_names
            .iter()
            .filter_map(|n| self.downloads.get(n).map(|d| (n.clone(), *d)))
            .collect())
    }
}

/// Mock RegistryMetadataSource mapping each package to a repository URL
#[derive(Default)]
pub struct MockRegistry {
    metadata: HashMap<String, RegistryMetadata>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository(mut self, name: &str, repository_url: &str) -> Self {
        self.metadata.insert(
            name.to_string(),
            RegistryMetadata {
                repository_url: Some(repository_url.to_string()),
                ..Default::default()
            },
        );
        self
    }

    pub fn with_metadata(mut self, name: &str, metadata: RegistryMetadata) -> Self {
        self.metadata.insert(name.to_string(), metadata);
        self
    }
}

#[async_trait]
impl RegistryMetadataSource for MockRegistry {
    async fn fetch_metadata(&self, package_name: &str) -> Result<Option<RegistryMetadata>> {
        Ok(self.metadata.get(package_name).cloned())
    }
}

/// Mock RepoHealthSource keyed by repository URL; records every call
#[derive(Default, Clone)]
pub struct MockRepoHealth {
    health: Arc<HashMap<String, RepoHealth>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockRepoHealth {
    pub fn new(health: Vec<(&str, RepoHealth)>) -> Self {
        Self {
            health: Arc::new(health.into_iter().map(|(u, h)| (u.to_string(), h)).collect()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RepoHealthSource for MockRepoHealth {
    async fn fetch_health(&self, repository_url: &str) -> Result<RepoHealth> {
        self.calls.lock().unwrap().push(repository_url.to_string());
        Ok(self.health.get(repository_url).cloned().unwrap_or_default())
    }
}
