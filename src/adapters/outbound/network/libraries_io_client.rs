use super::http::build_http_client;
use crate::analysis::domain::DependentRepo;
use crate::ports::outbound::{DependentsSource, DependentsSummary};
use crate::shared::{RateLimiter, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const LIBRARIES_IO_URL: &str = "https://libraries.io/api/NPM";
/// Page size of the dependent repositories endpoint
const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct ProjectDocument {
    #[serde(default)]
    dependents_count: u64,
    #[serde(default)]
    dependent_repos_count: u64,
}

#[derive(Debug, Deserialize)]
struct RepositoryDocument {
    full_name: String,
    #[serde(default)]
    stargazers_count: u64,
}

/// LibrariesIoClient adapter for the libraries.io reverse-dependency API
pub struct LibrariesIoClient {
    client: reqwest::Client,
    limiter: RateLimiter,
    api_key: String,
}

impl LibrariesIoClient {
    pub fn new(limiter: RateLimiter, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            limiter,
            api_key: api_key.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &str) -> Result<T> {
        let url = format!(
            "{}/{}?api_key={}{}",
            LIBRARIES_IO_URL,
            path,
            urlencoding::encode(&self.api_key),
            query
        );
        let response = self
            .limiter
            .execute(|| self.client.get(&url).send())
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("libraries.io returned status code {}", response.status());
        }
        Ok(response.json().await?)
    }

    fn top_by_stars(repos: Vec<RepositoryDocument>, limit: usize) -> Vec<DependentRepo> {
        let mut repos: Vec<DependentRepo> = repos
            .into_iter()
            .map(|r| DependentRepo {
                full_name: r.full_name,
                stars: r.stargazers_count,
            })
            .collect();
        repos.sort_by(|a, b| b.stars.cmp(&a.stars).then_with(|| a.full_name.cmp(&b.full_name)));
        repos.truncate(limit);
        repos
    }
}

#[async_trait]
impl DependentsSource for LibrariesIoClient {
    async fn fetch_summary(&self, package_name: &str) -> Result<DependentsSummary> {
        let project: ProjectDocument = self
            .get_json(&urlencoding::encode(package_name), "")
            .await?;
        Ok(DependentsSummary {
            dependents_count: project.dependents_count,
            dependent_repos_count: project.dependent_repos_count,
        })
    }

    async fn fetch_top_dependent_repos(
        &self,
        package_name: &str,
        limit: usize,
    ) -> Result<Vec<DependentRepo>> {
        let path = format!("{}/dependent_repositories", urlencoding::encode(package_name));
        let query = format!("&per_page={}&page=1", limit.clamp(1, MAX_PER_PAGE));
        let repos: Vec<RepositoryDocument> = self.get_json(&path, &query).await?;
        Ok(Self::top_by_stars(repos, limit))
    }
}
