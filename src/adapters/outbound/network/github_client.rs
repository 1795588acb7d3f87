use super::http::build_http_client;
use crate::analysis::domain::{RepoHealth, RepoSlug};
use crate::ports::outbound::RepoHealthSource;
use crate::shared::{RateLimiter, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

const GITHUB_API_URL: &str = "https://api.github.com";
/// Closed pull requests sampled for the external merge ratio
const CLOSED_PULLS_SAMPLE: usize = 100;
const CONTRIBUTING_PATHS: [&str; 2] = ["CONTRIBUTING.md", ".github/CONTRIBUTING.md"];
/// Author associations that count as maintainers rather than outside contributors
const MAINTAINER_ASSOCIATIONS: [&str; 3] = ["OWNER", "MEMBER", "COLLABORATOR"];

#[derive(Debug, Deserialize)]
struct RepositoryDocument {
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    #[serde(default)]
    author_association: String,
    #[serde(default)]
    merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
}

/// GitHubClient adapter for repository health signals
///
/// Without a token it answers every request with the empty health record:
/// anonymous GitHub limits are too low for a full run.
pub struct GitHubClient {
    client: reqwest::Client,
    limiter: RateLimiter,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(limiter: RateLimiter, token: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            limiter,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    async fn get(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", GITHUB_API_URL, path);
        let response = self
            .limiter
            .execute(|| {
                self.client
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "application/vnd.github+json")
                    .header("X-GitHub-Api-Version", "2022-11-28")
                    .bearer_auth(token)
                    .send()
            })
            .await?;
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T> {
        let response = self.get(path, token).await?;
        if !response.status().is_success() {
            anyhow::bail!("GitHub API returned status code {} for {}", response.status(), path);
        }
        Ok(response.json().await?)
    }

    async fn has_contributing_guide(&self, slug: &RepoSlug, token: &str) -> bool {
        for file in CONTRIBUTING_PATHS {
            let path = format!("/repos/{}/{}/contents/{}", slug.owner(), slug.repo(), file);
            if let Ok(response) = self.get(&path, token).await {
                if response.status().is_success() {
                    return true;
                }
            }
        }
        false
    }

    /// `(merged, closed)` counts among pull requests from outside contributors
    fn external_pull_counts(pulls: &[PullRequest]) -> (u32, u32) {
        let external = pulls
            .iter()
            .filter(|pr| !MAINTAINER_ASSOCIATIONS.contains(&pr.author_association.as_str()));
        let (merged, closed) = external.fold((0u32, 0u32), |(merged, closed), pr| {
            (merged + u32::from(pr.merged_at.is_some()), closed + 1)
        });
        (merged, closed)
    }

    fn days_since(instant: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
        instant.map(|t| (now - t).num_days().max(0))
    }
}

#[async_trait]
impl RepoHealthSource for GitHubClient {
    async fn fetch_health(&self, repository_url: &str) -> Result<RepoHealth> {
        let Some(token) = self.token.as_deref() else {
            return Ok(RepoHealth::default());
        };
        let Some(slug) = RepoSlug::from_url(repository_url) else {
            return Ok(RepoHealth::default());
        };

        let base = format!("/repos/{}/{}", slug.owner(), slug.repo());
        let repo: RepositoryDocument = self.get_json(&base, token).await?;

        // Secondary signals degrade to their defaults individually
        let pulls: Vec<PullRequest> = self
            .get_json(
                &format!("{}/pulls?state=closed&per_page={}", base, CLOSED_PULLS_SAMPLE),
                token,
            )
            .await
            .unwrap_or_default();
        let releases: Vec<Release> = self
            .get_json(&format!("{}/releases?per_page=1", base), token)
            .await
            .unwrap_or_default();
        let has_contributing_guide = self.has_contributing_guide(&slug, token).await;

        let now = Utc::now();
        let (external_prs_merged, external_prs_closed) = Self::external_pull_counts(&pulls);

        Ok(RepoHealth {
            days_since_last_commit: Self::days_since(repo.pushed_at, now),
            days_since_last_release: Self::days_since(
                releases.first().and_then(|r| r.published_at),
                now,
            ),
            archived: repo.archived,
            external_prs_merged,
            external_prs_closed,
            contributor_count_recent: 0,
            has_contributing_guide,
            stars: repo.stargazers_count,
        })
    }
}
