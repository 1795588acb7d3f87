use super::{Candidate, GraphData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registry facts for one package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryMetadata {
    /// Canonical `https://<host>/<owner>/<repo>` URL
    pub repository_url: Option<String>,
    /// Publish time of the latest version; doubles as the cache freshness fingerprint
    pub last_publish: Option<DateTime<Utc>>,
    pub deprecated: bool,
    pub latest_version: Option<String>,
}

impl RegistryMetadata {
    /// Freshness fingerprint stored alongside cached graph data
    pub fn fingerprint(&self) -> Option<String> {
        self.last_publish.map(|t| t.to_rfc3339())
    }
}

/// Repository health signals.
///
/// `Default` is the documented empty record used whenever the repository is
/// unknown, not on GitHub, or could not be fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoHealth {
    pub days_since_last_commit: Option<i64>,
    pub days_since_last_release: Option<i64>,
    pub archived: bool,
    pub external_prs_merged: u32,
    pub external_prs_closed: u32,
    /// Always 0: counting recent contributors needs another API call per repo
    pub contributor_count_recent: u32,
    pub has_contributing_guide: bool,
    pub stars: u64,
}

impl RepoHealth {
    /// True when no signal at all was observed
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A candidate joined with every signal the enricher gathered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageData {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub weekly_downloads: u64,
    pub registry: Option<RegistryMetadata>,
    pub health: RepoHealth,
    pub graph: GraphData,
}

impl PackageData {
    pub fn new(candidate: Candidate, graph: GraphData) -> Self {
        Self {
            candidate,
            weekly_downloads: 0,
            registry: None,
            health: RepoHealth::default(),
            graph,
        }
    }

    pub fn name(&self) -> &str {
        &self.candidate.name
    }

    pub fn repository_url(&self) -> Option<&str> {
        self.registry.as_ref()?.repository_url.as_deref()
    }
}
