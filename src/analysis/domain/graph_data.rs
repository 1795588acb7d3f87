use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A repository depending on a candidate, as reported by the reverse-dependency API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentRepo {
    /// `owner/repo`
    pub full_name: String,
    pub stars: u64,
}

/// A package depending on a candidate, as reported by the warehouse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentPackage {
    pub name: String,
    /// `owner/repo` of the dependent's source repository, when known
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub stars: u64,
}

/// Reverse-dependency facts for one candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphData {
    pub dependents_count: u64,
    pub dependent_repos_count: u64,
    /// Repository-level top dependents (reverse-dependency API)
    #[serde(default)]
    pub top_dependent_repos: Vec<DependentRepo>,
    /// Package-level dependents (warehouse); absent in caches written before
    /// the warehouse stage existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_dependent_packages: Option<Vec<DependentPackage>>,
}

impl GraphData {
    /// Graph data with every signal at zero
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a copy carrying the warehouse dependents.
    ///
    /// The dependents count is raised to at least the number of packages the
    /// warehouse saw, so a run without the reverse-dependency API still
    /// reflects what the warehouse knows.
    pub fn with_dependent_packages(&self, packages: Vec<DependentPackage>) -> Self {
        Self {
            dependents_count: self.dependents_count.max(packages.len() as u64),
            dependent_repos_count: self.dependent_repos_count,
            top_dependent_repos: self.top_dependent_repos.clone(),
            top_dependent_packages: Some(packages),
        }
    }

    /// Summed stars of the top dependents.
    ///
    /// Stars stand in for the downloads of dependent packages, which no
    /// source gives us; repository-level data is used when present.
    pub fn cascade_stars(&self) -> u64 {
        if !self.top_dependent_repos.is_empty() {
            return self.top_dependent_repos.iter().map(|r| r.stars).sum();
        }
        self.top_dependent_packages
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|p| p.stars)
            .sum()
    }

    /// `(owner/repo, stars)` pairs used to build the repository-centric view.
    ///
    /// Warehouse package-level data wins; the repository-level list is the
    /// fallback for runs that predate it.
    pub fn dependent_repositories(&self) -> Vec<(String, u64)> {
        match self.top_dependent_packages.as_deref() {
            Some(packages) if !packages.is_empty() => packages
                .iter()
                .filter_map(|p| p.repository.clone().map(|repo| (repo, p.stars)))
                .collect(),
            _ => self
                .top_dependent_repos
                .iter()
                .map(|r| (r.full_name.clone(), r.stars))
                .collect(),
        }
    }
}

/// Per-candidate dependent packages from one warehouse snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseSnapshot {
    /// `YYYY-MM-DD` of the upstream snapshot the rows were read from
    pub snapshot_date: String,
    pub dependents: BTreeMap<String, Vec<DependentPackage>>,
    /// Every candidate the batches were queried for, with or without rows
    #[serde(default)]
    pub queried: BTreeSet<String>,
}

impl WarehouseSnapshot {
    pub fn dependents_of(&self, candidate: &str) -> Option<&[DependentPackage]> {
        self.dependents.get(candidate).map(Vec::as_slice)
    }

    /// True when every name was part of the query that produced this snapshot
    pub fn covers<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> bool {
        names.into_iter().all(|name| self.queried.contains(name))
    }

    /// Number of candidates with at least one dependent
    pub fn candidate_count(&self) -> usize {
        self.dependents.values().filter(|d| !d.is_empty()).count()
    }
}
