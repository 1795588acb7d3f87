use crate::analysis::domain::{RepoSlug, ReplacementOpportunity, ScoredPackage, TargetRepo};
use std::collections::BTreeMap;

/// A repository needs at least this many opportunities to be worth a bundled PR
pub const MIN_OPPORTUNITIES: usize = 2;

/// TargetRepoInverter flips the package -> dependents view into
/// repository -> replaceable packages.
pub struct TargetRepoInverter;

impl TargetRepoInverter {
    /// Groups every dependent repository of every scored package.
    ///
    /// Repository names are case-normalized, so `Foo/Bar` and `foo/bar`
    /// end up in one entry. Output is ordered by repository name.
    pub fn invert(packages: &[ScoredPackage]) -> Vec<TargetRepo> {
        let mut repos: BTreeMap<String, TargetRepo> = BTreeMap::new();

        for package in packages {
            for (full_name, stars) in package.data.graph.dependent_repositories() {
                let Some(slug) = RepoSlug::parse(&full_name) else {
                    continue;
                };
                let key = slug.key();
                let opportunity = ReplacementOpportunity {
                    package: package.name().to_string(),
                    replacement_type: package.data.candidate.replacement_type,
                    replacement: package.data.candidate.replacement.clone(),
                    effort_multiplier: package.scores.effort_multiplier,
                    weekly_downloads: package.data.weekly_downloads,
                    package_score: package.composite_score,
                };
                repos
                    .entry(key.clone())
                    .or_insert_with(|| TargetRepo::new(key))
                    .fold(opportunity, stars);
            }
        }

        repos.into_values().collect()
    }

    /// Drops repositories with fewer than [`MIN_OPPORTUNITIES`] and any
    /// repository on the denylist (compared case-insensitively).
    pub fn filter(repos: Vec<TargetRepo>, denylist: &[String]) -> Vec<TargetRepo> {
        let denied: Vec<String> = denylist
            .iter()
            .filter_map(|entry| RepoSlug::parse(entry).map(|slug| slug.key()))
            .collect();

        repos
            .into_iter()
            .filter(|repo| repo.opportunity_count() >= MIN_OPPORTUNITIES)
            .filter(|repo| !denied.contains(&repo.full_name))
            .collect()
    }
}
