use crate::analysis::domain::{Candidate, DependentRepo, GraphData};
use crate::ports::outbound::{CacheStore, DependentsSource, DependentsSummary, ProgressReporter};
use crate::shared::{parallel_map, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Top dependents per package; `None` marks a failed fetch
type TopRepos<'c> = HashMap<&'c str, Option<Vec<DependentRepo>>>;

/// Pool size and thresholds of the graph stage
#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    pub concurrency: usize,
    /// Minimum dependents before the top-dependents list is worth fetching
    pub dependents_threshold: u64,
    pub top_dependents: usize,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            concurrency: 2,
            dependents_threshold: 100,
            top_dependents: 30,
        }
    }
}

/// ExpandGraphUseCase - reverse-dependency facts per candidate
///
/// Cache hits are served from the graph cache; misses go to the
/// reverse-dependency API in two passes. The first fetches the cheap
/// dependent-count summary for every miss, the second fetches the top
/// dependent repositories only for candidates above the threshold.
///
/// # Type Parameters
/// * `D` - DependentsSource implementation (absent without an API key)
/// * `C` - CacheStore for GraphData
/// * `PR` - ProgressReporter implementation
pub struct ExpandGraphUseCase<D, C, PR> {
    dependents_source: Option<D>,
    cache: C,
    progress_reporter: PR,
    options: GraphOptions,
}

impl<D, C, PR> ExpandGraphUseCase<D, C, PR>
where
    D: DependentsSource,
    C: CacheStore<GraphData>,
    PR: ProgressReporter,
{
    pub fn new(
        dependents_source: Option<D>,
        cache: C,
        progress_reporter: PR,
        options: GraphOptions,
    ) -> Self {
        Self {
            dependents_source,
            cache,
            progress_reporter,
            options,
        }
    }

    /// The graph cache, for freshness updates and saving after enrichment
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns graph data for every candidate, keyed by package name
    pub async fn execute(&self, candidates: &[Candidate]) -> Result<HashMap<String, GraphData>> {
        let Some(source) = &self.dependents_source else {
            self.progress_reporter.report_error(
                "⚠️  Warning: LIBRARIES_IO_API_KEY is not set; dependent counts default to zero.",
            );
            return Ok(candidates
                .iter()
                .map(|c| (c.name.clone(), GraphData::empty()))
                .collect());
        };

        let mut graph = HashMap::with_capacity(candidates.len());
        let mut misses = Vec::new();
        for candidate in candidates {
            match self.cache.get(&candidate.name) {
                Some(data) => {
                    graph.insert(candidate.name.clone(), data);
                }
                None => misses.push(candidate),
            }
        }

        self.progress_reporter.report(&format!(
            "🕸️  Dependency graph: {} cached, {} to fetch",
            graph.len(),
            misses.len()
        ));

        let summaries = self.fetch_summaries(source, &misses).await?;

        let material: Vec<(&Candidate, DependentsSummary)> = misses
            .iter()
            .zip(&summaries)
            .filter_map(|(c, s)| s.map(|s| (*c, s)))
            .filter(|(_, s)| s.dependents_count >= self.options.dependents_threshold)
            .collect();
        let top_repos = self.fetch_top_repos(source, &material).await?;

        let mut fetched = 0;
        for (candidate, summary) in misses.iter().zip(summaries) {
            let Some(summary) = summary else {
                graph.insert(candidate.name.clone(), GraphData::empty());
                continue;
            };

            let repos = match top_repos.get(candidate.name.as_str()) {
                Some(Some(repos)) => repos.clone(),
                Some(None) => {
                    graph.insert(candidate.name.clone(), GraphData::empty());
                    continue;
                }
                None => Vec::new(),
            };

            let data = GraphData {
                dependents_count: summary.dependents_count,
                dependent_repos_count: summary.dependent_repos_count,
                top_dependent_repos: repos,
                top_dependent_packages: None,
            };
            self.cache.set(&candidate.name, data.clone(), None);
            graph.insert(candidate.name.clone(), data);
            fetched += 1;
        }

        self.progress_reporter.report_completion(&format!(
            "✅ Dependency graph ready ({} fetched, {} failed)",
            fetched,
            misses.len() - fetched
        ));

        Ok(graph)
    }

    async fn fetch_summaries(
        &self,
        source: &D,
        misses: &[&Candidate],
    ) -> Result<Vec<Option<DependentsSummary>>> {
        let done = AtomicUsize::new(0);
        let total = misses.len();

        parallel_map(misses, self.options.concurrency, |candidate| {
            let done = &done;
            async move {
                let summary = match source.fetch_summary(&candidate.name).await {
                    Ok(summary) => Some(summary),
                    Err(e) => {
                        self.progress_reporter.report_error(&format!(
                            "⚠️  Warning: Dependents of {} unavailable: {}",
                            candidate.name, e
                        ));
                        None
                    }
                };
                let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                self.progress_reporter
                    .report_progress(current, total, Some(&candidate.name));
                Ok::<_, anyhow::Error>(summary)
            }
        })
        .await
    }

    async fn fetch_top_repos<'c>(
        &self,
        source: &D,
        material: &[(&'c Candidate, DependentsSummary)],
    ) -> Result<TopRepos<'c>> {
        if material.is_empty() {
            return Ok(HashMap::new());
        }
        self.progress_reporter.report(&format!(
            "🔍 Fetching top dependents for {} package(s) with ≥{} dependents",
            material.len(),
            self.options.dependents_threshold
        ));

        let results = parallel_map(material, self.options.concurrency, |(candidate, _)| async move {
            let repos = match source
                .fetch_top_dependent_repos(&candidate.name, self.options.top_dependents)
                .await
            {
                Ok(repos) => Some(repos),
                Err(e) => {
                    self.progress_reporter.report_error(&format!(
                        "⚠️  Warning: Top dependents of {} unavailable: {}",
                        candidate.name, e
                    ));
                    None
                }
            };
            Ok::<_, anyhow::Error>(repos)
        })
        .await?;

        Ok(material
            .iter()
            .map(|(c, _)| c.name.as_str())
            .zip(results)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{candidate, MemoryCache, RecordingReporter};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockDependents {
        counts: HashMap<String, u64>,
        failing: Vec<String>,
        failing_top: Vec<String>,
        summary_calls: Mutex<Vec<String>>,
        top_calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DependentsSource for MockDependents {
        async fn fetch_summary(&self, name: &str) -> Result<DependentsSummary> {
            self.summary_calls.lock().unwrap().push(name.to_string());
            if self.failing.iter().any(|f| f == name) {
                anyhow::bail!("HTTP 500");
            }
            let count = self.counts.get(name).copied().unwrap_or(0);
            Ok(DependentsSummary {
                dependents_count: count,
                dependent_repos_count: count / 2,
            })
        }

        async fn fetch_top_dependent_repos(
            &self,
            name: &str,
            limit: usize,
        ) -> Result<Vec<DependentRepo>> {
            self.top_calls.lock().unwrap().push(name.to_string());
            if self.failing_top.iter().any(|f| f == name) {
                anyhow::bail!("HTTP 429");
            }
            Ok((0..limit.min(2))
                .map(|i| DependentRepo {
                    full_name: format!("{}-user/app{}", name, i),
                    stars: 10 * (i as u64 + 1),
                })
                .collect())
        }
    }

    fn source(counts: &[(&str, u64)]) -> MockDependents {
        MockDependents {
            counts: counts.iter().map(|(n, c)| (n.to_string(), *c)).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_without_source_everything_is_zero() {
        let reporter = RecordingReporter::default();
        let use_case = ExpandGraphUseCase::<MockDependents, _, _>::new(
            None,
            MemoryCache::<GraphData>::default(),
            reporter.clone(),
            GraphOptions::default(),
        );

        let graph = use_case.execute(&[candidate("pump")]).await.unwrap();
        assert_eq!(graph["pump"], GraphData::empty());
        assert!(use_case.cache().keys().is_empty());
        assert!(reporter.errors()[0].contains("LIBRARIES_IO_API_KEY"));
    }

    #[tokio::test]
    async fn test_cache_hits_skip_the_api() {
        let cached = GraphData {
            dependents_count: 5,
            ..GraphData::empty()
        };
        let use_case = ExpandGraphUseCase::new(
            Some(source(&[("moment", 10)])),
            MemoryCache::with(vec![("pump", cached.clone())]),
            RecordingReporter::default(),
            GraphOptions::default(),
        );

        let graph = use_case
            .execute(&[candidate("pump"), candidate("moment")])
            .await
            .unwrap();

        assert_eq!(graph["pump"], cached);
        assert_eq!(graph["moment"].dependents_count, 10);
        let calls = use_case.dependents_source.as_ref().unwrap().summary_calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["moment"]);
        assert_eq!(use_case.cache().keys(), vec!["moment", "pump"]);
    }

    #[tokio::test]
    async fn test_top_dependents_only_above_threshold() {
        let use_case = ExpandGraphUseCase::new(
            Some(source(&[("big", 100), ("small", 99)])),
            MemoryCache::default(),
            RecordingReporter::default(),
            GraphOptions {
                top_dependents: 5,
                ..GraphOptions::default()
            },
        );

        let graph = use_case
            .execute(&[candidate("big"), candidate("small")])
            .await
            .unwrap();

        let source = use_case.dependents_source.as_ref().unwrap();
        assert_eq!(source.top_calls.lock().unwrap().clone(), vec!["big"]);
        assert_eq!(graph["big"].top_dependent_repos.len(), 2);
        assert_eq!(graph["big"].dependent_repos_count, 50);
        assert!(graph["small"].top_dependent_repos.is_empty());
        assert_eq!(graph["small"].dependents_count, 99);
    }

    #[tokio::test]
    async fn test_failures_yield_zero_data_and_are_not_cached() {
        let mut mock = source(&[("ok", 3), ("hot", 500)]);
        mock.failing = vec!["broken".to_string()];
        mock.failing_top = vec!["hot".to_string()];
        let reporter = RecordingReporter::default();
        let use_case = ExpandGraphUseCase::new(
            Some(mock),
            MemoryCache::default(),
            reporter.clone(),
            GraphOptions::default(),
        );

        let graph = use_case
            .execute(&[candidate("ok"), candidate("broken"), candidate("hot")])
            .await
            .unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph["broken"], GraphData::empty());
        assert_eq!(graph["hot"], GraphData::empty());
        assert_eq!(graph["ok"].dependents_count, 3);
        assert_eq!(use_case.cache().keys(), vec!["ok"]);
        assert_eq!(reporter.errors().len(), 2);
    }
}
