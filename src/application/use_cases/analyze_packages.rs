use super::{EnrichPackagesUseCase, ExpandGraphUseCase, FindTargetReposUseCase, QueryDependentsUseCase};
use crate::analysis::domain::{Candidate, GraphData, PackageData, WarehouseSnapshot};
use crate::analysis::services::{CandidateAggregator, PackageScorer};
use crate::application::dto::{AnalysisRequest, AnalysisResponse};
use crate::application::read_models::SummaryStats;
use crate::ports::outbound::{
    CacheStore, CandidateCatalog, DependentsSource, DownloadCountSource, PopularPackageSource,
    ProgressReporter, RegistryMetadataSource, RepoHealthSource, Warehouse,
};
use crate::shared::Result;
use futures::future::join_all;
use std::collections::HashMap;

/// The stages of one analysis run, wired by the caller
pub struct AnalysisStages<D, GC, W, P, WC, DL, RM, RH, PR> {
    pub catalogs: Vec<Box<dyn CandidateCatalog>>,
    pub graph: ExpandGraphUseCase<D, GC, PR>,
    /// Absent when the warehouse stage is disabled
    pub dependents: Option<QueryDependentsUseCase<W, P, WC, PR>>,
    pub enrich: EnrichPackagesUseCase<DL, RM, RH, PR>,
    pub targets: FindTargetReposUseCase<RH, PR>,
}

/// AnalyzePackagesUseCase - the whole pipeline from catalogs to rankings
///
/// Catalogs are loaded concurrently and deduplicated, the dependency graph
/// is expanded and merged with warehouse dependents, packages are enriched
/// and scored, and consumer repositories are ranked last. Only the graph
/// cache is written here; the caller hands the response to a result sink.
///
/// # Type Parameters
/// * `D` - DependentsSource implementation
/// * `GC` - CacheStore for GraphData
/// * `W` - Warehouse implementation
/// * `P` - PopularPackageSource implementation
/// * `WC` - CacheStore for WarehouseSnapshot
/// * `DL` - DownloadCountSource implementation
/// * `RM` - RegistryMetadataSource implementation
/// * `RH` - RepoHealthSource implementation
/// * `PR` - ProgressReporter implementation
pub struct AnalyzePackagesUseCase<D, GC, W, P, WC, DL, RM, RH, PR> {
    stages: AnalysisStages<D, GC, W, P, WC, DL, RM, RH, PR>,
    progress_reporter: PR,
}

impl<D, GC, W, P, WC, DL, RM, RH, PR> AnalyzePackagesUseCase<D, GC, W, P, WC, DL, RM, RH, PR>
where
    D: DependentsSource,
    GC: CacheStore<GraphData>,
    W: Warehouse,
    P: PopularPackageSource,
    WC: CacheStore<WarehouseSnapshot>,
    DL: DownloadCountSource,
    RM: RegistryMetadataSource,
    RH: RepoHealthSource,
    PR: ProgressReporter,
{
    pub fn new(stages: AnalysisStages<D, GC, W, P, WC, DL, RM, RH, PR>, progress_reporter: PR) -> Self {
        Self {
            stages,
            progress_reporter,
        }
    }

    pub async fn execute(&self, request: AnalysisRequest) -> Result<AnalysisResponse> {
        // Step 1: Load and deduplicate candidates
        let candidates = self.load_candidates(&request).await;

        // Step 2: Reverse-dependency graph, merged with warehouse dependents
        let mut graph = self.stages.graph.execute(&candidates).await?;
        let snapshot = match &self.stages.dependents {
            Some(dependents) => dependents.execute(&candidates).await?,
            None => None,
        };
        if let Some(snapshot) = &snapshot {
            Self::merge_snapshot(&mut graph, snapshot);
        }

        // Step 3: Enrich
        let packages: Vec<PackageData> = candidates
            .into_iter()
            .map(|candidate| {
                let data = graph.remove(&candidate.name).unwrap_or_default();
                PackageData::new(candidate, data)
            })
            .collect();
        let enriched = self.stages.enrich.execute(packages).await?;

        // Step 4: Freshen and persist the graph cache
        self.refresh_graph_cache(&enriched);

        // Step 5: Score packages, then target repositories
        let scored = PackageScorer::score_all(enriched);
        let target_repos = self.stages.targets.execute(&scored).await?;

        let summary = SummaryStats::build(
            &scored,
            &target_repos,
            snapshot.map(|s| s.snapshot_date),
        );
        self.progress_reporter.report_completion(&format!(
            "🏁 Analysis complete: {} package(s), {} target repositories",
            scored.len(),
            target_repos.len()
        ));

        Ok(AnalysisResponse {
            packages: scored,
            target_repos,
            summary,
        })
    }

    async fn load_candidates(&self, request: &AnalysisRequest) -> Vec<Candidate> {
        self.progress_reporter.report(&format!(
            "📖 Loading {} candidate catalog(s)",
            self.stages.catalogs.len()
        ));

        let results = join_all(self.stages.catalogs.iter().map(|c| c.fetch_candidates())).await;
        let mut all = Vec::new();
        for (catalog, result) in self.stages.catalogs.iter().zip(results) {
            match result {
                Ok(candidates) => all.extend(candidates),
                Err(e) => self.progress_reporter.report_error(&format!(
                    "⚠️  Warning: Catalog '{}' unavailable: {:#}",
                    catalog.source(),
                    e
                )),
            }
        }

        let total = all.len();
        let mut candidates = CandidateAggregator::deduplicate(all);
        let breakdown = CandidateAggregator::count_by_source(&candidates)
            .into_iter()
            .map(|(source, count)| format!("{}: {}", source, count))
            .collect::<Vec<_>>()
            .join(", ");
        self.progress_reporter.report(&format!(
            "✅ {} unique candidate(s) from {} entries ({})",
            candidates.len(),
            total,
            breakdown
        ));

        if let Some(limit) = request.limit {
            candidates = CandidateAggregator::sample_across_sources(candidates, limit);
            self.progress_reporter
                .report(&format!("🎲 Sampled {} candidate(s) across sources", candidates.len()));
        }
        candidates
    }

    fn merge_snapshot(graph: &mut HashMap<String, GraphData>, snapshot: &WarehouseSnapshot) {
        for (name, data) in graph.iter_mut() {
            if let Some(dependents) = snapshot.dependents_of(name) {
                *data = data.with_dependent_packages(dependents.to_vec());
            }
        }
    }

    /// Fingerprints come from the registry; a changed publish time makes the
    /// cached graph stale for the next run
    fn refresh_graph_cache(&self, packages: &[PackageData]) {
        let fingerprints: HashMap<String, String> = packages
            .iter()
            .filter_map(|p| {
                let fingerprint = p.registry.as_ref()?.fingerprint()?;
                Some((p.name().to_string(), fingerprint))
            })
            .collect();

        let cache = self.stages.graph.cache();
        cache.update_freshness(&fingerprints);
        if let Err(e) = cache.save() {
            self.progress_reporter
                .report_error(&format!("⚠️  Warning: {:#}", e));
        }
    }
}
