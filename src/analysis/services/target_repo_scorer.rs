use super::ranking::{sort_and_rank, LogMinMax};
use crate::analysis::domain::{
    RepoHealth, ScoredTargetRepo, TargetRepo, TargetScoreBreakdown,
};
use crate::analysis::policies::MaintenanceSignals;

const WEIGHT_STARS: f64 = 0.6;
const WEIGHT_DOWNLOADS: f64 = 0.4;

/// TargetRepoScorer ranks consumer repositories by how much a bundled
/// replacement PR would be worth.
pub struct TargetRepoScorer;

impl TargetRepoScorer {
    /// Scores each repository together with its fetched health, then sorts
    /// and ranks the batch.
    pub fn score_all(repos: Vec<(TargetRepo, RepoHealth)>) -> Vec<ScoredTargetRepo> {
        let stars = LogMinMax::fit(repos.iter().map(|(r, _)| r.stars as f64));
        let downloads = LogMinMax::fit(repos.iter().map(|(r, _)| r.aggregate_downloads() as f64));
        let max_count = repos
            .iter()
            .map(|(r, _)| r.opportunity_count())
            .max()
            .unwrap_or(0);

        let mut scored: Vec<ScoredTargetRepo> = repos
            .into_iter()
            .map(|(repo, health)| {
                let scores = TargetScoreBreakdown {
                    reach: WEIGHT_STARS * stars.normalize(repo.stars as f64)
                        + WEIGHT_DOWNLOADS * downloads.normalize(repo.aggregate_downloads() as f64),
                    receptiveness: MaintenanceSignals::merge_probability(&health),
                    bundle_opportunity: Self::bundle_opportunity(
                        repo.opportunity_count(),
                        max_count,
                    ),
                    aggregate_effort: Self::aggregate_effort(&repo),
                };
                ScoredTargetRepo {
                    composite_score: scores.composite(),
                    rank: 0,
                    percentile: 0.0,
                    repo,
                    health,
                    scores,
                }
            })
            .collect();

        sort_and_rank(&mut scored);
        scored
    }

    /// `log2(count) / log2(max_count)`; a single opportunity is worth nothing
    pub fn bundle_opportunity(count: usize, max_count: usize) -> f64 {
        if count < 2 || max_count < 2 {
            return 0.0;
        }
        ((count as f64).log2() / (max_count as f64).log2()).min(1.0)
    }

    /// Download-weighted mean effort multiplier; plain mean when no
    /// opportunity reports downloads
    pub fn aggregate_effort(repo: &TargetRepo) -> f64 {
        if repo.opportunities.is_empty() {
            return 0.0;
        }
        let total_downloads = repo.aggregate_downloads();
        if total_downloads == 0 {
            let sum: f64 = repo.opportunities.iter().map(|o| o.effort_multiplier).sum();
            return sum / repo.opportunities.len() as f64;
        }
        let weighted: f64 = repo
            .opportunities
            .iter()
            .map(|o| o.effort_multiplier * o.weekly_downloads as f64)
            .sum();
        weighted / total_downloads as f64
    }
}
