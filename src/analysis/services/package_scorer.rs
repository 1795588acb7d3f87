use super::ranking::{sort_and_rank, LogMinMax};
use crate::analysis::domain::{PackageData, ScoreBreakdown, ScoredPackage};
use crate::analysis::policies::{EffortPolicy, MaintenanceSignals};

const WEIGHT_DOWNLOADS: f64 = 0.35;
const WEIGHT_DEPENDENTS: f64 = 0.45;
const WEIGHT_CASCADE: f64 = 0.20;

/// PackageScorer turns enriched package data into a ranked leaderboard.
///
/// Impact is normalized against the batch being scored, so scores are only
/// comparable within one run.
pub struct PackageScorer;

impl PackageScorer {
    /// Scores every package, sorts descending by composite score, and assigns
    /// rank and percentile.
    pub fn score_all(packages: Vec<PackageData>) -> Vec<ScoredPackage> {
        let downloads = LogMinMax::fit(packages.iter().map(|p| p.weekly_downloads as f64));
        let dependents = LogMinMax::fit(packages.iter().map(|p| p.graph.dependents_count as f64));
        let cascade = LogMinMax::fit(packages.iter().map(|p| p.graph.cascade_stars() as f64));

        let mut scored: Vec<ScoredPackage> = packages
            .into_iter()
            .map(|data| {
                let impact = WEIGHT_DOWNLOADS * downloads.normalize(data.weekly_downloads as f64)
                    + WEIGHT_DEPENDENTS * dependents.normalize(data.graph.dependents_count as f64)
                    + WEIGHT_CASCADE * cascade.normalize(data.graph.cascade_stars() as f64);

                let scores = ScoreBreakdown {
                    impact,
                    effort_multiplier: EffortPolicy::multiplier(&data.candidate),
                    merge_probability: MaintenanceSignals::merge_probability(&data.health),
                    liveness_penalty: MaintenanceSignals::liveness_penalty(&data.health),
                };

                ScoredPackage {
                    composite_score: scores.composite(),
                    tier: Self::tier(impact),
                    status: MaintenanceSignals::status(&data.health),
                    rank: 0,
                    percentile: 0.0,
                    scores,
                    data,
                }
            })
            .collect();

        sort_and_rank(&mut scored);
        scored
    }

    /// Coarse size bucket from impact alone: 1 is the largest
    pub fn tier(impact: f64) -> u8 {
        if impact >= 0.75 {
            1
        } else if impact >= 0.5 {
            2
        } else if impact >= 0.25 {
            3
        } else {
            4
        }
    }
}
