use crate::analysis::domain::{ScoredPackage, ScoredTargetRepo};
use crate::application::read_models::SummaryStats;

/// AnalysisResponse - Everything one run produced
///
/// Packages and target repositories are already sorted by rank.
#[derive(Debug, Clone)]
pub struct AnalysisResponse {
    pub packages: Vec<ScoredPackage>,
    pub target_repos: Vec<ScoredTargetRepo>,
    pub summary: SummaryStats,
}
