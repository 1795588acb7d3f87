use super::{RepoHealth, ReplacementType};
use serde::{Deserialize, Serialize};

/// One replaceable dependency that justifies targeting a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementOpportunity {
    pub package: String,
    pub replacement_type: ReplacementType,
    pub replacement: String,
    pub effort_multiplier: f64,
    pub weekly_downloads: u64,
    /// Composite score of the package in the package ranking
    pub package_score: f64,
}

/// A consumer repository and the replaceable packages it depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRepo {
    /// `owner/repo`, lowercased
    pub full_name: String,
    /// Highest star count reported by any contributing package
    pub stars: u64,
    pub opportunities: Vec<ReplacementOpportunity>,
}

impl TargetRepo {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            stars: 0,
            opportunities: Vec::new(),
        }
    }

    /// Records one more opportunity; star counts only ever move up
    pub fn fold(&mut self, opportunity: ReplacementOpportunity, stars: u64) {
        self.stars = self.stars.max(stars);
        if !self
            .opportunities
            .iter()
            .any(|o| o.package == opportunity.package)
        {
            self.opportunities.push(opportunity);
        }
    }

    pub fn opportunity_count(&self) -> usize {
        self.opportunities.len()
    }

    /// Sum of weekly downloads across the repository's opportunities
    pub fn aggregate_downloads(&self) -> u64 {
        self.opportunities.iter().map(|o| o.weekly_downloads).sum()
    }
}

/// The four factors of a target repository's composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetScoreBreakdown {
    pub reach: f64,
    pub receptiveness: f64,
    pub bundle_opportunity: f64,
    pub aggregate_effort: f64,
}

impl TargetScoreBreakdown {
    pub fn composite(&self) -> f64 {
        self.reach * self.receptiveness * self.bundle_opportunity * self.aggregate_effort
    }
}

/// A target repository with health, scores, and ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredTargetRepo {
    #[serde(flatten)]
    pub repo: TargetRepo,
    pub health: RepoHealth,
    pub scores: TargetScoreBreakdown,
    pub composite_score: f64,
    pub rank: usize,
    pub percentile: f64,
}
