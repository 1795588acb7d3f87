use super::PackageData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maintenance status shown next to a package, derived from commit recency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    Active,
    Stale,
    Dormant,
    Archived,
    /// No repository data was available
    Unknown,
}

impl PackageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PackageStatus::Active => "active",
            PackageStatus::Stale => "stale",
            PackageStatus::Dormant => "dormant",
            PackageStatus::Archived => "archived",
            PackageStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four independent factors of a package's composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub impact: f64,
    pub effort_multiplier: f64,
    pub merge_probability: f64,
    pub liveness_penalty: f64,
}

impl ScoreBreakdown {
    /// Straight product: weakness on any single factor sinks the whole score
    pub fn composite(&self) -> f64 {
        self.impact * self.effort_multiplier * self.merge_probability * self.liveness_penalty
    }
}

/// A package with its scores, tier, status and position in the ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPackage {
    #[serde(flatten)]
    pub data: PackageData,
    pub scores: ScoreBreakdown,
    pub composite_score: f64,
    /// 1 (largest) to 4, from impact alone
    pub tier: u8,
    pub status: PackageStatus,
    /// 1-based; assigned after the full sort
    pub rank: usize,
    pub percentile: f64,
}

impl ScoredPackage {
    pub fn name(&self) -> &str {
        self.data.name()
    }
}
