//! Run-level summary for the stats output

use crate::analysis::domain::{ScoredPackage, ScoredTargetRepo};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Denormalized counts describing one run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub candidate_count: usize,
    pub by_source: BTreeMap<String, usize>,
    pub by_replacement_type: BTreeMap<String, usize>,
    pub by_tier: BTreeMap<u8, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub total_weekly_downloads: u64,
    pub target_repo_count: usize,
    /// Warehouse snapshot the dependent-package data came from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_snapshot: Option<String>,
}

impl SummaryStats {
    pub fn build(
        packages: &[ScoredPackage],
        target_repos: &[ScoredTargetRepo],
        warehouse_snapshot: Option<String>,
    ) -> Self {
        let mut by_source = BTreeMap::new();
        let mut by_replacement_type = BTreeMap::new();
        let mut by_tier = BTreeMap::new();
        let mut by_status = BTreeMap::new();

        for package in packages {
            let candidate = &package.data.candidate;
            *by_source.entry(candidate.source.to_string()).or_insert(0) += 1;
            *by_replacement_type
                .entry(candidate.replacement_type.to_string())
                .or_insert(0) += 1;
            *by_tier.entry(package.tier).or_insert(0) += 1;
            *by_status.entry(package.status.to_string()).or_insert(0) += 1;
        }

        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            candidate_count: packages.len(),
            by_source,
            by_replacement_type,
            by_tier,
            by_status,
            total_weekly_downloads: packages.iter().map(|p| p.data.weekly_downloads).sum(),
            target_repo_count: target_repos.len(),
            warehouse_snapshot,
        }
    }
}
