use crate::analysis::domain::{
    validate_package_name, Candidate, DependentPackage, RepoSlug, WarehouseSnapshot,
};
use crate::ports::outbound::{
    CacheStore, CostApprover, CostEstimate, PopularPackageSource, ProgressReporter, Warehouse,
};
use crate::shared::error::AnalyzerError;
use crate::shared::Result;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

const DATASET: &str = "bigquery-public-data.deps_dev_v1";

/// Batch size and billing cap of the warehouse stage
#[derive(Debug, Clone, Copy)]
pub struct WarehouseOptions {
    pub batch_size: usize,
    pub maximum_bytes_billed: u64,
}

impl Default for WarehouseOptions {
    fn default() -> Self {
        Self {
            batch_size: 100,
            maximum_bytes_billed: 50_000_000_000,
        }
    }
}

/// Which snapshot a batch query reads
#[derive(Debug, Clone, PartialEq)]
enum SnapshotRef {
    /// Sub-select of the newest snapshot; used for estimates only
    Latest,
    At(String),
}

impl SnapshotRef {
    fn sql(&self) -> String {
        match self {
            SnapshotRef::Latest => format!("(SELECT MAX(Time) FROM `{}.Snapshots`)", DATASET),
            SnapshotRef::At(time) => format!("TIMESTAMP('{}')", time),
        }
    }
}

fn snapshot_sql() -> String {
    format!("SELECT MAX(Time) AS snapshot FROM `{}.Snapshots`", DATASET)
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Direct npm dependents among `dependents` of any package in `candidates`.
///
/// Names must have passed `validate_package_name`, which rejects quotes.
fn batch_sql(candidates: &[String], dependents: &[String], snapshot: &SnapshotRef) -> String {
    format!(
        "SELECT d.Dependency.Name AS candidate, d.Name AS dependent, \
         ANY_VALUE(p.ProjectName) AS repository, MAX(pr.StarsCount) AS stars \
         FROM `{ds}.Dependencies` AS d \
         LEFT JOIN `{ds}.PackageVersionToProject` AS p \
         ON p.SnapshotAt = d.SnapshotAt AND p.System = d.System AND p.Name = d.Name \
         AND p.Version = d.Version AND p.ProjectType = 'GITHUB' \
         LEFT JOIN `{ds}.Projects` AS pr \
         ON pr.SnapshotAt = d.SnapshotAt AND pr.Type = p.ProjectType AND pr.Name = p.ProjectName \
         WHERE d.SnapshotAt = {snapshot} AND d.System = 'NPM' AND d.MinimumDepth = 1 \
         AND d.Dependency.Name IN ({candidates}) AND d.Name IN ({dependents}) \
         GROUP BY candidate, dependent",
        ds = DATASET,
        snapshot = snapshot.sql(),
        candidates = quoted_list(candidates),
        dependents = quoted_list(dependents),
    )
}

/// Snapshot timestamps are interpolated into SQL
fn is_safe_timestamp(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 40
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | ':' | ' ' | '.' | 'T' | 'Z' | '+'))
}

/// bq renders every value as a string
fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s
            .parse::<u64>()
            .or_else(|_| s.parse::<f64>().map(|f| f.max(0.0) as u64))
            .unwrap_or(0),
        _ => 0,
    })
}

#[derive(Debug, Deserialize)]
struct DependentRow {
    candidate: String,
    dependent: String,
    #[serde(default)]
    repository: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    stars: u64,
}

#[derive(Debug, Deserialize)]
struct SnapshotRow {
    snapshot: Option<String>,
}

/// QueryDependentsUseCase - cost-gated dependent-package lookup
///
/// Every query is dry-run first; nothing is billed until the projected
/// total has been shown and approved. The snapshot is then pinned and the
/// batches run one at a time under a billing cap. Declined approval, a
/// missing CLI, or an unparseable estimate all yield `None`.
///
/// Only complete runs are cached, and a cached snapshot is reused only when
/// it was queried for every requested candidate.
///
/// # Type Parameters
/// * `W` - Warehouse implementation
/// * `P` - PopularPackageSource implementation (the dependents universe)
/// * `C` - CacheStore for WarehouseSnapshot, keyed by snapshot date
/// * `PR` - ProgressReporter implementation
pub struct QueryDependentsUseCase<W, P, C, PR> {
    warehouse: W,
    popular_source: P,
    cache: C,
    approver: Box<dyn CostApprover>,
    progress_reporter: PR,
    options: WarehouseOptions,
}

impl<W, P, C, PR> QueryDependentsUseCase<W, P, C, PR>
where
    W: Warehouse,
    P: PopularPackageSource,
    C: CacheStore<WarehouseSnapshot>,
    PR: ProgressReporter,
{
    pub fn new(
        warehouse: W,
        popular_source: P,
        cache: C,
        approver: Box<dyn CostApprover>,
        progress_reporter: PR,
        options: WarehouseOptions,
    ) -> Self {
        Self {
            warehouse,
            popular_source,
            cache,
            approver,
            progress_reporter,
            options,
        }
    }

    pub async fn execute(&self, candidates: &[Candidate]) -> Result<Option<WarehouseSnapshot>> {
        if let Some((date, snapshot)) = self.cache.freshest() {
            if snapshot.covers(candidates.iter().map(|c| c.name.as_str())) {
                self.progress_reporter
                    .report(&format!("📦 Using cached warehouse snapshot from {}", date));
                return Ok(Some(snapshot));
            }
            self.progress_reporter.report(&format!(
                "📦 Cached warehouse snapshot from {} misses some candidates; re-querying",
                date
            ));
        }
        if candidates.is_empty() {
            return Ok(None);
        }

        match self.run_workflow(candidates).await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                self.progress_reporter.report_error(&format!(
                    "⚠️  Warning: Warehouse stage skipped: {:#}",
                    e
                ));
                Ok(None)
            }
        }
    }

    async fn run_workflow(&self, candidates: &[Candidate]) -> Result<Option<WarehouseSnapshot>> {
        let version = self.warehouse.version().await?;
        self.progress_reporter
            .report(&format!("🏭 Warehouse client: {}", version.trim()));

        let snapshot_bytes = self.warehouse.dry_run(&snapshot_sql()).await?;

        let popular: Vec<String> = self
            .popular_source
            .fetch_popular_packages()
            .await?
            .into_iter()
            .filter(|name| validate_package_name(name).is_ok())
            .collect();
        if popular.is_empty() {
            self.progress_reporter
                .report_error("⚠️  Warning: No popular packages found; skipping warehouse stage.");
            return Ok(None);
        }

        let candidate_names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
        let batches: Vec<&[String]> = popular.chunks(self.options.batch_size.max(1)).collect();
        let representative = batch_sql(&candidate_names, batches[0], &SnapshotRef::Latest);
        let bytes_per_batch = self.warehouse.dry_run(&representative).await?;

        let estimate = CostEstimate {
            snapshot_bytes,
            bytes_per_batch,
            batch_count: batches.len(),
        };
        if !self.approver.approve(&estimate).await {
            let declined = AnalyzerError::CostDeclined {
                reason: format!("estimated {:.2} USD was not approved", estimate.estimated_usd()),
            };
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: {}\nContinuing without dependent packages.",
                declined
            ));
            return Ok(None);
        }

        let pinned = self.pin_snapshot().await?;
        let snapshot_date: String = pinned.chars().take(10).collect();

        let mut dependents: BTreeMap<String, BTreeMap<String, DependentPackage>> = BTreeMap::new();
        let mut failed = 0;
        for (index, batch) in batches.iter().enumerate() {
            self.progress_reporter
                .report_progress(index + 1, batches.len(), Some("warehouse batches"));
            let sql = batch_sql(&candidate_names, batch, &SnapshotRef::At(pinned.clone()));
            match self
                .warehouse
                .query(&sql, self.options.maximum_bytes_billed)
                .await
            {
                Ok(rows) => Self::accumulate(&mut dependents, rows),
                Err(e) => {
                    failed += 1;
                    self.progress_reporter.report_error(&format!(
                        "⚠️  Warning: Warehouse batch {} of {} failed: {:#}",
                        index + 1,
                        batches.len(),
                        e
                    ));
                }
            }
        }

        if failed == batches.len() {
            self.progress_reporter.report_error(
                "⚠️  Warning: Every warehouse batch failed; continuing without dependent packages.",
            );
            return Ok(None);
        }

        let snapshot = WarehouseSnapshot {
            snapshot_date: snapshot_date.clone(),
            dependents: dependents
                .into_iter()
                .map(|(candidate, by_name)| (candidate, by_name.into_values().collect()))
                .collect(),
            queried: candidate_names.iter().cloned().collect::<BTreeSet<_>>(),
        };

        // a partial snapshot is used for this run but retried next time
        if failed == 0 {
            self.cache.set(&snapshot_date, snapshot.clone(), None);
            if let Err(e) = self.cache.save() {
                self.progress_reporter
                    .report_error(&format!("⚠️  Warning: {:#}", e));
            }
        }

        self.progress_reporter.report_completion(&format!(
            "✅ Warehouse snapshot {}: dependents for {} candidate(s) ({} batch(es) failed)",
            snapshot_date,
            snapshot.candidate_count(),
            failed
        ));
        Ok(Some(snapshot))
    }

    async fn pin_snapshot(&self) -> Result<String> {
        let rows = self
            .warehouse
            .query(&snapshot_sql(), self.options.maximum_bytes_billed)
            .await?;
        let snapshot = rows
            .into_iter()
            .next()
            .and_then(|row| serde_json::from_value::<SnapshotRow>(row).ok())
            .and_then(|row| row.snapshot)
            .ok_or_else(|| anyhow::anyhow!("snapshot query returned no rows"))?;
        if !is_safe_timestamp(&snapshot) {
            anyhow::bail!("unexpected snapshot timestamp '{}'", snapshot);
        }
        Ok(snapshot)
    }

    fn accumulate(
        dependents: &mut BTreeMap<String, BTreeMap<String, DependentPackage>>,
        rows: Vec<Value>,
    ) {
        for row in rows {
            let Ok(row) = serde_json::from_value::<DependentRow>(row) else {
                continue;
            };
            let repository = row
                .repository
                .as_deref()
                .and_then(RepoSlug::parse)
                .map(|slug| slug.to_string());
            let entry = dependents
                .entry(row.candidate)
                .or_default()
                .entry(row.dependent.clone())
                .or_insert(DependentPackage {
                    name: row.dependent,
                    repository: None,
                    stars: 0,
                });
            entry.stars = entry.stars.max(row.stars);
            if entry.repository.is_none() {
                entry.repository = repository;
            }
        }
    }
}
