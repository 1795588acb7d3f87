use crate::analysis::domain::{RepoHealth, ScoredPackage, ScoredTargetRepo};
use crate::analysis::services::{TargetRepoInverter, TargetRepoScorer};
use crate::ports::outbound::{ProgressReporter, RepoHealthSource};
use crate::shared::{parallel_map, Result};

/// FindTargetReposUseCase - ranks consumer repositories for bundled PRs
///
/// Inverts the scored packages into repositories, keeps those with several
/// opportunities, probes their health through the same source the enricher
/// used (so repositories seen there are not fetched twice) and scores them.
pub struct FindTargetReposUseCase<RH, PR> {
    health_source: RH,
    progress_reporter: PR,
    denylist: Vec<String>,
    concurrency: usize,
}

impl<RH, PR> FindTargetReposUseCase<RH, PR>
where
    RH: RepoHealthSource,
    PR: ProgressReporter,
{
    pub fn new(
        health_source: RH,
        progress_reporter: PR,
        denylist: Vec<String>,
        concurrency: usize,
    ) -> Self {
        Self {
            health_source,
            progress_reporter,
            denylist,
            concurrency,
        }
    }

    pub async fn execute(&self, packages: &[ScoredPackage]) -> Result<Vec<ScoredTargetRepo>> {
        let inverted = TargetRepoInverter::invert(packages);
        let inverted_count = inverted.len();
        let repos = TargetRepoInverter::filter(inverted, &self.denylist);

        self.progress_reporter.report(&format!(
            "🎯 {} dependent repositories, {} with bundle opportunities",
            inverted_count,
            repos.len()
        ));

        let health = parallel_map(&repos, self.concurrency, |repo| async move {
            let url = format!("https://github.com/{}", repo.full_name);
            let health = match self.health_source.fetch_health(&url).await {
                Ok(health) => health,
                Err(e) => {
                    self.progress_reporter.report_error(&format!(
                        "⚠️  Warning: Health of {} unavailable: {}",
                        repo.full_name, e
                    ));
                    RepoHealth::default()
                }
            };
            Ok::<_, anyhow::Error>(health)
        })
        .await?;

        let scored = TargetRepoScorer::score_all(repos.into_iter().zip(health).collect());

        self.progress_reporter
            .report_completion(&format!("✅ Ranked {} target repositories", scored.len()));
        Ok(scored)
    }
}
