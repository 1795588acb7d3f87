use crate::analysis::domain::{is_scoped_name, PackageData, RegistryMetadata, RepoHealth};
use crate::ports::outbound::{
    DownloadCountSource, ProgressReporter, RegistryMetadataSource, RepoHealthSource,
    MAX_BULK_DOWNLOAD_NAMES,
};
use crate::shared::{parallel_map, Result};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Pool sizes of the enrichment stage
#[derive(Debug, Clone, Copy)]
pub struct EnrichOptions {
    pub downloads_concurrency: usize,
    pub registry_concurrency: usize,
    pub health_concurrency: usize,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            downloads_concurrency: 4,
            registry_concurrency: 8,
            health_concurrency: 4,
        }
    }
}

/// Splits names into download-count requests: unscoped names share bulk
/// chunks, scoped names go one per request.
pub fn download_chunks(names: &[String]) -> Vec<Vec<String>> {
    let (scoped, unscoped): (Vec<&String>, Vec<&String>) =
        names.iter().partition(|n| is_scoped_name(n));

    unscoped
        .chunks(MAX_BULK_DOWNLOAD_NAMES)
        .map(|chunk| chunk.iter().map(|n| n.to_string()).collect())
        .chain(scoped.into_iter().map(|n| vec![n.clone()]))
        .collect()
}

/// EnrichPackagesUseCase - attaches downloads, registry metadata and
/// repository health to every package
///
/// Every sub-signal degrades independently: a failed lookup leaves its
/// default (0 downloads, no metadata, empty health) and the run continues.
///
/// # Type Parameters
/// * `DL` - DownloadCountSource implementation
/// * `RM` - RegistryMetadataSource implementation
/// * `RH` - RepoHealthSource implementation
/// * `PR` - ProgressReporter implementation
pub struct EnrichPackagesUseCase<DL, RM, RH, PR> {
    download_source: DL,
    registry_source: RM,
    health_source: RH,
    progress_reporter: PR,
    options: EnrichOptions,
}

impl<DL, RM, RH, PR> EnrichPackagesUseCase<DL, RM, RH, PR>
where
    DL: DownloadCountSource,
    RM: RegistryMetadataSource,
    RH: RepoHealthSource,
    PR: ProgressReporter,
{
    pub fn new(
        download_source: DL,
        registry_source: RM,
        health_source: RH,
        progress_reporter: PR,
        options: EnrichOptions,
    ) -> Self {
        Self {
            download_source,
            registry_source,
            health_source,
            progress_reporter,
            options,
        }
    }

    pub async fn execute(&self, packages: Vec<PackageData>) -> Result<Vec<PackageData>> {
        let names: Vec<String> = packages.iter().map(|p| p.name().to_string()).collect();

        let downloads = self.fetch_downloads(&names).await?;
        let metadata = self.fetch_metadata(&names).await?;

        let urls: Vec<String> = metadata
            .iter()
            .flatten()
            .filter_map(|m| m.repository_url.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let health = self.fetch_health(&urls).await?;

        let enriched: Vec<PackageData> = packages
            .into_iter()
            .zip(metadata)
            .map(|(mut package, registry)| {
                package.weekly_downloads = downloads.get(package.name()).copied().unwrap_or(0);
                package.registry = registry;
                package.health = package
                    .repository_url()
                    .and_then(|url| health.get(url).cloned())
                    .unwrap_or_default();
                package
            })
            .collect();

        self.progress_reporter.report_completion(&format!(
            "✅ Enriched {} package(s) ({} repositories probed)",
            enriched.len(),
            urls.len()
        ));
        Ok(enriched)
    }

    async fn fetch_downloads(&self, names: &[String]) -> Result<HashMap<String, u64>> {
        let chunks = download_chunks(names);
        self.progress_reporter.report(&format!(
            "📈 Fetching weekly downloads ({} request(s))",
            chunks.len()
        ));

        let results = parallel_map(&chunks, self.options.downloads_concurrency, |chunk| async move {
            match self.download_source.fetch_weekly_downloads(chunk).await {
                Ok(counts) => Ok::<_, anyhow::Error>(counts),
                Err(e) => {
                    self.progress_reporter.report_error(&format!(
                        "⚠️  Warning: Downloads for {} package(s) unavailable: {}",
                        chunk.len(),
                        e
                    ));
                    Ok(HashMap::new())
                }
            }
        })
        .await?;

        Ok(results.into_iter().flatten().collect())
    }

    async fn fetch_metadata(&self, names: &[String]) -> Result<Vec<Option<RegistryMetadata>>> {
        self.progress_reporter
            .report(&format!("📦 Fetching registry metadata for {} package(s)", names.len()));
        let done = AtomicUsize::new(0);

        parallel_map(names, self.options.registry_concurrency, |name| {
            let done = &done;
            async move {
                let metadata = match self.registry_source.fetch_metadata(name).await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        self.progress_reporter.report_error(&format!(
                            "⚠️  Warning: Registry metadata for {} unavailable: {}",
                            name, e
                        ));
                        None
                    }
                };
                let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                self.progress_reporter
                    .report_progress(current, names.len(), Some(name));
                Ok::<_, anyhow::Error>(metadata)
            }
        })
        .await
    }

    async fn fetch_health(&self, urls: &[String]) -> Result<HashMap<String, RepoHealth>> {
        self.progress_reporter
            .report(&format!("🩺 Fetching health for {} repositories", urls.len()));

        let results = parallel_map(urls, self.options.health_concurrency, |url| async move {
            let health = match self.health_source.fetch_health(url).await {
                Ok(health) => health,
                Err(e) => {
                    self.progress_reporter.report_error(&format!(
                        "⚠️  Warning: Health of {} unavailable: {}",
                        url, e
                    ));
                    RepoHealth::default()
                }
            };
            Ok::<_, anyhow::Error>(health)
        })
        .await?;

        Ok(urls.iter().cloned().zip(results).collect())
    }
}
