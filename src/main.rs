mod cli;

use anyhow::Context;
use cli::Args;
use e18e_analyzer::adapters::outbound::catalog::StaticCatalog;
use e18e_analyzer::adapters::outbound::console::{
    AutoApprover, InteractiveCostApprover, StderrProgressReporter,
};
use e18e_analyzer::adapters::outbound::filesystem::{
    DiskCache, JsonResultWriter, GRAPH_CACHE_FILE, WAREHOUSE_CACHE_FILE,
};
use e18e_analyzer::adapters::outbound::network::{
    CachingRepoHealthSource, GitHubClient, LibrariesIoClient, NpmDownloadsClient,
    NpmRegistryClient,
};
use e18e_analyzer::adapters::outbound::warehouse::BigQueryCli;
use e18e_analyzer::analysis::domain::{GraphData, WarehouseSnapshot};
use e18e_analyzer::application::dto::AnalysisRequest;
use e18e_analyzer::application::use_cases::{
    AnalysisStages, AnalyzePackagesUseCase, EnrichOptions, EnrichPackagesUseCase,
    ExpandGraphUseCase, FindTargetReposUseCase, GraphOptions, QueryDependentsUseCase,
    WarehouseOptions,
};
use e18e_analyzer::config::{self, AnalyzerConfig};
use e18e_analyzer::ports::outbound::{
    CandidateCatalog, CostApprover, ProgressReporter, ResultSink,
};
use e18e_analyzer::shared::error::ExitCode;
use e18e_analyzer::shared::{RateLimiter, Result};
use std::process;
use std::sync::Arc;

type Analyzer = AnalyzePackagesUseCase<
    LibrariesIoClient,
    DiskCache<GraphData>,
    BigQueryCli,
    NpmRegistryClient,
    DiskCache<WarehouseSnapshot>,
    NpmDownloadsClient,
    NpmRegistryClient,
    Arc<CachingRepoHealthSource<GitHubClient>>,
    Arc<StderrProgressReporter>,
>;

#[tokio::main]
async fn main() {
    // clap exits with status 2 on invalid arguments
    let args = Args::parse_args();

    let exit_code = match run(args).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            ExitCode::ApplicationError
        }
    };

    process::exit(exit_code.as_i32());
}

async fn run(args: Args) -> Result<()> {
    let working_dir = std::env::current_dir().context("Failed to resolve the working directory")?;
    let mut config = config::resolve(args.config.as_deref(), &working_dir)?;
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }

    let progress_reporter = Arc::new(StderrProgressReporter::new());
    let approver: Box<dyn CostApprover> = if args.yes {
        Box::new(AutoApprover)
    } else {
        Box::new(InteractiveCostApprover::new())
    };

    // Create adapters (Dependency Injection)
    let use_case = build_use_case(&config, approver, progress_reporter.clone())?;

    let request = AnalysisRequest::new(args.limit.map(|n| n as usize));
    let response = use_case.execute(request).await?;

    let writer = JsonResultWriter::new(config.output_dir.clone(), config.leaderboard_size);
    for path in writer.write(&response)? {
        progress_reporter.report(&format!("📝 Wrote {}", path.display()));
    }

    Ok(())
}

fn build_use_case(
    config: &AnalyzerConfig,
    approver: Box<dyn CostApprover>,
    progress_reporter: Arc<StderrProgressReporter>,
) -> Result<Analyzer> {
    let catalogs: Vec<Box<dyn CandidateCatalog>> = StaticCatalog::all(config.catalog_dir.as_deref())
        .into_iter()
        .map(|catalog| Box::new(catalog) as Box<dyn CandidateCatalog>)
        .collect();

    let dependents_source = config
        .libraries_io_api_key
        .as_ref()
        .map(|key| LibrariesIoClient::new(RateLimiter::per_minute(config.rates.libraries_io), key.as_str()))
        .transpose()?;

    let graph = ExpandGraphUseCase::new(
        dependents_source,
        DiskCache::in_dir(&config.cache_dir, GRAPH_CACHE_FILE),
        progress_reporter.clone(),
        GraphOptions {
            concurrency: config.concurrency.graph,
            dependents_threshold: config.graph.dependents_threshold,
            top_dependents: config.graph.top_dependents,
        },
    );

    let dependents = QueryDependentsUseCase::new(
        BigQueryCli::new(
            config.warehouse.bq_binary.clone(),
            config.warehouse.project_id.clone(),
        ),
        NpmRegistryClient::new(
            RateLimiter::per_minute(config.rates.registry),
            config.warehouse.search_text.clone(),
        )?,
        DiskCache::in_dir(&config.cache_dir, WAREHOUSE_CACHE_FILE),
        approver,
        progress_reporter.clone(),
        WarehouseOptions {
            batch_size: config.warehouse.batch_size,
            maximum_bytes_billed: config.warehouse.maximum_bytes_billed,
        },
    );

    // Shared so the target-repository stage reuses health fetched for packages
    let health_source = Arc::new(CachingRepoHealthSource::new(GitHubClient::new(
        RateLimiter::per_minute(config.rates.github),
        config.github_token.clone(),
    )?));

    let enrich = EnrichPackagesUseCase::new(
        NpmDownloadsClient::new(RateLimiter::per_minute(config.rates.downloads))?,
        NpmRegistryClient::new(
            RateLimiter::per_minute(config.rates.registry),
            config.warehouse.search_text.clone(),
        )?,
        health_source.clone(),
        progress_reporter.clone(),
        EnrichOptions {
            downloads_concurrency: config.concurrency.downloads,
            registry_concurrency: config.concurrency.registry,
            health_concurrency: config.concurrency.repo_health,
        },
    );

    let targets = FindTargetReposUseCase::new(
        health_source,
        progress_reporter.clone(),
        config.denylist.clone(),
        config.concurrency.repo_health,
    );

    Ok(AnalyzePackagesUseCase::new(
        AnalysisStages {
            catalogs,
            graph,
            dependents: Some(dependents),
            enrich,
            targets,
        },
        progress_reporter,
    ))
}
