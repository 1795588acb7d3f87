/// End-to-end tests for the CLI and the offline adapters
mod test_utilities;

use e18e_analyzer::adapters::outbound::filesystem::GRAPH_CACHE_FILE;
use e18e_analyzer::prelude::*;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use test_utilities::mocks::*;

// Exit code tests for CLI
mod exit_code_tests {
    use assert_cmd::cargo::cargo_bin_cmd;
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("e18e-analyzer")
            .arg("--help")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("--limit"))
            .stdout(predicate::str::contains("--yes"));
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("e18e-analyzer")
            .arg("--version")
            .assert()
            .code(0);
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        cargo_bin_cmd!("e18e-analyzer")
            .arg("--invalid-option")
            .assert()
            .code(2);
    }

    /// Exit code 2: --limit must be a positive number
    #[test]
    fn test_exit_code_invalid_limit() {
        cargo_bin_cmd!("e18e-analyzer")
            .args(["--limit", "0"])
            .assert()
            .code(2);
    }

    /// Exit code 3: Application error - explicit config file missing
    #[test]
    fn test_exit_code_missing_config() {
        cargo_bin_cmd!("e18e-analyzer")
            .args(["--config", "/nonexistent/e18e-analyzer.config.yml"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to read config file"));
    }

    /// Exit code 3: Application error - invalid config value
    #[test]
    fn test_exit_code_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "leaderboard_size: 0\n").unwrap();

        cargo_bin_cmd!("e18e-analyzer")
            .arg("--config")
            .arg(&path)
            .assert()
            .code(3)
            .stderr(predicate::str::contains("leaderboard_size"));
    }
}

type OfflinePipeline = AnalyzePackagesUseCase<
    MockDependentsSource,
    DiskCache<GraphData>,
    MockWarehouse,
    MockPopularPackages,
    DiskCache<WarehouseSnapshot>,
    MockDownloadSource,
    MockRegistry,
    Arc<CachingRepoHealthSource<MockRepoHealth>>,
    MockProgressReporter,
>;

fn offline_pipeline(cache_dir: &std::path::Path, reporter: MockProgressReporter) -> OfflinePipeline {
    let catalogs = StaticCatalog::all(None)
        .into_iter()
        .map(|catalog| Box::new(catalog) as Box<dyn CandidateCatalog>)
        .collect();
    let health_source = Arc::new(CachingRepoHealthSource::new(MockRepoHealth::default()));

    AnalyzePackagesUseCase::new(
        AnalysisStages {
            catalogs,
            graph: ExpandGraphUseCase::new(
                Some(MockDependentsSource::new().with_package("moment", 40_000, &[])),
                DiskCache::in_dir(cache_dir, GRAPH_CACHE_FILE),
                reporter.clone(),
                GraphOptions::default(),
            ),
            dependents: None,
            enrich: EnrichPackagesUseCase::new(
                MockDownloadSource::new(&[("moment", 20_000_000), ("lodash", 50_000_000)]),
                MockRegistry::new(),
                health_source.clone(),
                reporter.clone(),
                EnrichOptions::default(),
            ),
            targets: FindTargetReposUseCase::new(health_source, reporter.clone(), vec![], 4),
        },
        reporter,
    )
}

#[tokio::test]
async fn test_e2e_embedded_catalogs_to_json_files() {
    let dir = TempDir::new().unwrap();
    let cache_dir = dir.path().join("cache");
    let output_dir = dir.path().join("output");

    let pipeline = offline_pipeline(&cache_dir, MockProgressReporter::new());
    let response = pipeline.execute(AnalysisRequest::default()).await.unwrap();

    assert!(!response.packages.is_empty());
    let mut names: Vec<&str> = response.packages.iter().map(|p| p.name()).collect();
    let total = names.len();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), total, "candidates must be unique");

    let writer = JsonResultWriter::new(output_dir.clone(), 5);
    let written = writer.write(&response).unwrap();
    assert_eq!(written.len(), 3);

    let leaderboard: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join("leaderboard.json")).unwrap())
            .unwrap();
    let leaderboard = leaderboard.as_array().unwrap();
    assert_eq!(leaderboard.len(), 5.min(total));
    assert_eq!(leaderboard[0]["rank"], 1);

    let stats: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join("stats.json")).unwrap()).unwrap();
    assert_eq!(stats["candidateCount"], total);

    // fetched graph data is persisted for the next run
    assert!(cache_dir.join(GRAPH_CACHE_FILE).exists());
}

#[tokio::test]
async fn test_e2e_second_run_is_served_from_disk_cache() {
    let dir = TempDir::new().unwrap();
    let cache_dir = dir.path().join("cache");

    offline_pipeline(&cache_dir, MockProgressReporter::new())
        .execute(AnalysisRequest::new(Some(8)))
        .await
        .unwrap();

    let reporter = MockProgressReporter::new();
    offline_pipeline(&cache_dir, reporter.clone())
        .execute(AnalysisRequest::new(Some(8)))
        .await
        .unwrap();

    assert!(reporter.contains("8 cached, 0 to fetch"));
}
