//! e18e-analyzer - finds npm packages worth replacing, and where to replace them
//!
//! The pipeline loads curated catalogs of replaceable packages, expands each
//! candidate's reverse-dependency graph, enriches it with registry and
//! repository signals, scores it, and finally inverts the result into a
//! ranking of consumer repositories that would benefit from a bundled PR.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Analysis Layer** (`analysis`): Pure domain models, scoring services and policies
//! - **Application Layer** (`application`): Use cases, DTOs and read models
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): HTTP clients, the `bq` CLI, disk caches and console output
//! - **Shared** (`shared`): Error types, rate limiting and the bounded worker pool
//!
//! # Example
//!
//! ```no_run
//! use e18e_analyzer::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let candidates = vec![
//!     Candidate::new("moment", CandidateSource::ModuleReplacements, ReplacementType::Documented, "date-fns")?,
//!     Candidate::new("moment", CandidateSource::Deprecated, ReplacementType::Remove, "")?,
//! ];
//! let unique = CandidateAggregator::deduplicate(candidates);
//! assert_eq!(unique[0].source, CandidateSource::ModuleReplacements);
//!
//! let packages = unique
//!     .into_iter()
//!     .map(|c| PackageData::new(c, GraphData::empty()))
//!     .collect();
//! for scored in PackageScorer::score_all(packages) {
//!     println!("{} #{} ({:.3})", scored.name(), scored.rank, scored.composite_score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod analysis;
pub mod application;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::catalog::StaticCatalog;
    pub use crate::adapters::outbound::console::{
        AutoApprover, InteractiveCostApprover, StderrProgressReporter,
    };
    pub use crate::adapters::outbound::filesystem::{DiskCache, JsonResultWriter};
    pub use crate::adapters::outbound::network::{
        CachingRepoHealthSource, GitHubClient, LibrariesIoClient, NpmDownloadsClient,
        NpmRegistryClient,
    };
    pub use crate::adapters::outbound::warehouse::BigQueryCli;
    pub use crate::analysis::domain::{
        Candidate, CandidateSource, DependentPackage, DependentRepo, GraphData, PackageData,
        PackageStatus, RegistryMetadata, RepoHealth, ReplacementType, ScoredPackage,
        ScoredTargetRepo, TargetRepo, WarehouseSnapshot,
    };
    pub use crate::analysis::services::{
        CandidateAggregator, PackageScorer, TargetRepoInverter, TargetRepoScorer,
    };
    pub use crate::application::dto::{AnalysisRequest, AnalysisResponse};
    pub use crate::application::use_cases::{
        AnalysisStages, AnalyzePackagesUseCase, EnrichOptions, EnrichPackagesUseCase,
        ExpandGraphUseCase, FindTargetReposUseCase, GraphOptions, QueryDependentsUseCase,
        WarehouseOptions,
    };
    pub use crate::config::AnalyzerConfig;
    pub use crate::ports::outbound::{
        CacheStore, CandidateCatalog, CostApprover, CostEstimate, DependentsSource,
        DependentsSummary, DownloadCountSource, PopularPackageSource, ProgressReporter,
        RegistryMetadataSource, RepoHealthSource, ResultSink, Warehouse,
    };
    pub use crate::shared::Result;
}
