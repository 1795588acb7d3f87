/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to reach catalogs, HTTP APIs, the warehouse, the disk, and the console.
pub mod cache_store;
pub mod candidate_catalog;
pub mod cost_approver;
pub mod dependents_source;
pub mod package_registry;
pub mod progress_reporter;
pub mod repo_health_source;
pub mod result_sink;
pub mod warehouse;

pub use cache_store::CacheStore;
pub use candidate_catalog::CandidateCatalog;
pub use cost_approver::{format_bytes, CostApprover, CostEstimate, PRICE_PER_TIB_USD};
pub use dependents_source::{DependentsSource, DependentsSummary};
pub use package_registry::{
    DownloadCountSource, PopularPackageSource, RegistryMetadataSource, MAX_BULK_DOWNLOAD_NAMES,
};
pub use progress_reporter::ProgressReporter;
pub use repo_health_source::RepoHealthSource;
pub use result_sink::ResultSink;
pub use warehouse::Warehouse;
