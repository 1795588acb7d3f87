/// Use cases module containing application business logic orchestration
mod analyze_packages;
mod enrich_packages;
mod expand_graph;
mod find_target_repos;
mod query_dependents;

#[cfg(test)]
mod test_support;

pub use analyze_packages::{AnalysisStages, AnalyzePackagesUseCase};
pub use enrich_packages::{download_chunks, EnrichOptions, EnrichPackagesUseCase};
pub use expand_graph::{ExpandGraphUseCase, GraphOptions};
pub use find_target_repos::FindTargetReposUseCase;
pub use query_dependents::{QueryDependentsUseCase, WarehouseOptions};
