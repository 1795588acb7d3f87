pub mod candidate;
pub mod graph_data;
pub mod package_data;
pub mod repo_url;
pub mod scored_package;
pub mod target_repo;

pub use candidate::{
    is_scoped_name, validate_package_name, Candidate, CandidateSource, ReplacementType,
};
pub use graph_data::{DependentPackage, DependentRepo, GraphData, WarehouseSnapshot};
pub use package_data::{PackageData, RegistryMetadata, RepoHealth};
pub use repo_url::{normalize_repository_url, RepoSlug};
pub use scored_package::{PackageStatus, ScoreBreakdown, ScoredPackage};
pub use target_repo::{
    ReplacementOpportunity, ScoredTargetRepo, TargetRepo, TargetScoreBreakdown,
};
