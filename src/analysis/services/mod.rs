pub mod candidate_aggregator;
pub mod package_scorer;
pub mod ranking;
pub mod target_repo_inverter;
pub mod target_repo_scorer;

pub use candidate_aggregator::CandidateAggregator;
pub use package_scorer::PackageScorer;
pub use ranking::{sort_and_rank, LogMinMax, Rankable};
pub use target_repo_inverter::{TargetRepoInverter, MIN_OPPORTUNITIES};
pub use target_repo_scorer::TargetRepoScorer;
