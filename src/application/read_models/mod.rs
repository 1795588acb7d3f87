//! Read models: view-shaped data derived from the scored results

pub mod summary_stats;

pub use summary_stats::SummaryStats;
