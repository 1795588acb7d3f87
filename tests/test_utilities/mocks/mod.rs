/// Mock implementations for testing
mod mock_cache;
mod mock_catalog;
mod mock_progress_reporter;
mod mock_sources;
mod mock_warehouse;

pub use mock_cache::MockCache;
pub use mock_catalog::MockCatalog;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_sources::{MockDependentsSource, MockDownloadSource, MockRegistry, MockRepoHealth};
pub use mock_warehouse::{MockPopularPackages, MockWarehouse};
