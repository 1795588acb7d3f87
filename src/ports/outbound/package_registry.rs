use crate::analysis::domain::RegistryMetadata;
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Most names one bulk download-count request may carry
pub const MAX_BULK_DOWNLOAD_NAMES: usize = 128;

/// DownloadCountSource port for weekly download counts
#[async_trait]
pub trait DownloadCountSource: Send + Sync {
    /// Fetches last-week downloads for a chunk of package names
    ///
    /// Names missing from the returned map had no count available.
    async fn fetch_weekly_downloads(&self, package_names: &[String]) -> Result<HashMap<String, u64>>;
}

/// RegistryMetadataSource port for package registry documents
#[async_trait]
pub trait RegistryMetadataSource: Send + Sync {
    /// Fetches registry metadata for a package
    ///
    /// # Returns
    /// `None` when the registry does not know the package
    async fn fetch_metadata(&self, package_name: &str) -> Result<Option<RegistryMetadata>>;
}

/// PopularPackageSource port for the registry search API
#[async_trait]
pub trait PopularPackageSource: Send + Sync {
    /// Returns popular package names, deduplicated, most popular first
    async fn fetch_popular_packages(&self) -> Result<Vec<String>>;
}
