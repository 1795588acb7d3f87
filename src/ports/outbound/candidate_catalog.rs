use crate::analysis::domain::{Candidate, CandidateSource};
use crate::shared::Result;
use async_trait::async_trait;

/// CandidateCatalog port for one static list of replaceable packages
///
/// Each implementation produces candidates tagged with its own source.
#[async_trait]
pub trait CandidateCatalog: Send + Sync {
    /// The source every returned candidate is tagged with
    fn source(&self) -> CandidateSource;

    /// Loads the catalog
    ///
    /// # Errors
    /// Returns an error if the catalog cannot be read or parsed
    async fn fetch_candidates(&self) -> Result<Vec<Candidate>>;
}
