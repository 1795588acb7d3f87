use crate::shared::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Warehouse port for a SQL data warehouse billed by bytes scanned
///
/// Callers must estimate with [`Warehouse::dry_run`] and obtain approval
/// before calling [`Warehouse::query`].
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Returns the client version; fails when the client is not installed
    async fn version(&self) -> Result<String>;

    /// Estimates the bytes a query would scan without running it
    async fn dry_run(&self, sql: &str) -> Result<u64>;

    /// Runs a query, refusing to bill more than `maximum_bytes_billed`
    ///
    /// # Returns
    /// One JSON object per result row
    async fn query(&self, sql: &str, maximum_bytes_billed: u64) -> Result<Vec<Value>>;
}
