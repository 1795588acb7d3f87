use async_trait::async_trait;
use e18e_analyzer::prelude::*;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Mock Warehouse: fixed dry-run estimates and canned batch rows
#[derive(Default, Clone)]
pub struct MockWarehouse {
    pub snapshot_bytes: u64,
    pub batch_bytes: u64,
    pub rows: Vec<Value>,
    pub queries: Arc<Mutex<Vec<String>>>,
}

impl MockWarehouse {
    pub fn new(snapshot_bytes: u64, batch_bytes: u64, rows: Vec<Value>) -> Self {
        Self {
            snapshot_bytes,
            batch_bytes,
            rows,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

fn is_batch(sql: &str) -> bool {
    sql.contains(".Dependencies`")
}

#[async_trait]
impl Warehouse for MockWarehouse {
    async fn version(&self) -> Result<String> {
        Ok("This is BigQuery CLI 2.1.4".to_string())
    }

    async fn dry_run(&self, sql: &str) -> Result<u64> {
        Ok(if is_batch(sql) {
            self.batch_bytes
        } else {
            self.snapshot_bytes
        })
    }

    async fn query(&self, sql: &str, _maximum_bytes_billed: u64) -> Result<Vec<Value>> {
        self.queries.lock().unwrap().push(sql.to_string());
        if is_batch(sql) {
            Ok(self.rows.clone())
        } else {
            Ok(vec![serde_json::json!({"snapshot": "2024-06-03 00:00:00"})])
        }
    }
}

/// Mock PopularPackageSource
pub struct MockPopularPackages(pub Vec<String>);

impl MockPopularPackages {
    pub fn numbered(count: usize) -> Self {
        Self((0..count).map(|i| format!("popular-{}", i)).collect())
    }
}

#[async_trait]
impl PopularPackageSource for MockPopularPackages {
    async fn fetch_popular_packages(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}
