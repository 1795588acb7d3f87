use super::http::{build_http_client, encode_package_name};
use crate::ports::outbound::{DownloadCountSource, MAX_BULK_DOWNLOAD_NAMES};
use crate::shared::{RateLimiter, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

const DOWNLOADS_BASE_URL: &str = "https://api.npmjs.org/downloads/point/last-week";

#[derive(Debug, Deserialize)]
struct PointDownloads {
    downloads: u64,
}

/// NpmDownloadsClient adapter for the npm downloads API
///
/// A single name goes to the point endpoint; several unscoped names go to
/// the bulk endpoint, whose response is keyed by package name. The bulk
/// endpoint rejects scoped names, so callers send those one at a time.
pub struct NpmDownloadsClient {
    client: reqwest::Client,
    limiter: RateLimiter,
}

impl NpmDownloadsClient {
    pub fn new(limiter: RateLimiter) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            limiter,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .limiter
            .execute(|| self.client.get(url).send())
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("npm downloads API returned status code {}", response.status());
        }
        Ok(response.json().await?)
    }

    async fn fetch_single(&self, name: &str) -> Result<HashMap<String, u64>> {
        let url = format!("{}/{}", DOWNLOADS_BASE_URL, encode_package_name(name));
        let point: PointDownloads = self.get_json(&url).await?;
        Ok(HashMap::from([(name.to_string(), point.downloads)]))
    }

    async fn fetch_bulk(&self, names: &[String]) -> Result<HashMap<String, u64>> {
        if let Some(scoped) = names.iter().find(|n| n.starts_with('@')) {
            anyhow::bail!("bulk downloads endpoint cannot take scoped package {}", scoped);
        }
        let joined = names
            .iter()
            .map(|n| encode_package_name(n))
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/{}", DOWNLOADS_BASE_URL, joined);
        let bulk: HashMap<String, Option<PointDownloads>> = self.get_json(&url).await?;
        Ok(Self::flatten_bulk(bulk))
    }

    fn flatten_bulk(bulk: HashMap<String, Option<PointDownloads>>) -> HashMap<String, u64> {
        bulk.into_iter()
            .filter_map(|(name, point)| point.map(|p| (name, p.downloads)))
            .collect()
    }
}

#[async_trait]
impl DownloadCountSource for NpmDownloadsClient {
    async fn fetch_weekly_downloads(&self, package_names: &[String]) -> Result<HashMap<String, u64>> {
        match package_names {
            [] => Ok(HashMap::new()),
            [single] => self.fetch_single(single).await,
            many if many.len() > MAX_BULK_DOWNLOAD_NAMES => {
                anyhow::bail!("{} names exceed the bulk limit of {}", many.len(), MAX_BULK_DOWNLOAD_NAMES)
            }
            many => self.fetch_bulk(many).await,
        }
    }
}
