use super::http::{build_http_client, encode_package_name};
use crate::analysis::domain::{normalize_repository_url, RegistryMetadata};
use crate::ports::outbound::{PopularPackageSource, RegistryMetadataSource};
use crate::shared::{RateLimiter, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

const REGISTRY_BASE_URL: &str = "https://registry.npmjs.org";
/// Largest page the search endpoint serves
const SEARCH_PAGE_SIZE: usize = 250;
const SEARCH_PAGES: usize = 2;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RepositoryField {
    Url(String),
    Object {
        #[serde(default)]
        url: Option<String>,
    },
}

impl RepositoryField {
    fn url(&self) -> Option<&str> {
        match self {
            RepositoryField::Url(url) => Some(url),
            RepositoryField::Object { url } => url.as_deref(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct VersionDocument {
    #[serde(default)]
    deprecated: Option<serde_json::Value>,
    #[serde(default)]
    repository: Option<RepositoryField>,
}

#[derive(Debug, Deserialize)]
struct Packument {
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
    #[serde(default)]
    repository: Option<RepositoryField>,
    #[serde(default)]
    time: HashMap<String, String>,
    #[serde(default)]
    versions: HashMap<String, VersionDocument>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    objects: Vec<SearchObject>,
}

#[derive(Debug, Deserialize)]
struct SearchObject {
    package: SearchPackage,
}

#[derive(Debug, Deserialize)]
struct SearchPackage {
    name: String,
}

/// NpmRegistryClient adapter for the npm registry
///
/// Serves registry metadata (packuments) and the popularity-ranked search
/// used to pick the warehouse's dependent universe.
pub struct NpmRegistryClient {
    client: reqwest::Client,
    limiter: RateLimiter,
    search_text: String,
}

impl NpmRegistryClient {
    pub fn new(limiter: RateLimiter, search_text: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            limiter,
            search_text: search_text.into(),
        })
    }

    fn metadata_from_packument(packument: Packument) -> RegistryMetadata {
        let latest_version = packument.dist_tags.get("latest").cloned();
        let latest_doc = latest_version
            .as_ref()
            .and_then(|v| packument.versions.get(v));

        let repository_url = packument
            .repository
            .as_ref()
            .or_else(|| latest_doc.and_then(|doc| doc.repository.as_ref()))
            .and_then(RepositoryField::url)
            .and_then(normalize_repository_url);

        let deprecated = latest_doc
            .and_then(|doc| doc.deprecated.as_ref())
            .is_some_and(|value| match value {
                serde_json::Value::String(message) => !message.is_empty(),
                serde_json::Value::Bool(flag) => *flag,
                _ => false,
            });

        let last_publish = latest_version
            .as_ref()
            .and_then(|v| packument.time.get(v))
            .or_else(|| packument.time.get("modified"))
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc));

        RegistryMetadata {
            repository_url,
            last_publish,
            deprecated,
            latest_version,
        }
    }

    async fn search_page(&self, from: usize) -> Result<Vec<String>> {
        let url = format!(
            "{}/-/v1/search?text={}&size={}&from={}&popularity=1.0&quality=0.0&maintenance=0.0",
            REGISTRY_BASE_URL,
            urlencoding::encode(&self.search_text),
            SEARCH_PAGE_SIZE,
            from
        );
        let response = self
            .limiter
            .execute(|| self.client.get(&url).send())
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("npm search API returned status code {}", response.status());
        }
        let page: SearchResponse = response.json().await?;
        Ok(page.objects.into_iter().map(|o| o.package.name).collect())
    }

    fn merge_pages(pages: Vec<Vec<String>>) -> Vec<String> {
        let mut seen = HashSet::new();
        pages
            .into_iter()
            .flatten()
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }
}

#[async_trait]
impl RegistryMetadataSource for NpmRegistryClient {
    async fn fetch_metadata(&self, package_name: &str) -> Result<Option<RegistryMetadata>> {
        let url = format!("{}/{}", REGISTRY_BASE_URL, encode_package_name(package_name));
        let response = self
            .limiter
            .execute(|| self.client.get(&url).send())
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!("npm registry returned status code {}", response.status());
        }

        let packument: Packument = response.json().await?;
        Ok(Some(Self::metadata_from_packument(packument)))
    }
}

#[async_trait]
impl PopularPackageSource for NpmRegistryClient {
    async fn fetch_popular_packages(&self) -> Result<Vec<String>> {
        let mut pages = Vec::with_capacity(SEARCH_PAGES);
        for page in 0..SEARCH_PAGES {
            pages.push(self.search_page(page * SEARCH_PAGE_SIZE).await?);
        }
        Ok(Self::merge_pages(pages))
    }
}
