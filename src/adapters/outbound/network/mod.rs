/// Network adapters for the npm, GitHub, and libraries.io APIs
mod caching_repo_health_source;
mod github_client;
mod http;
mod libraries_io_client;
mod npm_downloads_client;
mod npm_registry_client;

pub use caching_repo_health_source::CachingRepoHealthSource;
pub use github_client::GitHubClient;
pub use http::{build_http_client, REQUEST_TIMEOUT};
pub use libraries_io_client::LibrariesIoClient;
pub use npm_downloads_client::NpmDownloadsClient;
pub use npm_registry_client::NpmRegistryClient;
