use crate::shared::Result;
use std::time::Duration;

/// Per-request timeout for every upstream API
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Builds the shared-configuration reqwest client every adapter uses
pub fn build_http_client() -> Result<reqwest::Client> {
    let user_agent = format!("e18e-analyzer/{}", env!("CARGO_PKG_VERSION"));
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Path segment for a package name; scoped names keep their `@` but encode the `/`
pub fn encode_package_name(name: &str) -> String {
    match name.strip_prefix('@') {
        Some(scoped) => format!("@{}", urlencoding::encode(scoped)),
        None => urlencoding::encode(name).into_owned(),
    }
}
