use serde::{Deserialize, Serialize};
use std::fmt;

const KNOWN_HOSTS: [&str; 3] = ["github.com", "gitlab.com", "bitbucket.org"];

/// Normalizes the many historical `repository` formats found in package
/// manifests into `https://<host>/<owner>/<repo>`.
///
/// Handles `git+https://…`, `git://…`, `ssh://git@…`, `git@host:owner/repo`,
/// `github:owner/repo` style shorthands, bare `owner/repo`, `.git` suffixes,
/// fragments, and deep links such as `/tree/main/packages/foo`.
pub fn normalize_repository_url(raw: &str) -> Option<String> {
    let mut url = raw.trim();
    if url.is_empty() {
        return None;
    }

    url = url.strip_prefix("git+").unwrap_or(url);
    let url = url.split(['#', '?']).next().unwrap_or(url);

    let (host, path) = if let Some(rest) = url.strip_prefix("github:") {
        ("github.com", rest)
    } else if let Some(rest) = url.strip_prefix("gitlab:") {
        ("gitlab.com", rest)
    } else if let Some(rest) = url.strip_prefix("bitbucket:") {
        ("bitbucket.org", rest)
    } else if let Some(rest) = url.strip_prefix("git@") {
        rest.split_once(':')?
    } else if let Some((_, rest)) = url.split_once("://") {
        let (authority, path) = rest.split_once('/')?;
        let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
        (host, path)
    } else if KNOWN_HOSTS.iter().any(|h| url.starts_with(&format!("{}/", h))) {
        url.split_once('/')?
    } else if url.matches('/').count() == 1 && !url.contains(':') {
        ("github.com", url)
    } else {
        return None;
    };

    let host = host.trim_end_matches('/').to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if owner.is_empty() || repo.is_empty() {
        return None;
    }

    Some(format!("https://{}/{}/{}", host, owner, repo))
}

/// GitHub `owner/repo` identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoSlug {
    owner: String,
    repo: String,
}

impl RepoSlug {
    /// Extracts the slug from any repository URL format that points at GitHub
    pub fn from_url(raw: &str) -> Option<Self> {
        let normalized = normalize_repository_url(raw)?;
        let path = normalized.strip_prefix("https://github.com/")?;
        let (owner, repo) = path.split_once('/')?;
        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Parses `owner/repo`, tolerating a `github.com/` prefix as written by deps.dev
    pub fn parse(full_name: &str) -> Option<Self> {
        let trimmed = full_name.trim().trim_matches('/');
        let trimmed = trimmed.strip_prefix("github.com/").unwrap_or(trimmed);
        let (owner, repo) = trimmed.split_once('/')?;
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Case-insensitive identity used to fold dependents into one repository
    pub fn key(&self) -> String {
        format!("{}/{}", self.owner, self.repo).to_ascii_lowercase()
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
