//! Configuration for e18e-analyzer.
//!
//! Defaults are overridden by an optional `e18e-analyzer.config.yml`, then
//! secrets are read from the environment. API keys never live in the file.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::analysis::domain::RepoSlug;
use crate::shared::error::AnalyzerError;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "e18e-analyzer.config.yml";
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const LIBRARIES_IO_API_KEY_ENV: &str = "LIBRARIES_IO_API_KEY";

/// Repositories that list every candidate by construction
const DEFAULT_DENYLIST: [&str; 1] = ["es-tooling/module-replacements"];

/// Worker pool sizes per upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrencyConfig {
    pub graph: usize,
    pub registry: usize,
    pub downloads: usize,
    pub repo_health: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            graph: 2,
            registry: 8,
            downloads: 4,
            repo_health: 4,
        }
    }
}

/// Requests per minute per upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateConfig {
    pub libraries_io: u32,
    pub registry: u32,
    pub downloads: u32,
    pub github: u32,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            libraries_io: 55,
            registry: 600,
            downloads: 300,
            github: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WarehouseConfig {
    pub bq_binary: String,
    pub project_id: Option<String>,
    pub batch_size: usize,
    /// Hard cap passed to every real query
    pub maximum_bytes_billed: u64,
    /// Search text used to pick popular packages
    pub search_text: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            bq_binary: "bq".to_string(),
            project_id: None,
            batch_size: 100,
            maximum_bytes_billed: 50_000_000_000,
            search_text: "not:insecure".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    /// Only candidates with at least this many dependents get a top-dependents lookup
    pub dependents_threshold: u64,
    pub top_dependents: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            dependents_threshold: 100,
            top_dependents: 30,
        }
    }
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Directory whose `<source-id>.json` files replace the embedded catalogs
    pub catalog_dir: Option<PathBuf>,
    pub leaderboard_size: usize,
    pub concurrency: ConcurrencyConfig,
    pub rates: RateConfig,
    pub warehouse: WarehouseConfig,
    pub graph: GraphConfig,
    pub denylist: Vec<String>,
    pub github_token: Option<String>,
    pub libraries_io_api_key: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(".cache"),
            output_dir: PathBuf::from("data/output"),
            catalog_dir: None,
            leaderboard_size: 100,
            concurrency: ConcurrencyConfig::default(),
            rates: RateConfig::default(),
            warehouse: WarehouseConfig::default(),
            graph: GraphConfig::default(),
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            github_token: None,
            libraries_io_api_key: None,
        }
    }
}

impl AnalyzerConfig {
    /// Layers a config file over the defaults
    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(dir) = file.cache_dir {
            self.cache_dir = dir;
        }
        if let Some(dir) = file.output_dir {
            self.output_dir = dir;
        }
        if file.catalog_dir.is_some() {
            self.catalog_dir = file.catalog_dir;
        }
        if let Some(size) = file.leaderboard_size {
            self.leaderboard_size = size;
        }
        if let Some(denylist) = file.denylist {
            self.denylist = denylist;
        }

        if let Some(c) = file.concurrency {
            apply(&mut self.concurrency.graph, c.graph);
            apply(&mut self.concurrency.registry, c.registry);
            apply(&mut self.concurrency.downloads, c.downloads);
            apply(&mut self.concurrency.repo_health, c.repo_health);
        }
        if let Some(r) = file.rates {
            apply(&mut self.rates.libraries_io, r.libraries_io);
            apply(&mut self.rates.registry, r.registry);
            apply(&mut self.rates.downloads, r.downloads);
            apply(&mut self.rates.github, r.github);
        }
        if let Some(w) = file.warehouse {
            apply(&mut self.warehouse.bq_binary, w.bq_binary);
            if w.project_id.is_some() {
                self.warehouse.project_id = w.project_id;
            }
            apply(&mut self.warehouse.batch_size, w.batch_size);
            apply(&mut self.warehouse.maximum_bytes_billed, w.maximum_bytes_billed);
            apply(&mut self.warehouse.search_text, w.search_text);
        }
        if let Some(g) = file.graph {
            apply(&mut self.graph.dependents_threshold, g.dependents_threshold);
            apply(&mut self.graph.top_dependents, g.top_dependents);
        }
    }

    /// Reads API credentials through `lookup` (normally `std::env::var`)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        self.github_token = non_empty(GITHUB_TOKEN_ENV);
        self.libraries_io_api_key = non_empty(LIBRARIES_IO_API_KEY_ENV);
    }
}

fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub cache_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub catalog_dir: Option<PathBuf>,
    pub leaderboard_size: Option<usize>,
    pub denylist: Option<Vec<String>>,
    pub concurrency: Option<ConcurrencySection>,
    pub rates: Option<RateSection>,
    pub warehouse: Option<WarehouseSection>,
    pub graph: Option<GraphSection>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConcurrencySection {
    pub graph: Option<usize>,
    pub registry: Option<usize>,
    pub downloads: Option<usize>,
    pub repo_health: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RateSection {
    pub libraries_io: Option<u32>,
    pub registry: Option<u32>,
    pub downloads: Option<u32>,
    pub github: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct WarehouseSection {
    pub bq_binary: Option<String>,
    pub project_id: Option<String>,
    pub batch_size: Option<usize>,
    pub maximum_bytes_billed: Option<u64>,
    pub search_text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GraphSection {
    pub dependents_threshold: Option<u64>,
    pub top_dependents: Option<usize>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Resolves the configuration for a run: defaults, then the explicit or
/// discovered file, then the environment.
pub fn resolve(explicit: Option<&Path>, working_dir: &Path) -> Result<AnalyzerConfig> {
    let file = match explicit {
        Some(path) => Some(load_config_from_path(path)?),
        None => discover_config(working_dir)?,
    };

    let mut config = AnalyzerConfig::default();
    if let Some(file) = file {
        config.apply_file(file);
    }
    config.apply_env(|name| std::env::var(name).ok());
    Ok(config)
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    let invalid = |message: String, hint: &str| -> anyhow::Error {
        AnalyzerError::InvalidConfig {
            message,
            hint: hint.to_string(),
        }
        .into()
    };

    if config.leaderboard_size == Some(0) {
        return Err(invalid(
            "leaderboard_size must be at least 1".to_string(),
            "Omit the field to keep the default of 100.",
        ));
    }

    if config.warehouse.as_ref().and_then(|w| w.batch_size) == Some(0) {
        return Err(invalid(
            "warehouse.batch_size must be at least 1".to_string(),
            "The default batch size is 100 packages per query.",
        ));
    }

    let zero_pool = config.concurrency.as_ref().is_some_and(|c| {
        [c.graph, c.registry, c.downloads, c.repo_health].contains(&Some(0))
    });
    if zero_pool {
        return Err(invalid(
            "concurrency values must be at least 1".to_string(),
            "Remove the field to use the built-in pool size.",
        ));
    }

    let zero_rate = config.rates.as_ref().is_some_and(|r| {
        [r.libraries_io, r.registry, r.downloads, r.github].contains(&Some(0))
    });
    if zero_rate {
        return Err(invalid(
            "rates must allow at least 1 request per minute".to_string(),
            "Rates are requests per minute for each upstream API.",
        ));
    }

    if let Some(denylist) = &config.denylist {
        if let Some((i, entry)) = denylist
            .iter()
            .enumerate()
            .find(|(_, entry)| RepoSlug::parse(entry).is_none())
        {
            return Err(invalid(
                format!("denylist[{}] '{}' is not an owner/repo name", i, entry),
                "Use the form \"es-tooling/module-replacements\".",
            ));
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.concurrency.graph, 2);
        assert_eq!(config.concurrency.registry, 8);
        assert_eq!(config.rates.libraries_io, 55);
        assert_eq!(config.warehouse.batch_size, 100);
        assert_eq!(config.graph.dependents_threshold, 100);
        assert_eq!(config.graph.top_dependents, 30);
        assert_eq!(config.denylist, vec!["es-tooling/module-replacements"]);
        assert!(config.github_token.is_none());
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
cache_dir: /tmp/e18e-cache
leaderboard_size: 50
denylist:
  - owner/repo
concurrency:
  registry: 16
rates:
  github: 30
warehouse:
  batch_size: 250
  project_id: my-billing-project
graph:
  top_dependents: 10
"#,
        )
        .unwrap();

        let file = load_config_from_path(&config_path).unwrap();
        let mut config = AnalyzerConfig::default();
        config.apply_file(file);

        assert_eq!(config.cache_dir, PathBuf::from("/tmp/e18e-cache"));
        assert_eq!(config.leaderboard_size, 50);
        assert_eq!(config.denylist, vec!["owner/repo"]);
        assert_eq!(config.concurrency.registry, 16);
        assert_eq!(config.concurrency.graph, 2);
        assert_eq!(config.rates.github, 30);
        assert_eq!(config.rates.registry, 600);
        assert_eq!(config.warehouse.batch_size, 250);
        assert_eq!(config.warehouse.project_id.as_deref(), Some("my-billing-project"));
        assert_eq!(config.warehouse.bq_binary, "bq");
        assert_eq!(config.graph.top_dependents, 10);
        assert_eq!(config.graph.dependents_threshold, 100);
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "leaderboard_size: 7\n").unwrap();

        let config = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.leaderboard_size, Some(7));
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: [[[broken").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_validation_errors() {
        let dir = TempDir::new().unwrap();
        for (content, needle) in [
            ("leaderboard_size: 0\n", "leaderboard_size"),
            ("warehouse:\n  batch_size: 0\n", "batch_size"),
            ("concurrency:\n  downloads: 0\n", "concurrency"),
            ("rates:\n  github: 0\n", "rates"),
            ("denylist:\n  - not-a-repo\n", "denylist[0]"),
        ] {
            let path = dir.path().join("config.yml");
            fs::write(&path, content).unwrap();
            let err = format!("{}", load_config_from_path(&path).unwrap_err());
            assert!(err.contains(needle), "{} not in {}", needle, err);
        }
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "leaderboard_size: 5\nmystery: true\n").unwrap();
        let config = load_config_from_path(&path).unwrap();
        assert!(config.unknown_fields.contains_key("mystery"));
    }

    #[test]
    fn test_env_secrets() {
        let mut config = AnalyzerConfig::default();
        config.apply_env(|name| match name {
            GITHUB_TOKEN_ENV => Some("ghp_example".to_string()),
            LIBRARIES_IO_API_KEY_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.github_token.as_deref(), Some("ghp_example"));
        assert!(config.libraries_io_api_key.is_none());
    }

    #[test]
    fn test_resolve_with_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yml");
        fs::write(&path, "output_dir: out\n").unwrap();
        let config = resolve(Some(&path), dir.path()).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }
}
