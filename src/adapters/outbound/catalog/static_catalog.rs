use super::polyfill_heuristic::classify_polyfill;
use crate::analysis::domain::{Candidate, CandidateSource, ReplacementType};
use crate::ports::outbound::CandidateCatalog;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MODULE_REPLACEMENTS_JSON: &str =
    include_str!("../../../../data/catalogs/module-replacements.json");
const MICRO_UTILITIES_JSON: &str = include_str!("../../../../data/catalogs/micro-utilities.json");
const POLYFILL_HEURISTIC_JSON: &str =
    include_str!("../../../../data/catalogs/polyfill-heuristic.json");
const DEPRECATED_JSON: &str = include_str!("../../../../data/catalogs/deprecated.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleReplacementsManifest {
    module_replacements: Vec<ModuleReplacement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleReplacement {
    #[serde(rename = "type")]
    kind: String,
    module_name: String,
    #[serde(default)]
    replacement: Option<String>,
    #[serde(default)]
    doc_path: Option<String>,
    #[serde(default)]
    node_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MicroUtility {
    name: String,
    replacement: String,
}

#[derive(Debug, Deserialize)]
struct DeprecatedPackage {
    name: String,
    #[serde(default)]
    message: String,
}

/// StaticCatalog adapter: one of the four candidate lists
///
/// The lists ship inside the binary. When an override directory is set and
/// holds `<source-id>.json`, that file is read instead.
pub struct StaticCatalog {
    source: CandidateSource,
    override_dir: Option<PathBuf>,
}

impl StaticCatalog {
    pub fn new(source: CandidateSource, override_dir: Option<PathBuf>) -> Self {
        Self {
            source,
            override_dir,
        }
    }

    /// One catalog per source, in priority order
    pub fn all(override_dir: Option<&Path>) -> Vec<StaticCatalog> {
        CandidateSource::ALL
            .iter()
            .map(|source| StaticCatalog::new(*source, override_dir.map(Path::to_path_buf)))
            .collect()
    }

    fn embedded(&self) -> &'static str {
        match self.source {
            CandidateSource::ModuleReplacements => MODULE_REPLACEMENTS_JSON,
            CandidateSource::MicroUtilities => MICRO_UTILITIES_JSON,
            CandidateSource::PolyfillHeuristic => POLYFILL_HEURISTIC_JSON,
            CandidateSource::Deprecated => DEPRECATED_JSON,
        }
    }

    fn load_text(&self) -> Result<String> {
        if let Some(dir) = &self.override_dir {
            let path = dir.join(format!("{}.json", self.source));
            if path.is_file() {
                return Ok(std::fs::read_to_string(&path)?);
            }
        }
        Ok(self.embedded().to_string())
    }

    /// Parses catalog text; entries with invalid package names are skipped
    pub fn parse(source: CandidateSource, text: &str) -> Result<Vec<Candidate>> {
        let candidates = match source {
            CandidateSource::ModuleReplacements => {
                let manifest: ModuleReplacementsManifest = serde_json::from_str(text)?;
                manifest
                    .module_replacements
                    .into_iter()
                    .filter_map(Self::from_module_replacement)
                    .collect()
            }
            CandidateSource::MicroUtilities => {
                let entries: Vec<MicroUtility> = serde_json::from_str(text)?;
                entries
                    .into_iter()
                    .filter_map(|e| {
                        Candidate::new(e.name, source, ReplacementType::Simple, e.replacement).ok()
                    })
                    .collect()
            }
            CandidateSource::PolyfillHeuristic => {
                let names: Vec<String> = serde_json::from_str(text)?;
                names
                    .into_iter()
                    .filter_map(|name| {
                        let native = classify_polyfill(&name)?;
                        Candidate::new(name, source, ReplacementType::Native, native).ok()
                    })
                    .collect()
            }
            CandidateSource::Deprecated => {
                let entries: Vec<DeprecatedPackage> = serde_json::from_str(text)?;
                entries
                    .into_iter()
                    .filter_map(|e| {
                        Candidate::new(e.name, source, ReplacementType::Documented, e.message).ok()
                    })
                    .collect()
            }
        };
        Ok(candidates)
    }

    fn from_module_replacement(entry: ModuleReplacement) -> Option<Candidate> {
        let replacement_type = match entry.kind.as_str() {
            "native" => ReplacementType::Native,
            "simple" => ReplacementType::Simple,
            "documented" => ReplacementType::Documented,
            "none" | "remove" => ReplacementType::Remove,
            _ => return None,
        };
        let replacement = entry
            .replacement
            .or_else(|| entry.doc_path.as_ref().map(|p| format!("See docs/modules/{}.md", p)))
            .unwrap_or_default();

        Candidate::new(
            entry.module_name,
            CandidateSource::ModuleReplacements,
            replacement_type,
            replacement,
        )
        .ok()
        .map(|c| {
            c.with_doc_path(entry.doc_path)
                .with_node_version(entry.node_version)
        })
    }
}

#[async_trait]
impl CandidateCatalog for StaticCatalog {
    fn source(&self) -> CandidateSource {
        self.source
    }

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>> {
        let text = self.load_text()?;
        Self::parse(self.source, &text)
    }
}
