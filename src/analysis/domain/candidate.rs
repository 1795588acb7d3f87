use crate::shared::error::AnalyzerError;
use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of an npm package name (registry limit)
const MAX_PACKAGE_NAME_LENGTH: usize = 214;

/// Catalog a candidate was discovered in.
///
/// Variant order is the deduplication priority: when the same package is
/// listed by several catalogs, the earliest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateSource {
    /// Curated e18e module-replacements manifest
    ModuleReplacements,
    /// Curated list of trivially inlinable utilities
    MicroUtilities,
    /// es-shims style polyfills classified by naming heuristic
    PolyfillHeuristic,
    /// Packages deprecated upstream
    Deprecated,
}

impl CandidateSource {
    /// All sources, highest priority first
    pub const ALL: [CandidateSource; 4] = [
        CandidateSource::ModuleReplacements,
        CandidateSource::MicroUtilities,
        CandidateSource::PolyfillHeuristic,
        CandidateSource::Deprecated,
    ];

    /// Lower is more specific and wins deduplication
    pub fn priority(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CandidateSource::ModuleReplacements => "module-replacements",
            CandidateSource::MicroUtilities => "micro-utilities",
            CandidateSource::PolyfillHeuristic => "polyfill-heuristic",
            CandidateSource::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggested remediation for a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementType {
    /// A platform built-in covers it
    Native,
    /// A few lines of inline code cover it
    Simple,
    /// A documented migration to another package
    Documented,
    /// The dependency can be dropped outright
    Remove,
}

impl ReplacementType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReplacementType::Native => "native",
            ReplacementType::Simple => "simple",
            ReplacementType::Documented => "documented",
            ReplacementType::Remove => "remove",
        }
    }
}

impl fmt::Display for ReplacementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An npm package flagged as a modernization/removal opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    pub source: CandidateSource,
    pub replacement_type: ReplacementType,
    /// Free-text replacement guidance
    pub replacement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_path: Option<String>,
    /// Minimum Node.js version providing the native replacement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
}

impl Candidate {
    /// Creates a candidate after validating the package name
    pub fn new(
        name: impl Into<String>,
        source: CandidateSource,
        replacement_type: ReplacementType,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        validate_package_name(&name)?;
        Ok(Self {
            name,
            source,
            replacement_type,
            replacement: replacement.into(),
            doc_path: None,
            node_version: None,
        })
    }

    pub fn with_doc_path(mut self, doc_path: Option<String>) -> Self {
        self.doc_path = doc_path;
        self
    }

    pub fn with_node_version(mut self, node_version: Option<String>) -> Self {
        self.node_version = node_version;
        self
    }
}

/// Scoped names (`@scope/name`) need per-package download lookups
pub fn is_scoped_name(name: &str) -> bool {
    name.starts_with('@')
}

/// Validates an npm package name before it is interpolated into URLs or SQL
pub fn validate_package_name(name: &str) -> Result<()> {
    let invalid = |message: String| -> anyhow::Error { AnalyzerError::Validation { message }.into() };

    if name.is_empty() {
        return Err(invalid("Package name cannot be empty".to_string()));
    }

    if name.len() > MAX_PACKAGE_NAME_LENGTH {
        return Err(invalid(format!(
            "Package name is too long ({} bytes). Maximum allowed: {} bytes",
            name.len(),
            MAX_PACKAGE_NAME_LENGTH
        )));
    }

    if name.contains("..") || name.starts_with('.') || name.starts_with('_') {
        return Err(invalid(format!("Package name '{}' is not a valid npm name", name)));
    }

    let slashes = name.matches('/').count();
    let scoped = name.starts_with('@');
    if (scoped && slashes != 1) || (!scoped && slashes != 0) {
        return Err(invalid(format!(
            "Package name '{}' must be either `name` or `@scope/name`",
            name
        )));
    }

    if !name.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '/' | '~' | '!' | '*' | '(' | ')')
    }) {
        return Err(invalid(format!(
            "Package name '{}' contains characters npm does not allow",
            name
        )));
    }

    Ok(())
}
