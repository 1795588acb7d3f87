use crate::analysis::domain::{Candidate, ReplacementType};

/// Multiplier for a documented replacement that has no curated entry
pub const DEFAULT_DOCUMENTED_EFFORT: f64 = 0.50;

/// Hand-curated multipliers for documented migrations.
///
/// 1.0 means "mechanical swap", 0.2 means "touches every call site with
/// different semantics".
const DOCUMENTED_EFFORT: &[(&str, f64)] = &[
    ("axios", 0.55),
    ("bluebird", 0.60),
    ("chalk", 0.90),
    ("colors", 0.90),
    ("cross-spawn", 0.80),
    ("deep-equal", 0.85),
    ("dotenv", 0.85),
    ("eslint-plugin-import", 0.65),
    ("execa", 0.60),
    ("faker", 0.80),
    ("fast-glob", 0.75),
    ("fs-extra", 0.65),
    ("glob", 0.70),
    ("globby", 0.75),
    ("jquery", 0.25),
    ("js-yaml", 0.85),
    ("lodash", 0.20),
    ("lodash.clonedeep", 0.90),
    ("lodash.get", 0.95),
    ("md5", 0.90),
    ("moment", 0.30),
    ("node-fetch", 0.90),
    ("object-hash", 0.70),
    ("ora", 0.80),
    ("qs", 0.60),
    ("readable-stream", 0.70),
    ("request", 0.40),
    ("sort-object", 0.90),
    ("underscore", 0.25),
    ("uuid", 0.95),
];

/// EffortPolicy maps a candidate to its effort multiplier
pub struct EffortPolicy;

impl EffortPolicy {
    /// Fixed multiplier per replacement type, or the curated lookup for documented ones
    pub fn multiplier(candidate: &Candidate) -> f64 {
        match candidate.replacement_type {
            ReplacementType::Native | ReplacementType::Remove => 1.0,
            ReplacementType::Simple => 0.95,
            ReplacementType::Documented => Self::documented_multiplier(&candidate.name),
        }
    }

    fn documented_multiplier(name: &str) -> f64 {
        DOCUMENTED_EFFORT
            .binary_search_by(|(entry, _)| entry.cmp(&name))
            .map(|index| DOCUMENTED_EFFORT[index].1)
            .unwrap_or(DEFAULT_DOCUMENTED_EFFORT)
    }
}
