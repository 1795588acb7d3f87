use async_trait::async_trait;
use e18e_analyzer::prelude::*;

/// Mock CandidateCatalog returning fixed candidates, or failing
pub struct MockCatalog {
    source: CandidateSource,
    candidates: Vec<Candidate>,
    fail: bool,
}

impl MockCatalog {
    pub fn new(source: CandidateSource, entries: &[(&str, ReplacementType)]) -> Self {
        Self {
            source,
            candidates: entries
                .iter()
                .map(|(name, kind)| Candidate::new(*name, source, *kind, "").unwrap())
                .collect(),
            fail: false,
        }
    }

    pub fn failing(source: CandidateSource) -> Self {
        Self {
            source,
            candidates: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl CandidateCatalog for MockCatalog {
    fn source(&self) -> CandidateSource {
        self.source
    }

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>> {
        if self.fail {
            anyhow::bail!("catalog file is not valid JSON");
        }
        Ok(self.candidates.clone())
    }
}
