/// AnalysisRequest - Input of one analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    /// Take a cross-source sample of this many candidates instead of all
    pub limit: Option<usize>,
}

impl AnalysisRequest {
    pub fn new(limit: Option<usize>) -> Self {
        Self { limit }
    }
}
