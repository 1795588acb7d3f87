use crate::application::dto::AnalysisResponse;
use crate::shared::Result;
use std::path::PathBuf;

/// ResultSink port for the outputs of one run
pub trait ResultSink {
    /// Writes every output of the run
    ///
    /// # Returns
    /// The paths written
    fn write(&self, response: &AnalysisResponse) -> Result<Vec<PathBuf>>;
}
