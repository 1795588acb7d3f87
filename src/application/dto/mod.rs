/// Data Transfer Objects for application layer
///
/// DTOs carry the request into the analysis use case and its results out
/// to the result sink.
mod analysis_request;
mod analysis_response;

pub use analysis_request::AnalysisRequest;
pub use analysis_response::AnalysisResponse;
