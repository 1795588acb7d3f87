/// Console adapters for progress output and cost approval
mod cost_approver;
mod progress_reporter;

pub use cost_approver::{AutoApprover, InteractiveCostApprover};
pub use progress_reporter::StderrProgressReporter;
