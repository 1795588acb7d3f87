/// Shared utilities used across all layers
pub mod error;
pub mod parallel;
pub mod rate_limiter;
pub mod result;

pub use parallel::parallel_map;
pub use rate_limiter::{RateLimiter, ThrottleSignal};
pub use result::Result;
