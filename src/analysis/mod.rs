/// Analysis domain: pure models, scoring policies, and ranking services.
///
/// Nothing in this module performs I/O; every input arrives through the
/// application layer, which gathers it from the outbound ports.
pub mod domain;
pub mod policies;
pub mod services;
