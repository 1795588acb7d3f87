/// Result alias used throughout the crate.
///
/// Fatal errors carry an `anyhow` context chain so `main` can print every cause.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
