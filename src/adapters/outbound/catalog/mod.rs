/// Catalog adapters for the candidate lists
mod polyfill_heuristic;
mod static_catalog;

pub use polyfill_heuristic::classify_polyfill;
pub use static_catalog::StaticCatalog;
