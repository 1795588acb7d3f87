use crate::shared::Result;
use std::collections::HashMap;

/// CacheStore port for a keyed cache with TTL and freshness fingerprints
///
/// Reads and writes are in memory; only [`CacheStore::save`] touches disk.
pub trait CacheStore<T>: Send + Sync {
    /// Returns the payload if present, within the TTL, and not stale
    fn get(&self, key: &str) -> Option<T>;

    /// Stores a payload with an optional freshness fingerprint
    fn set(&self, key: &str, payload: T, fingerprint: Option<String>);

    /// Compares observed fingerprints with the stored ones.
    ///
    /// A changed fingerprint marks the entry stale; an entry without a
    /// fingerprint adopts the observed one.
    fn update_freshness(&self, fingerprints: &HashMap<String, String>);

    /// The most recently cached usable entry, with its key
    fn freshest(&self) -> Option<(String, T)>;

    /// Persists the cache if anything changed since it was loaded
    fn save(&self) -> Result<()>;
}
