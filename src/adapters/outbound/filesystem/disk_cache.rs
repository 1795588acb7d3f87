use crate::ports::outbound::CacheStore;
use crate::shared::error::AnalyzerError;
use crate::shared::Result;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Bumped whenever the envelope or a payload shape changes incompatibly
pub const CACHE_VERSION: u32 = 1;
/// Entries older than this are ignored
pub const MAX_AGE_DAYS: i64 = 7;

pub const GRAPH_CACHE_FILE: &str = "graph-cache.json";
pub const WAREHOUSE_CACHE_FILE: &str = "warehouse-cache.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry<T> {
    payload: T,
    cached_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
    #[serde(default)]
    stale: bool,
}

impl<T> CacheEntry<T> {
    fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.stale && now - self.cached_at <= Duration::days(MAX_AGE_DAYS)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile<T> {
    version: u32,
    entries: BTreeMap<String, CacheEntry<T>>,
}

struct CacheState<T> {
    entries: BTreeMap<String, CacheEntry<T>>,
    dirty: bool,
}

/// DiskCache adapter: a JSON file holding versioned, timestamped entries
///
/// The file is read once on construction and written once per [`save`].
/// A missing, unreadable, or version-mismatched file yields an empty cache.
///
/// [`save`]: CacheStore::save
pub struct DiskCache<T> {
    path: PathBuf,
    state: Mutex<CacheState<T>>,
}

impl<T> DiskCache<T>
where
    T: Clone + Serialize + DeserializeOwned + Send,
{
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path).unwrap_or_default();
        Self {
            path,
            state: Mutex::new(CacheState {
                entries,
                dirty: false,
            }),
        }
    }

    /// Opens `<cache_dir>/<file_name>`
    pub fn in_dir(cache_dir: &Path, file_name: &str) -> Self {
        Self::open(cache_dir.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load(path: &Path) -> Option<BTreeMap<String, CacheEntry<T>>> {
        let content = fs::read_to_string(path).ok()?;
        let file: CacheFile<T> = serde_json::from_str(&content).ok()?;
        (file.version == CACHE_VERSION).then_some(file.entries)
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<T>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let state = self.lock();
        let entry = state.entries.get(key)?;
        entry.is_usable(now).then(|| entry.payload.clone())
    }

    fn set_at(&self, key: &str, payload: T, fingerprint: Option<String>, now: DateTime<Utc>) {
        let mut state = self.lock();
        state.entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                cached_at: now,
                fingerprint,
                stale: false,
            },
        );
        state.dirty = true;
    }

    fn freshest_at(&self, now: DateTime<Utc>) -> Option<(String, T)> {
        let state = self.lock();
        state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_usable(now))
            .max_by_key(|(_, entry)| entry.cached_at)
            .map(|(key, entry)| (key.clone(), entry.payload.clone()))
    }

    fn write_file(&self, entries: &BTreeMap<String, CacheEntry<T>>) -> Result<()> {
        let to_error = |details: String| AnalyzerError::CacheWriteError {
            path: self.path.clone(),
            details,
        };

        if let Some(parent) = self.path.parent() {
            if parent != Path::new("") {
                fs::create_dir_all(parent).map_err(|e| to_error(e.to_string()))?;
            }
        }

        let file = CacheFile {
            version: CACHE_VERSION,
            entries: entries.clone(),
        };
        let json = serde_json::to_string(&file).map_err(|e| to_error(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| to_error(e.to_string()))?;
        Ok(())
    }
}

impl<T> CacheStore<T> for DiskCache<T>
where
    T: Clone + Serialize + DeserializeOwned + Send,
{
    fn get(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    fn set(&self, key: &str, payload: T, fingerprint: Option<String>) {
        self.set_at(key, payload, fingerprint, Utc::now());
    }

    fn update_freshness(&self, fingerprints: &HashMap<String, String>) {
        let mut state = self.lock();
        let mut changed = false;
        for (key, observed) in fingerprints {
            let Some(entry) = state.entries.get_mut(key) else {
                continue;
            };
            match &entry.fingerprint {
                Some(stored) if stored != observed => {
                    entry.stale = true;
                    changed = true;
                }
                Some(_) => {}
                None => {
                    entry.fingerprint = Some(observed.clone());
                    changed = true;
                }
            }
        }
        state.dirty |= changed;
    }

    fn freshest(&self) -> Option<(String, T)> {
        self.freshest_at(Utc::now())
    }

    fn save(&self) -> Result<()> {
        let mut state = self.lock();
        if !state.dirty {
            return Ok(());
        }
        self.write_file(&state.entries)?;
        state.dirty = false;
        Ok(())
    }
}
