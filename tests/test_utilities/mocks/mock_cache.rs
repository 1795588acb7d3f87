use e18e_analyzer::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory CacheStore without TTL; clones share state
#[derive(Clone)]
pub struct MockCache<T> {
    pub entries: Arc<Mutex<HashMap<String, (T, Option<String>)>>>,
    pub saves: Arc<Mutex<usize>>,
}

impl<T> Default for MockCache<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            saves: Arc::new(Mutex::new(0)),
        }
    }
}

impl<T: Clone> MockCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingerprint(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).and_then(|(_, f)| f.clone())
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl<T: Clone + Send + Sync> CacheStore<T> for MockCache<T> {
    fn get(&self, key: &str) -> Option<T> {
        self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone())
    }

    fn set(&self, key: &str, payload: T, fingerprint: Option<String>) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (payload, fingerprint));
    }

    fn update_freshness(&self, fingerprints: &HashMap<String, String>) {
        let mut entries = self.entries.lock().unwrap();
        for (key, fingerprint) in fingerprints {
            if let Some(entry) = entries.get_mut(key) {
                entry.1 = Some(fingerprint.clone());
            }
        }
    }

    fn freshest(&self) -> Option<(String, T)> {
        let entries = self.entries.lock().unwrap();
        entries
            .iter()
            .max_by(|a, b| a.0.cmp(b.0))
            .map(|(k, (v, _))| (k.clone(), v.clone()))
    }

    fn save(&self) -> Result<()> {
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
