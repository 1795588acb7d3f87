//! In-memory ports shared by the use case tests

use crate::analysis::domain::{Candidate, CandidateSource, ReplacementType};
use crate::ports::outbound::{CacheStore, ProgressReporter};
use crate::shared::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub fn candidate(name: &str) -> Candidate {
    Candidate::new(name, CandidateSource::ModuleReplacements, ReplacementType::Native, "").unwrap()
}

#[derive(Clone, Default)]
pub struct RecordingReporter {
    pub messages: Arc<Mutex<Vec<String>>>,
    pub errors: Arc<Mutex<Vec<String>>>,
}

impl RecordingReporter {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}

    fn report_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn report_completion(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Cache without TTL or staleness; records saves
#[derive(Default)]
pub struct MemoryCache<T> {
    pub entries: Mutex<HashMap<String, (T, Option<String>)>>,
    pub saves: Mutex<usize>,
}

impl<T: Clone> MemoryCache<T> {
    pub fn with(entries: Vec<(&str, T)>) -> Self {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), (v, None)))
                    .collect(),
            ),
            saves: Mutex::new(0),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl<T: Clone + Send + Sync> CacheStore<T> for MemoryCache<T> {
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
