use crate::analysis::domain::{Candidate, CandidateSource};
use std::collections::{HashMap, VecDeque};

/// CandidateAggregator merges the catalog outputs into one candidate per package.
///
/// Pure business logic: the catalogs are fetched by the application layer.
pub struct CandidateAggregator;

impl CandidateAggregator {
    /// Keeps exactly one candidate per package name.
    ///
    /// The candidate from the highest-priority source survives; when the same
    /// source lists a name twice the first entry wins. Output follows the
    /// order in which names were first seen.
    pub fn deduplicate(candidates: Vec<Candidate>) -> Vec<Candidate> {
        let mut first_seen: Vec<String> = Vec::new();
        let mut survivors: HashMap<String, Candidate> = HashMap::new();

        for candidate in candidates {
            match survivors.get(&candidate.name) {
                Some(existing) if existing.source.priority() <= candidate.source.priority() => {}
                Some(_) => {
                    survivors.insert(candidate.name.clone(), candidate);
                }
                None => {
                    first_seen.push(candidate.name.clone());
                    survivors.insert(candidate.name.clone(), candidate);
                }
            }
        }

        first_seen
            .into_iter()
            .filter_map(|name| survivors.remove(&name))
            .collect()
    }

    /// Takes up to `limit` candidates round-robin across sources, highest
    /// priority source first, so a development run still sees every catalog.
    pub fn sample_across_sources(candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
        let mut queues: Vec<VecDeque<Candidate>> = CandidateSource::ALL
            .iter()
            .map(|_| VecDeque::new())
            .collect();
        for candidate in candidates {
            queues[candidate.source.priority() as usize].push_back(candidate);
        }

        let mut sample = Vec::with_capacity(limit);
        while sample.len() < limit && queues.iter().any(|q| !q.is_empty()) {
            for queue in queues.iter_mut() {
                if sample.len() == limit {
                    break;
                }
                if let Some(candidate) = queue.pop_front() {
                    sample.push(candidate);
                }
            }
        }
        sample
    }

    /// Number of candidates per source, in priority order
    pub fn count_by_source(candidates: &[Candidate]) -> Vec<(CandidateSource, usize)> {
        CandidateSource::ALL
            .iter()
            .map(|source| {
                (
                    *source,
                    candidates.iter().filter(|c| c.source == *source).count(),
                )
            })
            .collect()
    }
}
