use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matcher::{FuzzyMatcher, MatchScore};
use crate::tree::CandidateEntry;

/// Hard cap on ranked output. Rendering and per-keystroke latency both
/// assume it, so it is not configurable.
pub const MAX_RESULTS: usize = 50;

/// The candidate field that produced the winning score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchField {
    Name,
    Path,
}

/// A candidate together with its best score for the current query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub entry: CandidateEntry,
    pub score: MatchScore,
    pub field: MatchField,
}

impl RankedCandidate {
    pub fn path(&self) -> &str {
        &self.entry.path
    }
}

/// Orders candidates for quick-open style pickers
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    matcher: FuzzyMatcher,
}

impl Ranker {
    pub fn new(matcher: FuzzyMatcher) -> Self {
        Self { matcher }
    }

    /// Ranks `candidates` against `query`.
    ///
    /// A blank query lists `recent` paths first (caller order, only those in
    /// the candidate set), then everything else in input order. Otherwise each
    /// candidate keeps the better of its name and path scores, non-matches
    /// are dropped and the rest are stable-sorted by score, so ties keep their
    /// input order. Output never exceeds [`MAX_RESULTS`].
    pub fn rank<S: AsRef<str>>(
        &self,
        candidates: &[CandidateEntry],
        query: &str,
        recent: &[S],
    ) -> Vec<RankedCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return recent_first(candidates, recent);
        }

        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .filter_map(|entry| self.score_entry(entry, query))
            .collect();
        let matched = ranked.len();

        ranked.sort_by(|a, b| b.score.score.cmp(&a.score.score));
        ranked.truncate(MAX_RESULTS);

        debug!(
            "Ranked {} of {} candidates for '{}', returning {}",
            matched,
            candidates.len(),
            query,
            ranked.len()
        );
        ranked
    }

    fn score_entry(&self, entry: &CandidateEntry, query: &str) -> Option<RankedCandidate> {
        let by_name = self.matcher.score(query, &entry.display_name);
        let by_path = self.matcher.score(query, &entry.path);

        let (score, field) = match (by_name.matched, by_path.matched) {
            (false, false) => return None,
            (true, false) => (by_name, MatchField::Name),
            (false, true) => (by_path, MatchField::Path),
            (true, true) if by_path.score > by_name.score => (by_path, MatchField::Path),
            (true, true) => (by_name, MatchField::Name),
        };

        Some(RankedCandidate {
            entry: entry.clone(),
            score,
            field,
        })
    }
}

/// Convenience wrapper around a case-insensitive [`Ranker`]
pub fn rank<S: AsRef<str>>(
    candidates: &[CandidateEntry],
    query: &str,
    recent: &[S],
) -> Vec<RankedCandidate> {
    Ranker::default().rank(candidates, query, recent)
}

fn recent_first<S: AsRef<str>>(candidates: &[CandidateEntry], recent: &[S]) -> Vec<RankedCandidate> {
    let empty = MatchScore {
        matched: true,
        score: 0,
    };
    let to_ranked = |entry: &CandidateEntry| RankedCandidate {
        entry: entry.clone(),
        score: empty,
        field: MatchField::Name,
    };

    let mut taken: HashSet<&str> = HashSet::new();
    let mut ranked = Vec::with_capacity(MAX_RESULTS.min(candidates.len()));

    for path in recent {
        let path = path.as_ref();
        if ranked.len() == MAX_RESULTS {
            break;
        }
        if taken.contains(path) {
            continue;
        }
        if let Some(entry) = candidates.iter().find(|c| c.path == path) {
            taken.insert(entry.path.as_str());
            ranked.push(to_ranked(entry));
        }
    }

    ranked.extend(
        candidates
            .iter()
            .filter(|c| !taken.contains(c.path.as_str()))
            .take(MAX_RESULTS - ranked.len())
            .map(to_ranked),
    );
    ranked
}
