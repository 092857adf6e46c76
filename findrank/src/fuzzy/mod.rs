//! Quick-open ranking: a tiered fuzzy matcher and the ranker built on it.
//!
//! The matcher keeps its tiers distinguishable through [`MatchKind`] so tests
//! can assert which tier fired, while callers only see the collapsed
//! [`MatchScore`]. The ranker applies the matcher to a whole candidate set.
pub mod matcher;
pub mod ranker;

pub use matcher::{FuzzyMatcher, MatchKind, MatchScore};
pub use ranker::{rank, MatchField, RankedCandidate, Ranker, MAX_RESULTS};
