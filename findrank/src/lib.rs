pub mod config;
pub mod errors;
pub mod filters;
pub mod fuzzy;
pub mod navigator;
pub mod replace;
pub mod results;
pub mod search;
pub mod tree;

pub use config::FindConfig;
pub use errors::{SearchError, SearchResult};
pub use fuzzy::{rank, FuzzyMatcher, MatchScore, RankedCandidate, Ranker, MAX_RESULTS};
pub use navigator::{Navigator, NavigatorState};
pub use replace::{apply_edits, ReplacePreview, ReplacementIntent, TextEdit};
pub use results::{SearchMatch, SearchResultSet};
pub use search::{compile, search, search_documents, CompiledPattern, SearchOptions};
pub use tree::{flatten, CandidateEntry, FileNode, NodeKind};
