//! Text search over a line corpus.
//!
//! A query and its [`SearchOptions`] are compiled once into a
//! [`CompiledPattern`], which is then run over any number of lines:
//!
//! ```rust
//! use findrank::search::{compile, search_documents, SearchOptions};
//!
//! let options = SearchOptions::new().whole_word(true);
//! let pattern = compile("foo", &options).unwrap();
//! let results = search_documents(&pattern, [("a.txt", "foobar foo baz")]);
//! assert_eq!(results.total_matches(), 1);
//! assert_eq!(results.matches()[0].match_start, 7);
//! ```
//!
//! Compilation is where user input can fail (bad regex, bad glob). Searching
//! itself never fails; a corpus that errors part way yields the results
//! found so far with [`SearchResultSet::is_complete`] returning false.
//!
//! [`SearchResultSet::is_complete`]: crate::results::SearchResultSet::is_complete
pub mod engine;
pub mod matcher;
pub mod options;

pub use engine::{document_lines, search, search_documents, search_fallible, CorpusLine};
pub use matcher::{compile, CompiledPattern, MatchStrategy, PatternFlags};
pub use options::SearchOptions;
