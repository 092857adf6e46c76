use serde::{Deserialize, Serialize};

use crate::errors::SearchResult;
use crate::filters::PathFilter;

/// Options for one search invocation.
///
/// A new set of options means a new search; results computed under other
/// options are never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub whole_word: bool,
    #[serde(default)]
    pub use_regex: bool,
    /// Comma-separated globs a file must match; empty admits every file
    #[serde(default)]
    pub include_glob: String,
    /// Comma-separated globs that remove a file from the search
    #[serde(default)]
    pub exclude_glob: String,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn whole_word(mut self, yes: bool) -> Self {
        self.whole_word = yes;
        self
    }

    pub fn regex(mut self, yes: bool) -> Self {
        self.use_regex = yes;
        self
    }

    pub fn include(mut self, globs: impl Into<String>) -> Self {
        self.include_glob = globs.into();
        self
    }

    pub fn exclude(mut self, globs: impl Into<String>) -> Self {
        self.exclude_glob = globs.into();
        self
    }

    /// Checks the glob lists and returns the compiled path filter
    pub fn validate(&self) -> SearchResult<PathFilter> {
        PathFilter::new(&self.include_glob, &self.exclude_glob)
    }
}
