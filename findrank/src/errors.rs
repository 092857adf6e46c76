//! Error types for the ranking and search engine.
//!
//! Nothing in the engine panics on bad user input. Every failure a caller can
//! provoke comes back as a [`SearchError`], so a UI can always tell an
//! "invalid regex" state apart from an honest "no results":
//!
//! ```rust,ignore
//! match compile_pattern(query, &options) {
//!     Ok(pattern) => // run the search,
//!     Err(SearchError::InvalidPattern { pattern, reason }) => // show a banner,
//!     Err(e) => // other errors
//! }
//! ```
//!
//! An empty query and the end of a corpus are not errors; they have defined
//! results in the components that see them.
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while compiling, searching or replacing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("Invalid glob '{glob}': {reason}")]
    InvalidGlob { glob: String, reason: String },
    #[error("Invalid replacement '{replacement}': {reason}")]
    InvalidReplacement { replacement: String, reason: String },
    #[error("No match with id {0} in the current results")]
    UnknownMatch(usize),
    #[error("No matches for file {0} in the current results")]
    UnknownFile(String),
    #[error("Results are stale after a replacement; run the search again")]
    StaleResults,
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SearchError {
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_glob(glob: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGlob {
            glob: glob.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_replacement(replacement: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReplacement {
            replacement: replacement.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_file(file: impl Into<String>) -> Self {
        Self::UnknownFile(file.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// True for errors caused by the text the user typed, as opposed to
    /// errors in how the caller drives the engine.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern { .. } | Self::InvalidGlob { .. } | Self::InvalidReplacement { .. }
        )
    }
}

impl From<config::ConfigError> for SearchError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
