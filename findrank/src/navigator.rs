//! Cursor over a search result set, plus replace requests against it.
//!
//! The navigator owns one [`SearchResultSet`] at a time. Moving the cursor
//! wraps in both directions. Replace operations describe edits as a
//! [`ReplacementIntent`] and leave the results untouched; once an intent has
//! been handed out the results are considered stale and further replaces are
//! refused until [`Navigator::set_results`] supplies a fresh set.
use tracing::debug;

use crate::errors::{SearchError, SearchResult};
use crate::replace::{preview_match, ReplacePreview, ReplacementIntent, TextEdit};
use crate::results::{SearchMatch, SearchResultSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorState {
    Empty,
    Positioned(usize),
}

#[derive(Debug, Default)]
pub struct Navigator {
    results: SearchResultSet,
    cursor: usize,
    stale: bool,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(results: SearchResultSet) -> Self {
        let mut navigator = Self::new();
        navigator.set_results(results);
        navigator
    }

    /// Replaces the result set and moves the cursor to the first match
    pub fn set_results(&mut self, results: SearchResultSet) {
        debug!("Navigator got {} matches", results.total_matches());
        self.results = results;
        self.cursor = 0;
        self.stale = false;
    }

    pub fn results(&self) -> &SearchResultSet {
        &self.results
    }

    pub fn state(&self) -> NavigatorState {
        if self.results.is_empty() {
            NavigatorState::Empty
        } else {
            NavigatorState::Positioned(self.cursor)
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True once a replace intent was emitted for the current results
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn current(&self) -> Option<&SearchMatch> {
        self.results.get(self.cursor)
    }

    pub fn next(&mut self) -> Option<&SearchMatch> {
        let count = self.results.len();
        if count > 0 {
            self.cursor = (self.cursor + 1) % count;
        }
        self.current()
    }

    pub fn previous(&mut self) -> Option<&SearchMatch> {
        let count = self.results.len();
        if count > 0 {
            self.cursor = (self.cursor + count - 1) % count;
        }
        self.current()
    }

    /// Jumps to the first match of the next file that has matches, wrapping
    /// to the first file after the last.
    pub fn next_file(&mut self) -> Option<&SearchMatch> {
        let groups = self.results.groups();
        if let Some(pos) = groups.iter().position(|g| g.range.contains(&self.cursor)) {
            self.cursor = groups[(pos + 1) % groups.len()].range.start;
        }
        self.current()
    }

    /// Moves the cursor to `match_id` if it exists
    pub fn select(&mut self, match_id: usize) -> SearchResult<&SearchMatch> {
        if match_id >= self.results.len() {
            return Err(SearchError::UnknownMatch(match_id));
        }
        self.cursor = match_id;
        self.results.get(match_id).ok_or(SearchError::UnknownMatch(match_id))
    }

    pub fn replace_one(&mut self, match_id: usize, replacement: &str) -> SearchResult<ReplacementIntent> {
        self.check_fresh()?;
        let m = self
            .results
            .get(match_id)
            .ok_or(SearchError::UnknownMatch(match_id))?;
        self.check_replacement(replacement)?;

        let edit = TextEdit::for_match(m, self.results.pattern(), replacement);
        self.stale = true;
        Ok(ReplacementIntent::Single {
            match_id,
            replacement_text: replacement.to_string(),
            edit,
        })
    }

    pub fn replace_all_in_file(&mut self, file: &str, replacement: &str) -> SearchResult<ReplacementIntent> {
        self.check_fresh()?;
        let matches = self
            .results
            .matches_in_file(file)
            .ok_or_else(|| SearchError::unknown_file(file))?;
        self.check_replacement(replacement)?;

        let edits = self.edits_for(matches, replacement);
        debug!("Replacing {} matches in {}", edits.len(), file);
        self.stale = true;
        Ok(ReplacementIntent::File {
            file: file.to_string(),
            replacement_text: replacement.to_string(),
            edits,
        })
    }

    /// Emits edits for every match. An empty result set yields an intent
    /// with no edits.
    pub fn replace_all(&mut self, replacement: &str) -> SearchResult<ReplacementIntent> {
        self.check_fresh()?;
        self.check_replacement(replacement)?;

        let edits = self.edits_for(self.results.matches(), replacement);
        debug!(
            "Replacing {} matches across {} files",
            edits.len(),
            self.results.files_with_matches()
        );
        self.stale = true;
        Ok(ReplacementIntent::All {
            replacement_text: replacement.to_string(),
            edits,
        })
    }

    /// The line of `match_id` as it would read after replacing the match.
    /// Allowed on stale results; it changes nothing.
    pub fn preview(&self, match_id: usize, replacement: &str) -> SearchResult<ReplacePreview> {
        let m = self
            .results
            .get(match_id)
            .ok_or(SearchError::UnknownMatch(match_id))?;
        self.check_replacement(replacement)?;
        Ok(preview_match(m, self.results.pattern(), replacement))
    }

    fn check_fresh(&self) -> SearchResult<()> {
        if self.stale {
            return Err(SearchError::StaleResults);
        }
        Ok(())
    }

    fn check_replacement(&self, replacement: &str) -> SearchResult<()> {
        match self.results.pattern() {
            Some(pattern) => pattern.validate_replacement(replacement),
            None => Ok(()),
        }
    }

    fn edits_for(&self, matches: &[SearchMatch], replacement: &str) -> Vec<TextEdit> {
        let pattern = self.results.pattern();
        matches
            .iter()
            .map(|m| TextEdit::for_match(m, pattern, replacement))
            .collect()
    }
}
