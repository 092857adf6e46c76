use std::collections::HashMap;
use std::ops::Range;

use serde::Serialize;

use crate::search::matcher::CompiledPattern;

/// One occurrence of the pattern in a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    /// Position of this match in the flat result list
    pub id: usize,
    pub file: String,
    /// 1-based line number
    pub line: usize,
    /// 1-based character column of the match start
    pub column: usize,
    /// Byte offset of the match start within `line_text`
    pub match_start: usize,
    /// Byte offset one past the match end within `line_text`
    pub match_end: usize,
    pub line_text: String,
}

impl SearchMatch {
    pub fn matched_text(&self) -> &str {
        &self.line_text[self.match_start..self.match_end]
    }
}

/// All matches found in one file, before ids are assigned
#[derive(Debug, Clone, Default)]
pub struct FileResult {
    pub file: String,
    pub matches: Vec<SearchMatch>,
}

impl FileResult {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            matches: Vec::new(),
        }
    }

    pub fn push(&mut self, line: usize, line_text: &str, range: (usize, usize)) {
        let (match_start, match_end) = range;
        self.matches.push(SearchMatch {
            id: 0,
            file: self.file.clone(),
            line,
            column: line_text[..match_start].chars().count() + 1,
            match_start,
            match_end,
            line_text: line_text.to_string(),
        });
    }
}

/// A file's slice of the flat result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileGroup {
    pub file: String,
    pub range: Range<usize>,
}

impl FileGroup {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Ordered matches of one search plus their grouping by file.
///
/// Files keep the order in which they first produced a match; inside a file
/// matches are ordered by line, then column. A result set is never patched:
/// a new query or new options produce a new set.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResultSet {
    matches: Vec<SearchMatch>,
    groups: Vec<FileGroup>,
    /// Files whose lines were scanned
    pub files_searched: usize,
    /// Files rejected by the include/exclude globs
    pub files_skipped: usize,
    /// False when the corpus ended early; the matches are the results so far
    pub complete: bool,
    #[serde(skip)]
    pattern: Option<CompiledPattern>,
}

impl Default for SearchResultSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchResultSet {
    /// Creates an empty, complete result set
    pub fn new() -> Self {
        Self {
            matches: Vec::new(),
            groups: Vec::new(),
            files_searched: 0,
            files_skipped: 0,
            complete: true,
            pattern: None,
        }
    }

    /// Assembles a result set from per-file results, merging repeated files
    /// into the group of their first appearance.
    pub fn from_file_results(file_results: Vec<FileResult>, pattern: Option<CompiledPattern>) -> Self {
        let mut merged: Vec<FileResult> = Vec::with_capacity(file_results.len());
        let mut index: HashMap<String, usize> = HashMap::new();

        for file_result in file_results {
            if file_result.matches.is_empty() {
                continue;
            }
            match index.get(&file_result.file) {
                Some(&i) => merged[i].matches.extend(file_result.matches),
                None => {
                    index.insert(file_result.file.clone(), merged.len());
                    merged.push(file_result);
                }
            }
        }

        let mut set = Self::new();
        set.pattern = pattern;
        for mut file_result in merged {
            file_result
                .matches
                .sort_by_key(|m| (m.line, m.match_start));
            let start = set.matches.len();
            for mut m in file_result.matches {
                m.id = set.matches.len();
                set.matches.push(m);
            }
            set.groups.push(FileGroup {
                file: file_result.file,
                range: start..set.matches.len(),
            });
        }
        set
    }

    pub fn total_matches(&self) -> usize {
        self.matches.len()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn files_with_matches(&self) -> usize {
        self.groups.len()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn get(&self, id: usize) -> Option<&SearchMatch> {
        self.matches.get(id)
    }

    pub fn groups(&self) -> &[FileGroup] {
        &self.groups
    }

    pub fn group_of(&self, id: usize) -> Option<&FileGroup> {
        self.groups.iter().find(|g| g.range.contains(&id))
    }

    pub fn matches_in_file(&self, file: &str) -> Option<&[SearchMatch]> {
        self.groups
            .iter()
            .find(|g| g.file == file)
            .map(|g| &self.matches[g.range.clone()])
    }

    /// The pattern these results were produced with
    pub fn pattern(&self) -> Option<&CompiledPattern> {
        self.pattern.as_ref()
    }
}
