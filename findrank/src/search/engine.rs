use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::Display;

use tracing::{debug, info, trace, warn};

use super::matcher::CompiledPattern;
use crate::results::{FileResult, SearchResultSet};

/// One line of a document, as handed over by the document-access layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusLine {
    pub file: String,
    /// 1-based line number
    pub line: usize,
    pub text: String,
}

impl CorpusLine {
    pub fn new(file: impl Into<String>, line: usize, text: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            text: text.into(),
        }
    }
}

impl<F: Into<String>, T: Into<String>> From<(F, usize, T)> for CorpusLine {
    fn from((file, line, text): (F, usize, T)) -> Self {
        CorpusLine::new(file, line, text)
    }
}

/// Splits a document into 1-based corpus lines. `\n` and `\r\n` both end a
/// line and a trailing newline does not produce an extra empty line.
pub fn document_lines<'a>(file: &'a str, text: &'a str) -> impl Iterator<Item = CorpusLine> + 'a {
    text.lines()
        .enumerate()
        .map(move |(i, line)| CorpusLine::new(file, i + 1, line))
}

/// Searches an in-memory corpus. See [`search_fallible`].
pub fn search<I, L>(pattern: &CompiledPattern, corpus: I) -> SearchResultSet
where
    I: IntoIterator<Item = L>,
    L: Into<CorpusLine>,
{
    search_fallible(pattern, corpus.into_iter().map(Ok::<L, Infallible>))
}

/// Searches a corpus that may fail part way, e.g. one streamed from disk.
///
/// The corpus is consumed in a single pass. Lines of files rejected by the
/// pattern's globs are skipped without being scanned. The first `Err` ends
/// the scan; what was found so far is returned with `complete == false`.
/// A blank pattern returns an empty set without reading the corpus.
pub fn search_fallible<I, L, E>(pattern: &CompiledPattern, corpus: I) -> SearchResultSet
where
    I: IntoIterator<Item = Result<L, E>>,
    L: Into<CorpusLine>,
    E: Display,
{
    if pattern.matches_nothing() {
        debug!("Blank pattern, corpus not scanned");
        return SearchResultSet::from_file_results(Vec::new(), Some(pattern.clone()));
    }

    let mut file_results: Vec<FileResult> = Vec::new();
    let mut eligible: HashMap<String, bool> = HashMap::new();
    let mut files_searched = 0;
    let mut files_skipped = 0;
    let mut complete = true;

    for item in corpus {
        let line: CorpusLine = match item {
            Ok(line) => line.into(),
            Err(e) => {
                warn!("Corpus ended early, keeping results so far: {}", e);
                complete = false;
                break;
            }
        };

        let allowed = match eligible.get(&line.file) {
            Some(&allowed) => allowed,
            None => {
                let allowed = pattern.should_search_file(&line.file);
                if allowed {
                    trace!("Searching file: {}", line.file);
                    files_searched += 1;
                } else {
                    trace!("Skipping filtered file: {}", line.file);
                    files_skipped += 1;
                }
                eligible.insert(line.file.clone(), allowed);
                allowed
            }
        };
        if !allowed {
            continue;
        }

        let ranges = pattern.find_matches(&line.text);
        if ranges.is_empty() {
            continue;
        }

        if file_results.last().map_or(true, |last| last.file != line.file) {
            file_results.push(FileResult::new(line.file.clone()));
        }
        if let Some(current) = file_results.last_mut() {
            for range in ranges {
                current.push(line.line, &line.text, range);
            }
        }
    }

    let mut result = SearchResultSet::from_file_results(file_results, Some(pattern.clone()));
    result.files_searched = files_searched;
    result.files_skipped = files_skipped;
    result.complete = complete;

    info!(
        "Search for '{}' complete: {} matches in {} files ({} searched, {} skipped)",
        pattern.query(),
        result.total_matches(),
        result.files_with_matches(),
        files_searched,
        files_skipped
    );
    result
}

/// Searches whole documents, skipping filtered files before splitting them
/// into lines.
pub fn search_documents<'a, I>(pattern: &CompiledPattern, documents: I) -> SearchResultSet
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut skipped = 0;
    let documents: Vec<(&str, &str)> = documents
        .into_iter()
        .filter(|(file, _)| {
            let keep = pattern.should_search_file(file);
            if !keep {
                skipped += 1;
            }
            keep
        })
        .collect();

    let mut result = search(
        pattern,
        documents
            .iter()
            .flat_map(|(file, text)| document_lines(file, text)),
    );
    // Empty documents have no lines but were still searched.
    result.files_searched = documents.len();
    result.files_skipped += skipped;
    result
}
