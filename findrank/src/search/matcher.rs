use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::debug;

use super::options::SearchOptions;
use crate::errors::{SearchError, SearchResult};
use crate::filters::PathFilter;

/// `$$`, `${name}` and `$name` references in a replacement string
static CAPTURE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\$|\$\{([^}]*)\}|\$([0-9A-Za-z_]+)").expect("capture reference regex is valid")
});

/// How a compiled pattern scans a line
#[derive(Debug, Clone)]
pub enum MatchStrategy {
    /// Blank query: matches nothing, callers can skip the corpus entirely
    Nothing,
    /// Case-sensitive literal without word boundaries
    Simple(String),
    Regex(Regex),
}

/// Flags the pattern was compiled with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternFlags {
    pub case_sensitive: bool,
    pub whole_word: bool,
}

/// A query compiled against a set of [`SearchOptions`], reusable for any
/// number of lines and files
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    query: String,
    strategy: MatchStrategy,
    is_regex: bool,
    flags: PatternFlags,
    filter: PathFilter,
}

/// Compiles `query` under `options`.
///
/// Regex syntax errors and bad globs come back as errors naming the offending
/// text. A query that is blank after trimming compiles to a pattern that
/// matches nothing.
pub fn compile(query: &str, options: &SearchOptions) -> SearchResult<CompiledPattern> {
    let filter = options.validate()?;
    let flags = PatternFlags {
        case_sensitive: options.case_sensitive,
        whole_word: options.whole_word,
    };

    let strategy = if query.trim().is_empty() {
        debug!("Blank query, compiled to an empty predicate");
        MatchStrategy::Nothing
    } else if is_simple_pattern(options) {
        debug!("Pattern '{}' uses literal scan", query);
        MatchStrategy::Simple(query.to_string())
    } else {
        debug!("Pattern '{}' uses regex scan", query);
        MatchStrategy::Regex(build_regex(query, options)?)
    };

    Ok(CompiledPattern {
        query: query.to_string(),
        strategy,
        is_regex: options.use_regex,
        flags,
        filter,
    })
}

/// Literal, case-sensitive, whole-text searches never need the regex engine
fn is_simple_pattern(options: &SearchOptions) -> bool {
    !options.use_regex && options.case_sensitive && !options.whole_word
}

fn build_regex(query: &str, options: &SearchOptions) -> SearchResult<Regex> {
    let source = if options.use_regex {
        // Check the user's own pattern first so errors quote what they typed
        // rather than the wrapped form.
        if options.whole_word {
            Regex::new(query).map_err(|e| SearchError::invalid_pattern(query, e.to_string()))?;
        }
        query.to_string()
    } else {
        regex::escape(query)
    };

    let effective = if options.whole_word {
        format!(r"\b(?:{})\b", source)
    } else {
        source
    };

    RegexBuilder::new(&effective)
        .case_insensitive(!options.case_sensitive)
        .build()
        .map_err(|e| SearchError::invalid_pattern(query, e.to_string()))
}

impl CompiledPattern {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_regex(&self) -> bool {
        self.is_regex
    }

    pub fn flags(&self) -> PatternFlags {
        self.flags
    }

    pub fn strategy(&self) -> &MatchStrategy {
        &self.strategy
    }

    pub fn path_filter(&self) -> &PathFilter {
        &self.filter
    }

    /// True for a blank query. Distinct from a pattern that happens to match
    /// no line: callers can skip the corpus without scanning it.
    pub fn matches_nothing(&self) -> bool {
        matches!(self.strategy, MatchStrategy::Nothing)
    }

    pub fn should_search_file(&self, path: &str) -> bool {
        self.filter.should_include_file(path)
    }

    pub fn is_match(&self, line: &str) -> bool {
        match &self.strategy {
            MatchStrategy::Nothing => false,
            MatchStrategy::Simple(needle) => line.contains(needle.as_str()),
            MatchStrategy::Regex(regex) => regex.find_iter(line).any(|m| !m.is_empty()),
        }
    }

    /// Byte ranges of every non-overlapping match in `line`, left to right.
    /// Zero-length regex matches are not reported.
    pub fn find_matches(&self, line: &str) -> Vec<(usize, usize)> {
        match &self.strategy {
            MatchStrategy::Nothing => Vec::new(),
            MatchStrategy::Simple(needle) => line
                .match_indices(needle.as_str())
                .map(|(start, matched)| (start, start + matched.len()))
                .collect(),
            MatchStrategy::Regex(regex) => regex
                .find_iter(line)
                .filter(|m| !m.is_empty())
                .map(|m| (m.start(), m.end()))
                .collect(),
        }
    }

    /// Checks that a regex replacement only refers to groups this pattern
    /// has. Literal patterns accept any replacement text.
    pub fn validate_replacement(&self, replacement: &str) -> SearchResult<()> {
        let MatchStrategy::Regex(regex) = &self.strategy else {
            return Ok(());
        };
        if !self.is_regex {
            return Ok(());
        }

        for caps in CAPTURE_REF.captures_iter(replacement) {
            let Some(name) = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()) else {
                continue; // `$$`
            };
            let known = match name.parse::<usize>() {
                Ok(index) => index < regex.captures_len(),
                Err(_) => regex.capture_names().flatten().any(|n| n == name),
            };
            if !known {
                return Err(SearchError::invalid_replacement(
                    replacement,
                    format!("capture group ${} does not exist", name),
                ));
            }
        }
        Ok(())
    }

    /// The text that replaces the match at `start..end` of `line`.
    ///
    /// In regex mode capture references are expanded against that match;
    /// otherwise the replacement is used verbatim.
    pub fn expand_replacement(&self, line: &str, start: usize, end: usize, replacement: &str) -> String {
        if let (true, MatchStrategy::Regex(regex)) = (self.is_regex, &self.strategy) {
            if let Some(caps) = regex.captures_at(line, start) {
                if let Some(whole) = caps.get(0) {
                    if whole.start() == start && whole.end() == end {
                        let mut expanded = String::new();
                        caps.expand(replacement, &mut expanded);
                        return expanded;
                    }
                }
            }
        }
        replacement.to_string()
    }
}
