use serde::{Deserialize, Serialize};

/// Score for a case-insensitive exact match; always the highest score
pub const EXACT_SCORE: i64 = 1000;
/// Base score for a substring match, reduced by the match position
pub const SUBSTRING_BASE: i64 = 500;
/// Points for every query character consumed by a subsequence match
pub const FUZZY_CHAR_SCORE: i64 = 10;
/// Extra points per immediately preceding consecutive match
pub const FUZZY_RUN_BONUS: i64 = 5;

/// Which tier produced a match, before it is collapsed to a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    NoMatch,
    /// The query was empty
    Empty,
    Exact,
    /// Substring starting at the given character index
    Substring(usize),
    /// Ordered subsequence with the accumulated run score
    Fuzzy(i64),
}

impl MatchKind {
    pub fn is_match(&self) -> bool {
        !matches!(self, MatchKind::NoMatch)
    }

    pub fn score(&self) -> i64 {
        match *self {
            MatchKind::NoMatch | MatchKind::Empty => 0,
            MatchKind::Exact => EXACT_SCORE,
            MatchKind::Substring(index) => SUBSTRING_BASE - index as i64,
            // An exact match has to outrank everything else.
            MatchKind::Fuzzy(score) => score.min(EXACT_SCORE - 1),
        }
    }
}

/// Outcome of matching one candidate against one query.
///
/// Scores are only comparable between candidates scored against the same
/// query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub matched: bool,
    pub score: i64,
}

impl MatchScore {
    pub const NO_MATCH: MatchScore = MatchScore {
        matched: false,
        score: 0,
    };
}

impl From<MatchKind> for MatchScore {
    fn from(kind: MatchKind) -> Self {
        MatchScore {
            matched: kind.is_match(),
            score: kind.score(),
        }
    }
}

/// Scores candidate strings against a query using exact, substring and
/// ordered-subsequence tiers. The first tier that applies wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyMatcher {
    case_sensitive: bool,
}

impl FuzzyMatcher {
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn score(&self, query: &str, candidate: &str) -> MatchScore {
        self.classify(query, candidate).into()
    }

    /// Runs the tiers and reports which one matched
    pub fn classify(&self, query: &str, candidate: &str) -> MatchKind {
        if query.is_empty() {
            return MatchKind::Empty;
        }

        let (query, candidate, origins) = if self.case_sensitive {
            (query.to_string(), candidate.to_string(), None)
        } else {
            let (lowered, origins) = lowercase_with_origins(candidate);
            let query: String = query.chars().flat_map(char::to_lowercase).collect();
            (query, lowered, Some(origins))
        };

        if query == candidate {
            return MatchKind::Exact;
        }

        if let Some(byte_index) = candidate.find(&query) {
            // Lowercasing can change the character count, so report the
            // position in the candidate as given.
            let index = match &origins {
                Some(origins) => origins[byte_index],
                None => candidate[..byte_index].chars().count(),
            };
            return MatchKind::Substring(index);
        }

        subsequence_score(&query, &candidate).map_or(MatchKind::NoMatch, MatchKind::Fuzzy)
    }
}

/// Lowercases `text` and records, for every byte of the result, the index of
/// the original character it came from
fn lowercase_with_origins(text: &str) -> (String, Vec<usize>) {
    let mut lowered = String::with_capacity(text.len());
    let mut origins = Vec::with_capacity(text.len());
    for (index, c) in text.chars().enumerate() {
        for lower in c.to_lowercase() {
            lowered.push(lower);
            origins.resize(lowered.len(), index);
        }
    }
    (lowered, origins)
}

/// Walks the candidate consuming query characters in order. Each hit is worth
/// `10 + 5 * run` where `run` counts the hits immediately before it.
fn subsequence_score(query: &str, candidate: &str) -> Option<i64> {
    let mut wanted = query.chars().peekable();
    let mut score = 0;
    let mut run = 0;

    for c in candidate.chars() {
        let Some(&next) = wanted.peek() else {
            break;
        };
        if c == next {
            score += FUZZY_CHAR_SCORE + FUZZY_RUN_BONUS * run;
            run += 1;
            wanted.next();
        } else {
            run = 0;
        }
    }

    wanted.peek().is_none().then_some(score)
}
