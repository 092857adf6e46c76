//! Include/exclude path filtering for multi-file search.
//!
//! Globs use the usual editor semantics: `*` matches any run of characters
//! except `/`, `**` matches across directories. A glob option may hold several
//! comma-separated patterns, and a pattern without a `/` is also tried against
//! the file name alone, so `*.ts` excludes `src/app.ts` as well as `app.ts`.
use glob::{MatchOptions, Pattern};

use crate::errors::{SearchError, SearchResult};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One compiled glob from an include or exclude list
#[derive(Debug, Clone)]
struct PathGlob {
    pattern: Pattern,
    name_only: bool,
}

impl PathGlob {
    fn matches(&self, path: &str) -> bool {
        if self.pattern.matches_with(path, MATCH_OPTIONS) {
            return true;
        }
        self.name_only
            && path
                .rsplit('/')
                .next()
                .is_some_and(|name| self.pattern.matches_with(name, MATCH_OPTIONS))
    }
}

/// Decides which files a search is allowed to scan
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Vec<PathGlob>,
    exclude: Vec<PathGlob>,
}

impl PathFilter {
    /// Compiles the include and exclude glob lists. Empty lists are allowed.
    pub fn new(include: &str, exclude: &str) -> SearchResult<Self> {
        Ok(Self {
            include: compile_globs(include)?,
            exclude: compile_globs(exclude)?,
        })
    }

    /// A filter that admits every path
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn is_included(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.include.is_empty() || self.include.iter().any(|g| g.matches(&path))
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.exclude.iter().any(|g| g.matches(&path))
    }

    /// A file is eligible when it satisfies the include list (or there is
    /// none) and matches nothing in the exclude list.
    pub fn should_include_file(&self, path: &str) -> bool {
        self.is_included(path) && !self.is_excluded(path)
    }
}

/// Splits a comma-separated glob list and checks each entry's syntax
fn compile_globs(list: &str) -> SearchResult<Vec<PathGlob>> {
    list.split(',')
        .map(str::trim)
        .filter(|glob| !glob.is_empty())
        .map(|raw| {
            let glob = raw.replace('\\', "/");
            let pattern =
                Pattern::new(&glob).map_err(|e| SearchError::invalid_glob(&glob, e.msg))?;
            Ok(PathGlob {
                pattern,
                name_only: !glob.contains('/'),
            })
        })
        .collect()
}

fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    match path.strip_prefix("./") {
        Some(stripped) => stripped.to_string(),
        None => path,
    }
}
