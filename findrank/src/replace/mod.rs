//! Replacement descriptions handed to the document-edit layer.
//!
//! Nothing here touches a document. A [`ReplacementIntent`] lists the edits a
//! replace operation would make; the owner of the documents applies them and
//! then runs the search again. [`apply_edits`] is the pure helper such an
//! owner (or a preview) can use to render the edited text.
use serde::{Deserialize, Serialize};

use crate::errors::{SearchError, SearchResult};
use crate::results::SearchMatch;
use crate::search::matcher::CompiledPattern;

/// A single substitution in one line of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub file: String,
    /// 1-based line number
    pub line: usize,
    /// Byte offset of the replaced range within the line
    pub match_start: usize,
    pub match_end: usize,
    /// Text currently in the range
    pub original: String,
    /// Text the range becomes
    pub replacement: String,
}

impl TextEdit {
    /// Builds the edit for `m`, expanding capture references in regex mode
    pub fn for_match(m: &SearchMatch, pattern: Option<&CompiledPattern>, replacement: &str) -> Self {
        let replacement = match pattern {
            Some(pattern) => {
                pattern.expand_replacement(&m.line_text, m.match_start, m.match_end, replacement)
            }
            None => replacement.to_string(),
        };
        Self {
            file: m.file.clone(),
            line: m.line,
            match_start: m.match_start,
            match_end: m.match_end,
            original: m.matched_text().to_string(),
            replacement,
        }
    }
}

/// What a replace operation asks the document-edit layer to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReplacementIntent {
    Single {
        match_id: usize,
        replacement_text: String,
        edit: TextEdit,
    },
    File {
        file: String,
        replacement_text: String,
        edits: Vec<TextEdit>,
    },
    All {
        replacement_text: String,
        edits: Vec<TextEdit>,
    },
}

impl ReplacementIntent {
    pub fn edits(&self) -> &[TextEdit] {
        match self {
            ReplacementIntent::Single { edit, .. } => std::slice::from_ref(edit),
            ReplacementIntent::File { edits, .. } | ReplacementIntent::All { edits, .. } => edits,
        }
    }

    pub fn replacement_text(&self) -> &str {
        match self {
            ReplacementIntent::Single {
                replacement_text, ..
            }
            | ReplacementIntent::File {
                replacement_text, ..
            }
            | ReplacementIntent::All {
                replacement_text, ..
            } => replacement_text,
        }
    }

    /// Files touched by this intent, in edit order without repeats
    pub fn files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for edit in self.edits() {
            if !files.contains(&edit.file.as_str()) {
                files.push(&edit.file);
            }
        }
        files
    }

    /// The edits that target `file`
    pub fn edits_for<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a TextEdit> + 'a {
        self.edits().iter().filter(move |e| e.file == file)
    }
}

/// How a line reads before and after replacing one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacePreview {
    pub original: String,
    pub replaced: String,
    /// Byte range of the inserted text within `replaced`
    pub highlight: (usize, usize),
}

/// Renders `m.line_text` with the match replaced. Pure display transform.
pub fn preview_match(m: &SearchMatch, pattern: Option<&CompiledPattern>, replacement: &str) -> ReplacePreview {
    let edit = TextEdit::for_match(m, pattern, replacement);
    let mut replaced = String::with_capacity(m.line_text.len() + edit.replacement.len());
    replaced.push_str(&m.line_text[..m.match_start]);
    replaced.push_str(&edit.replacement);
    let highlight = (m.match_start, replaced.len());
    replaced.push_str(&m.line_text[m.match_end..]);

    ReplacePreview {
        original: m.line_text.clone(),
        replaced,
        highlight,
    }
}

/// Applies edits for one document to its full text and returns the result.
///
/// Edits for other files are ignored. Lines are addressed the way
/// [`document_lines`](crate::search::engine::document_lines) numbers them and
/// original line endings are kept. Overlapping or out-of-range edits are
/// rejected rather than guessed at.
pub fn apply_edits(file: &str, text: &str, edits: &[TextEdit]) -> SearchResult<String> {
    let mut edits: Vec<&TextEdit> = edits.iter().filter(|e| e.file == file).collect();
    edits.sort_by_key(|e| (e.line, e.match_start));

    let mut output = String::with_capacity(text.len());
    let mut pending = edits.into_iter().peekable();

    for (index, raw_line) in text.split_inclusive('\n').enumerate() {
        let line_number = index + 1;
        let body_len = raw_line
            .strip_suffix("\r\n")
            .or_else(|| raw_line.strip_suffix('\n'))
            .map_or(raw_line.len(), str::len);
        let (body, ending) = raw_line.split_at(body_len);

        let mut cursor = 0;
        while let Some(edit) = pending.next_if(|e| e.line == line_number) {
            if edit.match_start < cursor
                || edit.match_end > body.len()
                || edit.match_start > edit.match_end
                || !body.is_char_boundary(edit.match_start)
                || !body.is_char_boundary(edit.match_end)
            {
                return Err(SearchError::invalid_replacement(
                    &edit.replacement,
                    format!(
                        "edit {}:{}..{} does not fit {}",
                        edit.line, edit.match_start, edit.match_end, file
                    ),
                ));
            }
            output.push_str(&body[cursor..edit.match_start]);
            output.push_str(&edit.replacement);
            cursor = edit.match_end;
        }
        output.push_str(&body[cursor..]);
        output.push_str(ending);
    }

    if let Some(edit) = pending.next() {
        return Err(SearchError::invalid_replacement(
            &edit.replacement,
            format!("line {} is past the end of {}", edit.line, file),
        ));
    }
    Ok(output)
}
