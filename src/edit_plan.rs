//! Line-range text edits issued against a document.
//!
//! The annotation rewriter expresses every change as one [`TextEdit`]: a replacement of a
//! half-open range of whole lines. Hosts either forward it to an editor or turn it into a
//! `textum` patch with [`TextEdit::to_patch`] and apply that to the text or file.

use crate::error::Result;
use ropey::Rope;
use serde::{Deserialize, Serialize};
use textum::{Boundary, BoundaryMode, Patch, Snippet, Target};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// Replacement of whole lines in a document.
pub struct TextEdit {
    /// First line to replace (0-based, inclusive).
    pub line_start: usize,
    /// Line after the last one replaced (exclusive). Equal to `line_start` for an insertion.
    pub line_end: usize,
    /// New text, including line terminators. Empty for a deletion.
    pub replacement: String,
    /// What the edit does, for logging and callers.
    pub kind: EditKind,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
/// Shape of a [`TextEdit`].
pub enum EditKind {
    /// New lines before `line_start`.
    Insert,
    /// One line swapped for another.
    Replace,
    /// One line removed.
    Delete,
}

impl TextEdit {
    #[must_use]
    /// Inserts `text` before `line`.
    pub fn insert(line: usize, text: String) -> Self {
        Self {
            line_start: line,
            line_end: line,
            replacement: text,
            kind: EditKind::Insert,
        }
    }

    #[must_use]
    /// Replaces `line` with `text`.
    pub fn replace_line(line: usize, text: String) -> Self {
        Self {
            line_start: line,
            line_end: line + 1,
            replacement: text,
            kind: EditKind::Replace,
        }
    }

    #[must_use]
    /// Removes `line` and its terminator.
    pub fn delete_line(line: usize) -> Self {
        Self {
            line_start: line,
            line_end: line + 1,
            replacement: String::new(),
            kind: EditKind::Delete,
        }
    }

    /// Expresses the edit as a patch of `file`, whose current contents are `rope`.
    ///
    /// Ranges reaching past the last line are clamped to the end of the document. Appending to a
    /// document whose last line has no terminator starts the replacement on a new line.
    #[must_use]
    pub fn to_patch(&self, file: &str, rope: &Rope) -> Patch {
        let lines = rope.len_lines();
        let last = lines - 1;
        let mut replacement = self.replacement.clone();

        let snippet = if self.line_start >= lines {
            let unterminated = rope.len_chars() > 0 && rope.char(rope.len_chars() - 1) != '\n';
            if unterminated && !replacement.is_empty() {
                replacement.insert(0, '\n');
            }
            Snippet::From(Boundary::new(Target::Line(last), BoundaryMode::Include))
        } else if self.line_end >= lines {
            Snippet::Between {
                start: Boundary::new(Target::Line(self.line_start), BoundaryMode::Include),
                end: Boundary::new(Target::Line(last), BoundaryMode::Include),
            }
        } else {
            Snippet::Between {
                start: Boundary::new(Target::Line(self.line_start), BoundaryMode::Include),
                end: Boundary::new(Target::Line(self.line_end.max(self.line_start)), BoundaryMode::Exclude),
            }
        };

        Patch {
            file: file.to_string(),
            snippet,
            replacement,
        }
    }

    /// Applies the edit to `text` and returns the new text.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch cannot be resolved against `text`.
    pub fn apply_to(&self, text: &str) -> Result<String> {
        let mut rope = Rope::from_str(text);
        self.to_patch("", &rope).apply(&mut rope)?;
        Ok(rope.to_string())
    }
}

#[must_use]
/// Lines of `text` without terminators, as a document host would report them.
pub fn document_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n')
        .map(|l| l.strip_suffix('\n').map_or(l, |l| l.strip_suffix('\r').unwrap_or(l)))
        .collect()
}

#[must_use]
/// Terminator used by line `line` of `text`: `\r\n`, `\n`, or empty on an unterminated last line.
pub fn line_terminator(text: &str, line: usize) -> &'static str {
    match text.split_inclusive('\n').nth(line) {
        Some(l) if l.ends_with("\r\n") => "\r\n",
        Some(l) if l.ends_with('\n') => "\n",
        Some(_) => "",
        None => "\n",
    }
}

#[cfg(test)]
#[path = "tests/edit_plan.rs"]
mod tests;
