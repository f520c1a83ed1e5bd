//! Rewriting the annotation comment above a symbol.
//!
//! An annotation belongs to a symbol when it sits directly above it, separated by blank lines
//! at most. The rewriter looks a bounded number of lines up for such a comment and plans the one
//! edit that makes the document carry the desired label: replace, delete, insert, or nothing.

use crate::edit_plan::{document_lines, line_terminator, TextEdit};
use crate::label::Label;
use crate::scanner::{bare_annotation, CommentStyle};

/// Default number of lines scanned above a symbol for its annotation.
pub const DEFAULT_LOOKBACK: usize = 8;

#[must_use]
/// Line of the annotation comment owning the symbol at `start_line`, if there is one.
///
/// Scans upward at most `max_lookback` lines and stops at the first line that is neither blank
/// nor an annotation.
pub fn find_annotation_line(lines: &[&str], start_line: usize, max_lookback: usize) -> Option<usize> {
    let floor = start_line.saturating_sub(max_lookback);
    for i in (floor..start_line.min(lines.len())).rev() {
        let line = lines[i];
        if bare_annotation(line).is_some() {
            return Some(i);
        }
        if !line.trim().is_empty() {
            break;
        }
    }
    None
}

fn indentation(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

#[must_use]
/// Plans the edit giving the symbol at `start_line` the label `label`.
///
/// An existing annotation is replaced in place, keeping its indentation and comment style, or
/// deleted when `label` is `Normal`. Without one, a new annotation in `style` is inserted
/// above the symbol with the symbol's indentation. `None` means the text already agrees.
pub fn plan_rewrite(
    text: &str,
    start_line: usize,
    label: Label,
    style: CommentStyle,
    max_lookback: usize,
) -> Option<TextEdit> {
    let lines = document_lines(text);

    match (find_annotation_line(&lines, start_line, max_lookback), label) {
        (Some(existing), Label::Normal) => Some(TextEdit::delete_line(existing)),
        (Some(existing), label) => {
            let current = lines[existing];
            let existing_style = bare_annotation(current).map_or(style, |(s, _)| s);
            let rewritten = format!("{}{}", indentation(current), existing_style.annotation(label));
            if rewritten == current {
                return None;
            }
            let terminator = line_terminator(text, existing);
            Some(TextEdit::replace_line(existing, format!("{rewritten}{terminator}")))
        }
        (None, Label::Normal) => None,
        (None, label) => {
            let indent = lines.get(start_line).map_or("", |l| indentation(l));
            let terminator = match line_terminator(text, start_line) {
                "" => "\n",
                t => t,
            };
            Some(TextEdit::insert(
                start_line,
                format!("{indent}{}{terminator}", style.annotation(label)),
            ))
        }
    }
}

#[cfg(test)]
#[path = "tests/rewriter.rs"]
mod tests;
