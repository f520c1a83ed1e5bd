//! Assignment of annotation markers to the symbols they label.
//!
//! A marker labels the nearest symbol starting at or below its line. When no symbol follows it
//! (typically because the section it described has been commented out), the marker becomes a
//! placeholder entry hung under the symbol enclosing it, or else the nearest symbol above it.

use crate::label::Label;
use crate::scanner::Marker;
use crate::symbol::{FlatSymbol, Position, Range, SymbolKey};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
/// Synthetic identity of a placeholder: annotation line plus the token as written.
pub struct PlaceholderKey {
    /// Line of the annotation.
    pub line: usize,
    /// Label token as written.
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Outline entry synthesised for an annotation with no following symbol.
pub struct PlaceholderEntry {
    /// Identity of the placeholder.
    pub key: PlaceholderKey,
    /// Zero-width span at the marker.
    pub range: Range,
    /// Label written in the annotation.
    pub label: Label,
    /// Name of the owning symbol, if any encloses or precedes the marker.
    pub parent_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Marker assigned to a real symbol.
pub struct Assignment {
    /// Symbol the marker resolved onto.
    pub key: SymbolKey,
    /// Label written in the marker.
    pub label: Label,
    /// Position of the marker that produced the label.
    pub marker: Position,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Outcome of resolving every marker of a document.
pub struct Resolution {
    /// Markers resolved onto symbols, in marker order.
    pub assignments: Vec<Assignment>,
    /// Markers with no following symbol.
    pub placeholders: Vec<PlaceholderEntry>,
}

#[must_use]
/// Index of the symbol owning a marker on `line`.
///
/// The owner has the smallest non-negative `start_line - line`. Ties go to the shallowest symbol,
/// then to the first one in flattened order, so a section and its first child starting on the
/// same line resolve to the section.
pub fn owning_symbol(symbols: &[FlatSymbol], line: usize) -> Option<usize> {
    symbols
        .iter()
        .enumerate()
        .filter(|(_, s)| s.start_line >= line)
        .min_by_key(|(i, s)| (s.start_line - line, s.depth, *i))
        .map(|(i, _)| i)
}

#[must_use]
/// Index of the symbol a placeholder on `line` hangs under.
///
/// The first symbol whose range contains the line wins; otherwise the nearest symbol starting
/// above it.
pub fn placeholder_parent(symbols: &[FlatSymbol], line: usize) -> Option<usize> {
    if let Some(i) = symbols.iter().position(|s| s.contains_line(line)) {
        return Some(i);
    }
    symbols
        .iter()
        .enumerate()
        .filter(|(_, s)| s.start_line <= line)
        .min_by_key(|(i, s)| (line - s.start_line, *i))
        .map(|(i, _)| i)
}

/// Resolves markers onto symbols, synthesising placeholders where no symbol follows.
///
/// Runs in O(markers × symbols), which is bounded by the size of one document.
pub fn resolve(markers: impl IntoIterator<Item = Marker>, symbols: &[FlatSymbol]) -> Resolution {
    let mut resolution = Resolution::default();

    for marker in markers {
        let line = marker.position.line;
        if let Some(owner) = owning_symbol(symbols, line) {
            resolution.assignments.push(Assignment {
                key: symbols[owner].key(),
                label: marker.label,
                marker: marker.position,
            });
            continue;
        }

        let parent_name = placeholder_parent(symbols, line).map(|i| symbols[i].name.clone());
        resolution.placeholders.push(PlaceholderEntry {
            key: PlaceholderKey {
                line,
                token: marker.token,
            },
            range: Range::point(marker.position),
            label: marker.label,
            parent_name,
        });
    }

    resolution
}

#[cfg(test)]
#[path = "tests/resolver.rs"]
mod tests;
