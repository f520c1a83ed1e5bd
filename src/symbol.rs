//! Symbol representation for externally analysed documents.
//!
//! A symbol is a named structural region of a document (a heading, a class, a block) as reported
//! by a language-analysis service. The engine never discovers symbols itself: it receives a
//! nested tree, flattens it once per rebuild, and scans the flat list with parent/child links
//! kept as indices.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Zero-based line and character coordinate in a document.
pub struct Position {
    /// Zero-based line.
    pub line: usize,
    /// Zero-based character offset within the line.
    pub character: usize,
}

impl Position {
    #[must_use]
    /// Position at `line`, `character`.
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Span between two positions, end inclusive of its line.
pub struct Range {
    /// First position of the span.
    pub start: Position,
    /// Last position of the span.
    pub end: Position,
}

impl Range {
    #[must_use]
    /// Span from `start` to `end`.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    #[must_use]
    /// Whole-line span from `start_line` to `end_line`.
    pub fn lines(start_line: usize, end_line: usize) -> Self {
        Self::new(Position::new(start_line, 0), Position::new(end_line, 0))
    }

    #[must_use]
    /// Zero-width span at a single position.
    pub fn point(position: Position) -> Self {
        Self::new(position, position)
    }

    #[must_use]
    /// Whether `line` falls within the span.
    pub fn contains_line(&self, line: usize) -> bool {
        self.start.line <= line && line <= self.end.line
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Named document region reported by the analysis service.
pub struct Symbol {
    /// Display name; not unique across a document.
    pub name: String,
    /// First line of the region.
    pub start_line: usize,
    /// Last line of the region.
    pub end_line: usize,
    /// Directly nested symbols.
    #[serde(default)]
    pub children: Vec<Symbol>,
}

impl Symbol {
    #[must_use]
    /// Childless symbol spanning `start_line..=end_line`.
    pub fn new(name: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        Self {
            name: name.into(),
            start_line,
            end_line,
            children: Vec::new(),
        }
    }

    #[must_use]
    /// Replaces the nested symbols.
    pub fn with_children(mut self, children: Vec<Symbol>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    /// Identity of the symbol in label stores.
    pub fn key(&self) -> SymbolKey {
        SymbolKey::new(&self.name, self.start_line)
    }

    #[must_use]
    /// Whole-line span of the symbol.
    pub fn range(&self) -> Range {
        Range::lines(self.start_line, self.end_line)
    }

    /// Moves the symbol and its descendants to follow `removed` lines at `at` being replaced by
    /// `inserted` lines. Lines inside the removed block collapse onto `at`.
    pub fn shift_lines(&mut self, at: usize, removed: usize, inserted: usize) {
        let shift = |line: usize| {
            if line < at {
                line
            } else if line < at + removed {
                at
            } else {
                line - removed + inserted
            }
        };
        let mut stack = vec![self];
        while let Some(symbol) = stack.pop() {
            symbol.start_line = shift(symbol.start_line);
            symbol.end_line = shift(symbol.end_line).max(symbol.start_line);
            stack.extend(symbol.children.iter_mut());
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Composite identity of a symbol, since names repeat within a document.
pub struct SymbolKey {
    /// Symbol name.
    pub name: String,
    /// First line of the symbol.
    pub start_line: usize,
}

impl SymbolKey {
    #[must_use]
    /// Key for the symbol `name` starting at `start_line`.
    pub fn new(name: impl Into<String>, start_line: usize) -> Self {
        Self {
            name: name.into(),
            start_line,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Symbol in the flattened list with its hierarchy recorded as indices.
pub struct FlatSymbol {
    /// Display name.
    pub name: String,
    /// First line of the region.
    pub start_line: usize,
    /// Last line of the region.
    pub end_line: usize,
    /// Nesting depth (0 for top-level symbols).
    pub depth: usize,
    /// Index of the containing symbol in the flat list.
    pub parent_index: Option<usize>,
    /// Indices of directly nested symbols.
    pub children_indices: Vec<usize>,
}

impl FlatSymbol {
    #[must_use]
    /// Identity of the symbol in label stores.
    pub fn key(&self) -> SymbolKey {
        SymbolKey::new(&self.name, self.start_line)
    }

    #[must_use]
    /// Whole-line span of the symbol.
    pub fn range(&self) -> Range {
        Range::lines(self.start_line, self.end_line)
    }

    #[must_use]
    /// Whether `line` falls within the symbol.
    pub fn contains_line(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

#[must_use]
/// Flattens a nested symbol tree in pre-order, keeping parent/child links.
///
/// Declaration order is preserved: a parent always precedes its children, and siblings keep the
/// order the analysis service reported them in.
pub fn flatten(symbols: &[Symbol]) -> Vec<FlatSymbol> {
    let mut flat = Vec::new();
    // Explicit stack of (symbol, depth, parent) so deep documents cannot overflow the call stack.
    let mut stack: Vec<(&Symbol, usize, Option<usize>)> =
        symbols.iter().rev().map(|s| (s, 0, None)).collect();

    while let Some((symbol, depth, parent_index)) = stack.pop() {
        let index = flat.len();
        flat.push(FlatSymbol {
            name: symbol.name.clone(),
            start_line: symbol.start_line,
            end_line: symbol.end_line,
            depth,
            parent_index,
            children_indices: Vec::new(),
        });
        if let Some(parent) = parent_index {
            flat[parent].children_indices.push(index);
        }
        for child in symbol.children.iter().rev() {
            stack.push((child, depth + 1, Some(index)));
        }
    }

    flat
}

#[cfg(test)]
#[path = "tests/symbol.rs"]
mod tests;
