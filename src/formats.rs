//! Format trait and tree-sitter symbol extraction for structured documents.
//!
//! A format supplies a tree-sitter language and a query capturing its heading nodes plus the
//! way to read a heading's level and title. [`extract_symbols`] turns the captured headings into
//! a nested symbol tree, so documents can be outlined without an external analysis service.

pub mod markdown;

use crate::error::{OutlineError, Result};
use crate::host::{Document, SymbolSource};
use crate::symbol::Symbol;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor};

/// Document format outlined through a tree-sitter grammar.
pub trait Format {
    /// Tree-sitter grammar of the format.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing every heading node.
    fn section_query(&self) -> &str;
    /// Nesting level of a captured heading (1 for top-level).
    fn heading_level(&self, node: Node<'_>) -> Option<usize>;
    /// Title text of a captured heading.
    fn heading_title(&self, node: Node<'_>, source: &[u8]) -> Option<String>;
}

struct Heading {
    level: usize,
    title: String,
    line: usize,
}

/// Parses `text` with `format` and returns its headings as a nested symbol tree.
///
/// A heading's region runs until the line before the next heading of the same or a higher
/// level, or to the end of the document.
///
/// # Errors
///
/// Returns an error if the grammar or the query cannot be loaded, or parsing fails.
pub fn extract_symbols(text: &str, format: &dyn Format) -> Result<Vec<Symbol>> {
    let language = format.language();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| OutlineError::parse(e.to_string()))?;
    let tree = parser
        .parse(text, None)
        .ok_or_else(|| OutlineError::parse("parser produced no tree"))?;
    let query = Query::new(&language, format.section_query())
        .map_err(|e| OutlineError::parse(e.to_string()))?;

    let source = text.as_bytes();
    let mut headings = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source);
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let node = capture.node;
            let (Some(level), Some(title)) = (
                format.heading_level(node),
                format.heading_title(node, source),
            ) else {
                continue;
            };
            headings.push(Heading {
                level,
                title,
                line: node.start_position().row,
            });
        }
    }

    let last_line = text.lines().count().saturating_sub(1);
    Ok(nest(&headings, last_line))
}

fn nest(headings: &[Heading], last_line: usize) -> Vec<Symbol> {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); headings.len()];
    let mut roots = Vec::new();
    let mut stack: Vec<usize> = Vec::new();

    for (i, heading) in headings.iter().enumerate() {
        while stack
            .last()
            .is_some_and(|&top| headings[top].level >= heading.level)
        {
            stack.pop();
        }
        match stack.last() {
            Some(&parent) => children[parent].push(i),
            None => roots.push(i),
        }
        stack.push(i);
    }

    let end_line = |i: usize| {
        headings[i + 1..]
            .iter()
            .find(|h| h.level <= headings[i].level)
            .map_or(last_line, |h| h.line.saturating_sub(1))
            .max(headings[i].line)
    };

    fn assemble(
        i: usize,
        headings: &[Heading],
        children: &[Vec<usize>],
        end_line: &dyn Fn(usize) -> usize,
    ) -> Symbol {
        Symbol::new(&headings[i].title, headings[i].line, end_line(i)).with_children(
            children[i]
                .iter()
                .map(|&c| assemble(c, headings, children, end_line))
                .collect(),
        )
    }

    roots
        .into_iter()
        .map(|i| assemble(i, headings, &children, &end_line))
        .collect()
}

/// Symbol source outlining documents with a tree-sitter format.
pub struct TreeSitterSymbols<F> {
    format: F,
}

impl<F: Format> TreeSitterSymbols<F> {
    #[must_use]
    /// Symbol source for `format`.
    pub fn new(format: F) -> Self {
        Self { format }
    }
}

impl<F: Format> SymbolSource for TreeSitterSymbols<F> {
    fn symbols(&self, document: &Document) -> Vec<Symbol> {
        extract_symbols(&document.text, &self.format).unwrap_or_else(|e| {
            log::warn!("symbol extraction failed for {}: {e}", document.uri);
            Vec::new()
        })
    }
}

#[cfg(test)]
#[path = "tests/formats.rs"]
mod tests;
