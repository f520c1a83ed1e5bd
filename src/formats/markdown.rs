//! Markdown format implementation using tree-sitter-md.
//!
//! This module provides the tree-sitter query for ATX-style headings (# syntax) and reads the
//! level from the heading marker and the title from the heading's inline content.

use crate::formats::{Format, TreeSitterSymbols};
use tree_sitter::Node;

/// Tree-sitter queries for ATX-style markdown headings (# syntax).
pub struct MarkdownFormat;

/// Symbol source outlining Markdown headings.
pub type MarkdownSymbols = TreeSitterSymbols<MarkdownFormat>;

impl MarkdownSymbols {
    #[must_use]
    /// Symbol source for Markdown ATX headings.
    pub fn markdown() -> Self {
        Self::new(MarkdownFormat)
    }
}

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn section_query(&self) -> &'static str {
        "(atx_heading) @heading"
    }

    fn heading_level(&self, node: Node<'_>) -> Option<usize> {
        let mut walker = node.walk();
        let level = node.children(&mut walker).find_map(|child| {
            child
                .kind()
                .strip_prefix("atx_h")
                .and_then(|rest| rest.strip_suffix("_marker"))
                .and_then(|n| n.parse().ok())
        });
        level
    }

    fn heading_title(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        let content = node.child_by_field_name("heading_content").or_else(|| {
            let mut walker = node.walk();
            let inline = node.children(&mut walker).find(|c| c.kind() == "inline");
            inline
        });
        let title = content
            .and_then(|c| c.utf8_text(source).ok())
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        Some(title)
    }
}
