//! Plain-text and JSON renderings of an outline session.
//!
//! The session is walked through the same root/children queries a tree view would use, so what
//! is printed is exactly what a view would show, filters included.

use crate::host::EditorHost;
use crate::outline::OutlineItem;
use crate::session::OutlineSession;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Clone, Debug, Serialize)]
/// One visible item with its visible children.
pub struct OutlineNode {
    /// The item as the session reports it.
    #[serde(flatten)]
    pub item: OutlineItem,
    /// Visible children, empty for leaves and collapsed repeats.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}

#[derive(Clone, Debug, Serialize)]
/// Everything a view would display at one moment.
pub struct Snapshot {
    /// Outline title, marking an active filter.
    pub title: String,
    /// Top-level rows.
    pub items: Vec<OutlineNode>,
}

#[must_use]
/// Expands every collapsible item of the session into a snapshot.
pub fn snapshot<H: EditorHost>(session: &OutlineSession<H>) -> Snapshot {
    let mut path = HashSet::new();
    let items = session
        .get_root_items()
        .into_iter()
        .map(|item| expand(session, item, &mut path))
        .collect();
    Snapshot {
        title: session.title().to_string(),
        items,
    }
}

fn expand<H: EditorHost>(
    session: &OutlineSession<H>,
    item: OutlineItem,
    path: &mut HashSet<String>,
) -> OutlineNode {
    // A name already on the path would expand into itself.
    if !item.is_collapsible() || !path.insert(item.name.clone()) {
        return OutlineNode {
            item,
            children: Vec::new(),
        };
    }
    let children = session
        .get_children(&item)
        .into_iter()
        .map(|child| expand(session, child, path))
        .collect();
    path.remove(&item.name);
    OutlineNode { item, children }
}

fn tree_prefix(level: usize, is_last: bool, open_levels: &[bool]) -> String {
    if level == 0 {
        return String::new();
    }

    let mut prefix = String::new();
    for open in open_levels.iter().take(level - 1) {
        prefix.push_str(if *open { "│   " } else { "    " });
    }
    prefix.push_str(if is_last { "└── " } else { "├── " });
    prefix
}

#[must_use]
/// Renders a snapshot as an indented box-drawing tree under its title.
pub fn render_text(snapshot: &Snapshot) -> String {
    let mut out = format!("{}\n", snapshot.title);
    let mut open_levels = Vec::new();
    for node in &snapshot.items {
        write_node(&mut out, node, 0, true, &mut open_levels);
    }
    out
}

fn write_node(out: &mut String, node: &OutlineNode, level: usize, is_last: bool, open_levels: &mut Vec<bool>) {
    let item = &node.item;
    out.push_str(&tree_prefix(level, is_last, open_levels));
    out.push_str(&item.name);
    if let Some(description) = &item.description {
        out.push_str("  ");
        out.push_str(description);
    }
    out.push('\n');

    if level > 0 {
        open_levels.push(!is_last);
    }
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        write_node(out, child, level + 1, i + 1 == count, open_levels);
    }
    if level > 0 {
        open_levels.pop();
    }
}

#[cfg(test)]
#[path = "tests/render.rs"]
mod tests;
