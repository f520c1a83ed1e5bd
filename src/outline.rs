//! The labelled outline tree and the builder that derives it from a document.
//!
//! Items are stored flat: top-level items in `roots`, every other item in a parent-name to
//! children map. Looking children up by name keeps mutation simple (placeholders and bundled
//! sections are spliced in by naming their parent) at the price of merging the children of
//! same-named items, which is why every traversal over the tree guards against revisiting names.

use crate::aggregate::{count_descendant_labels, count_top_level_branches_with_label, summarize};
use crate::label::Label;
use crate::resolver::PlaceholderEntry;
use crate::store::{FilterSet, FlagStore, LabelStore, StoreKey};
use crate::symbol::{FlatSymbol, Range};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Name of the virtual grouping node listing one row per label.
pub const LABELS_GROUP: &str = "Labels";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
/// Expansion state of an item in a tree view.
pub enum Collapse {
    #[default]
    /// Leaf item.
    None,
    /// Has hidden children.
    Collapsed,
    /// Has visible children.
    Expanded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
/// Origin of an outline item.
pub enum ItemKind {
    /// Real symbol from the analysis service.
    Symbol,
    /// Annotation with no following symbol.
    Placeholder,
    /// User-made grouping entry.
    Bundled,
    /// Entry created for a flag.
    Flag,
    /// Virtual node grouping the label rows.
    LabelsGroup,
    /// One row of the labels group.
    LabelRow,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
/// Presentation node of the instructor outline.
pub struct OutlineItem {
    /// Display name; not unique.
    pub name: String,
    /// Where the item came from.
    pub kind: ItemKind,
    /// Stored label; see [`OutlineItem::effective_label`] for what is displayed.
    pub label: Label,
    /// Document span, when the item maps to one.
    pub range: Option<Range>,
    /// Flag raised on the section, if any.
    pub flag: Option<crate::store::Flag>,
    /// Expansion state.
    pub collapse: Collapse,
    /// Text shown next to the name.
    pub description: Option<String>,
}

impl OutlineItem {
    #[must_use]
    /// Leaf item with no range, flag or description.
    pub fn new(name: impl Into<String>, kind: ItemKind, label: Label) -> Self {
        Self {
            name: name.into(),
            kind,
            label,
            range: None,
            flag: None,
            collapse: Collapse::None,
            description: None,
        }
    }

    #[must_use]
    /// Sets the document span.
    pub fn with_range(mut self, range: Option<Range>) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    /// Sets the flag.
    pub fn with_flag(mut self, flag: Option<crate::store::Flag>) -> Self {
        self.flag = flag;
        self
    }

    #[must_use]
    /// Label shown and filtered on: a flag always reads as `Flagged`.
    pub fn effective_label(&self) -> Label {
        if self.flag.is_some() {
            Label::Flagged
        } else {
            self.label
        }
    }

    #[must_use]
    /// First line of the span, if any.
    pub fn start_line(&self) -> Option<usize> {
        self.range.map(|r| r.start.line)
    }

    #[must_use]
    /// Whether the item has children to show.
    pub fn is_collapsible(&self) -> bool {
        self.collapse != Collapse::None
    }

    fn same_entry(&self, other: &OutlineItem) -> bool {
        self.name == other.name
            && self.start_line().is_some()
            && self.start_line() == other.start_line()
    }

    /// Sets the description from the item's own state plus a descendant label summary.
    pub fn describe(&mut self, tree: &OutlineTree) {
        let mut description = match (&self.flag, self.label) {
            (Some(flag), _) => format!("{} Flagged: {}", Label::Flagged.glyph(), flag.name),
            (None, Label::Normal) => String::new(),
            (None, label) => format!("{} {label}", label.glyph()),
        };
        if self.flag.is_none() && self.is_collapsible() {
            let summary = summarize(&count_descendant_labels(tree, &self.name));
            if !summary.is_empty() {
                if !description.is_empty() {
                    description.push(' ');
                }
                description.push_str(&summary);
            }
        }
        self.description = (!description.is_empty()).then_some(description);
    }
}

#[derive(Clone, Debug, Default)]
/// Derived outline: document roots plus a parent-name to children map.
pub struct OutlineTree {
    roots: Vec<OutlineItem>,
    children: HashMap<String, Vec<OutlineItem>>,
    /// Parent name of each nested item, keyed by the item's name and start line.
    parents: BTreeMap<(String, Option<usize>), String>,
}

impl OutlineTree {
    #[must_use]
    /// Top-level document items: symbols and orphan placeholders, in document order.
    pub fn roots(&self) -> &[OutlineItem] {
        &self.roots
    }

    #[must_use]
    /// Children attached under the name `name`.
    pub fn children(&self, name: &str) -> &[OutlineItem] {
        self.children.get(name).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    /// Name of the item `item` is attached under.
    ///
    /// Matched on name and start line, so same-named items keep their own parents. An item with
    /// no exact entry falls back to the earliest nested item of that name.
    pub fn parent_of(&self, item: &OutlineItem) -> Option<&str> {
        self.parents
            .get(&(item.name.clone(), item.start_line()))
            .or_else(|| self.parents_named(&item.name).next())
            .map(String::as_str)
    }

    fn parents_named<'a, 'b>(&'a self, name: &'b str) -> impl Iterator<Item = &'a String> + use<'a, 'b> {
        self.parents
            .range((name.to_string(), None)..)
            .take_while(move |((n, _), _)| n == name)
            .map(|(_, parent)| parent)
    }

    #[must_use]
    /// First item called `name`, searching roots before nested items.
    pub fn find(&self, name: &str) -> Option<&OutlineItem> {
        self.roots
            .iter()
            .find(|i| i.name == name)
            .or_else(|| self.children.values().flatten().find(|i| i.name == name))
    }

    #[must_use]
    /// Whether the tree holds no items at all.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.children.is_empty()
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.roots.clear();
        self.children.clear();
        self.parents.clear();
    }

    /// Attaches `item` under `parent`, or at the top level when there is none.
    pub fn push(&mut self, parent: Option<&str>, item: OutlineItem) {
        match parent {
            Some(parent) => {
                self.parents
                    .entry((item.name.clone(), item.start_line()))
                    .or_insert_with(|| parent.to_string());
                self.children.entry(parent.to_string()).or_default().push(item);
            }
            None => self.roots.push(item),
        }
    }

    /// Inserts an orphan among the roots before the first item starting below it.
    fn insert_root_in_line_order(&mut self, item: OutlineItem) {
        if self.roots.iter().any(|r| r.same_entry(&item)) {
            return;
        }
        let line = item.start_line().unwrap_or(usize::MAX);
        let at = self
            .roots
            .iter()
            .position(|r| r.start_line().is_some_and(|l| l > line))
            .unwrap_or(self.roots.len());
        self.roots.insert(at, item);
    }

    fn attach_placeholder(&mut self, parent: &str, item: OutlineItem) {
        let siblings = self.children.entry(parent.to_string()).or_default();
        if siblings.iter().any(|c| c.same_entry(&item)) {
            return;
        }
        self.parents
            .entry((item.name.clone(), item.start_line()))
            .or_insert_with(|| parent.to_string());
        siblings.push(item);
    }

    fn has_name(&self, name: &str) -> bool {
        self.roots.iter().any(|i| i.name == name) || self.parents_named(name).next().is_some()
    }

    /// Marks every item with children as collapsible and refreshes descriptions.
    fn finish(&mut self) {
        let parents: BTreeSet<String> = self
            .children
            .iter()
            .filter(|(_, c)| !c.is_empty())
            .map(|(name, _)| name.clone())
            .collect();

        for item in self.roots.iter_mut().chain(self.children.values_mut().flatten()) {
            if item.collapse == Collapse::None && parents.contains(&item.name) {
                item.collapse = Collapse::Collapsed;
            }
        }

        let snapshot = self.clone();
        for item in self.roots.iter_mut().chain(self.children.values_mut().flatten()) {
            item.describe(&snapshot);
        }
    }
}

/// Inputs to one outline build.
pub struct BuildContext<'a> {
    /// Flattened symbols in pre-order.
    pub symbols: &'a [FlatSymbol],
    /// Annotations with no following symbol.
    pub placeholders: &'a [PlaceholderEntry],
    /// Labels by symbol, placeholder and name.
    pub labels: &'a LabelStore,
    /// Flags raised this session.
    pub flags: &'a FlagStore,
    /// Lines holding nothing but an annotation comment.
    pub annotation_lines: &'a BTreeSet<usize>,
    /// Display prefix of placeholder items.
    pub placeholder_prefix: &'a str,
}

#[must_use]
/// Builds the outline tree from a flattened symbol list and the session stores.
///
/// A symbol starting on a bare annotation line is dropped (its children move up to its nearest
/// kept ancestor) so the annotation itself never shows as an entry. Placeholders hang under their
/// resolved parent or sit among the roots in line order, never twice for the same name and line.
pub fn build(ctx: &BuildContext<'_>) -> OutlineTree {
    let mut tree = OutlineTree::default();
    // Nearest kept ancestor for each flat index, as a name.
    let mut kept_name: Vec<Option<String>> = Vec::with_capacity(ctx.symbols.len());

    for symbol in ctx.symbols {
        let parent = symbol
            .parent_index
            .and_then(|p| kept_name.get(p).cloned().flatten());

        if ctx.annotation_lines.contains(&symbol.start_line) {
            kept_name.push(parent);
            continue;
        }

        let item = OutlineItem::new(
            &symbol.name,
            ItemKind::Symbol,
            ctx.labels.symbol_label(&symbol.key()),
        )
        .with_range(Some(symbol.range()))
        .with_flag(ctx.flags.for_section(&symbol.name).cloned());

        tree.push(parent.as_deref(), item);
        kept_name.push(Some(symbol.name.clone()));
    }

    for entry in ctx.placeholders {
        let name = format!("{}{}", ctx.placeholder_prefix, entry.key.token);
        let label = ctx
            .labels
            .name_label(&name)
            .unwrap_or_else(|| match ctx.labels.label(&StoreKey::Placeholder(entry.key.clone())) {
                Label::Normal => entry.label,
                stored => stored,
            });
        let item = OutlineItem::new(&name, ItemKind::Placeholder, label).with_range(Some(entry.range));

        match entry.parent_name.as_deref() {
            Some(parent) if tree.has_name(parent) => tree.attach_placeholder(parent, item),
            _ => tree.insert_root_in_line_order(item),
        }
    }

    tree.finish();
    tree
}

#[must_use]
/// Virtual labels group and its rows, counted over the tree's top-level branches.
///
/// Each row reads `☑ Label (n)` or `☐ Label (n)` depending on the filter; the group lists only
/// labels present in at least one branch.
pub fn labels_group(tree: &OutlineTree, filters: &FilterSet) -> (OutlineItem, Vec<OutlineItem>) {
    let check = |on: bool| if on { "☑" } else { "☐" };

    let counts: Vec<(Label, usize)> = Label::ANNOTATED
        .into_iter()
        .map(|l| (l, count_top_level_branches_with_label(tree, l)))
        .collect();

    let rows = counts
        .iter()
        .map(|&(label, count)| {
            let mut row = OutlineItem::new(label.as_str(), ItemKind::LabelRow, label);
            row.description = Some(format!("{} {label} ({count})", check(filters.contains(label))));
            row
        })
        .collect();

    let parts: Vec<String> = counts
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(label, n)| format!("{}{n}", label.glyph()))
        .collect();
    let mut group = OutlineItem::new(LABELS_GROUP, ItemKind::LabelsGroup, Label::Normal);
    group.collapse = Collapse::Collapsed;
    group.description = Some(format!("{} {}", check(!filters.is_empty()), parts.join(", ")));

    (group, rows)
}

#[cfg(test)]
#[path = "tests/outline.rs"]
mod tests;
