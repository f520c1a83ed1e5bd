//! Label counting and filter matching over the outline tree.
//!
//! Children are found by name, so two items sharing a name can point back at each other. Every
//! traversal here is an explicit work stack with a visited-name set: a repeated name cuts the
//! walk short instead of looping, and deep documents cannot exhaust the call stack.

use crate::label::Label;
use crate::outline::{OutlineItem, OutlineTree};
use crate::store::FilterSet;
use std::collections::{BTreeMap, HashSet};

#[must_use]
/// Counts the effective labels of every descendant of the item called `name`.
pub fn count_descendant_labels(tree: &OutlineTree, name: &str) -> BTreeMap<Label, usize> {
    let mut counts = BTreeMap::new();
    let mut visited: HashSet<&str> = HashSet::from([name]);
    let mut stack: Vec<&OutlineItem> = tree.children(name).iter().rev().collect();

    while let Some(item) = stack.pop() {
        *counts.entry(item.effective_label()).or_insert(0) += 1;
        if visited.insert(item.name.as_str()) {
            stack.extend(tree.children(&item.name).iter().rev());
        }
    }

    counts
}

#[must_use]
/// Compact `glyph+count` summary of label counts, `Normal` left out.
pub fn summarize(counts: &BTreeMap<Label, usize>) -> String {
    counts
        .iter()
        .filter(|(label, n)| !label.is_normal() && **n > 0)
        .map(|(label, n)| format!("{}{n}", label.glyph()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// True if `item` or any descendant satisfies `predicate`.
fn any_in_branch(
    tree: &OutlineTree,
    item: &OutlineItem,
    predicate: impl Fn(&OutlineItem) -> bool,
) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![item];

    while let Some(current) = stack.pop() {
        if predicate(current) {
            return true;
        }
        if visited.insert(current.name.as_str()) {
            stack.extend(tree.children(&current.name));
        }
    }

    false
}

#[must_use]
/// True if the item itself matches the filter.
///
/// Its effective label must be in the set, so a flagged item only matches `Flagged`.
pub fn item_matches_filter(item: &OutlineItem, filters: &FilterSet) -> bool {
    filters.contains(item.effective_label())
}

#[must_use]
/// True if the item or any of its descendants matches the filter, keeping ancestors visible.
pub fn branch_matches_filter(tree: &OutlineTree, item: &OutlineItem, filters: &FilterSet) -> bool {
    any_in_branch(tree, item, |i| item_matches_filter(i, filters))
}

#[must_use]
/// Number of top-level branches holding at least one item with `label`.
///
/// A branch counts once however many of its items carry the label.
pub fn count_top_level_branches_with_label(tree: &OutlineTree, label: Label) -> usize {
    tree.roots()
        .iter()
        .filter(|root| any_in_branch(tree, root, |i| i.effective_label() == label))
        .count()
}

#[must_use]
/// Every item carrying `label`, depth first from the roots, each name visited once.
pub fn items_with_label(tree: &OutlineTree, label: Label) -> Vec<&OutlineItem> {
    let mut found = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&OutlineItem> = tree.roots().iter().rev().collect();

    while let Some(item) = stack.pop() {
        if item.effective_label() == label {
            found.push(item);
        }
        if visited.insert(item.name.as_str()) {
            stack.extend(tree.children(&item.name).iter().rev());
        }
    }

    found
}

#[must_use]
/// Keeps only the items whose branch matches the filter; an empty filter keeps everything.
pub fn filter_items(tree: &OutlineTree, items: Vec<OutlineItem>, filters: &FilterSet) -> Vec<OutlineItem> {
    if filters.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| branch_matches_filter(tree, item, filters))
        .collect()
}

#[cfg(test)]
#[path = "tests/aggregate.rs"]
mod tests;
