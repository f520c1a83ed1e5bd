use super::{
    branch_matches_filter, count_descendant_labels, count_top_level_branches_with_label,
    filter_items, items_with_label, summarize,
};
use crate::label::Label;
use crate::outline::{ItemKind, OutlineItem, OutlineTree};
use crate::store::{FilterSet, Flag};

fn item(name: &str, label: Label) -> OutlineItem {
    OutlineItem::new(name, ItemKind::Symbol, label)
}

fn filter(labels: &[Label]) -> FilterSet {
    let mut filters = FilterSet::default();
    filters.set(labels.iter().copied());
    filters
}

/// root -> a -> b -> c, all three nested items Hidden; other -> x (Normal).
fn nested_hidden() -> OutlineTree {
    let mut tree = OutlineTree::default();
    tree.push(None, item("root", Label::Normal));
    tree.push(Some("root"), item("a", Label::Hidden));
    tree.push(Some("a"), item("b", Label::Hidden));
    tree.push(Some("b"), item("c", Label::Hidden));
    tree.push(None, item("other", Label::Normal));
    tree.push(Some("other"), item("x", Label::Normal));
    tree
}

#[test]
fn test_branch_counting_not_occurrence_counting() {
    let tree = nested_hidden();
    assert_eq!(count_top_level_branches_with_label(&tree, Label::Hidden), 1);
    assert_eq!(count_top_level_branches_with_label(&tree, Label::Locked), 0);
}

#[test]
fn test_count_descendant_labels() {
    let tree = nested_hidden();
    let counts = count_descendant_labels(&tree, "root");
    assert_eq!(counts.get(&Label::Hidden), Some(&3));
    assert_eq!(counts.get(&Label::Normal), None);
    assert_eq!(summarize(&counts), "🙈3");
}

#[test]
fn test_summary_excludes_normal() {
    let tree = nested_hidden();
    let counts = count_descendant_labels(&tree, "other");
    assert_eq!(counts.get(&Label::Normal), Some(&1));
    assert_eq!(summarize(&counts), "");
}

#[test]
fn test_cycle_by_name_collision_terminates() {
    let mut tree = OutlineTree::default();
    tree.push(None, item("A", Label::Hidden));
    tree.push(Some("A"), item("B", Label::Locked));
    tree.push(Some("B"), item("A", Label::Hidden));

    let counts = count_descendant_labels(&tree, "A");
    assert_eq!(counts.get(&Label::Locked), Some(&1));
    assert_eq!(counts.get(&Label::Hidden), Some(&1));

    let root = tree.roots()[0].clone();
    assert!(!branch_matches_filter(&tree, &root, &filter(&[Label::Blocked])));
    assert_eq!(count_top_level_branches_with_label(&tree, Label::Locked), 1);
    assert_eq!(items_with_label(&tree, Label::Hidden).len(), 2);
}

#[test]
fn test_filter_preserves_ancestors() {
    let mut tree = OutlineTree::default();
    tree.push(None, item("keep", Label::Normal));
    tree.push(Some("keep"), item("mid", Label::Normal));
    tree.push(Some("mid"), item("deep", Label::Blocked));
    tree.push(None, item("drop", Label::Normal));
    tree.push(Some("drop"), item("leaf", Label::Hidden));

    let filters = filter(&[Label::Blocked]);
    let kept = filter_items(&tree, tree.roots().to_vec(), &filters);
    let names: Vec<&str> = kept.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["keep"]);
}

#[test]
fn test_empty_filter_keeps_everything() {
    let tree = nested_hidden();
    let kept = filter_items(&tree, tree.roots().to_vec(), &FilterSet::default());
    assert_eq!(kept.len(), 2);
}

#[test]
fn test_flag_takes_precedence() {
    let mut tree = OutlineTree::default();
    let flagged = item("intro", Label::Hidden).with_flag(Some(Flag {
        section: "intro".into(),
        name: "check".into(),
        color: "#FF9800".into(),
        purpose: None,
    }));
    assert_eq!(flagged.effective_label(), Label::Flagged);
    tree.push(None, flagged.clone());

    assert!(branch_matches_filter(&tree, &flagged, &filter(&[Label::Flagged])));
    assert!(!branch_matches_filter(&tree, &flagged, &filter(&[Label::Hidden])));
    assert_eq!(count_top_level_branches_with_label(&tree, Label::Flagged), 1);
    assert_eq!(count_top_level_branches_with_label(&tree, Label::Hidden), 0);
    assert_eq!(items_with_label(&tree, Label::Flagged).len(), 1);
    assert!(filter_items(&tree, tree.roots().to_vec(), &filter(&[Label::Hidden])).is_empty());
}

#[test]
fn test_items_with_label_in_document_order() {
    let mut tree = OutlineTree::default();
    tree.push(None, item("one", Label::Locked));
    tree.push(Some("one"), item("one.a", Label::Locked));
    tree.push(None, item("two", Label::Locked));

    let names: Vec<&str> = items_with_label(&tree, Label::Locked)
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(names, ["one", "one.a", "two"]);
}
