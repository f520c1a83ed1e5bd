use super::{build, labels_group, BuildContext, Collapse, ItemKind, OutlineTree};
use crate::label::Label;
use crate::resolver::{PlaceholderEntry, PlaceholderKey};
use crate::store::{FilterSet, Flag, FlagStore, LabelStore, StoreKey};
use crate::symbol::{flatten, FlatSymbol, Position, Range, Symbol, SymbolKey};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn placeholder(line: usize, token: &str, label: Label, parent: Option<&str>) -> PlaceholderEntry {
    PlaceholderEntry {
        key: PlaceholderKey {
            line,
            token: token.to_string(),
        },
        range: Range::point(Position::new(line, 0)),
        label,
        parent_name: parent.map(str::to_string),
    }
}

struct Fixture {
    symbols: Vec<FlatSymbol>,
    placeholders: Vec<PlaceholderEntry>,
    labels: LabelStore,
    flags: FlagStore,
    annotation_lines: BTreeSet<usize>,
}

impl Fixture {
    fn new(symbols: &[Symbol]) -> Self {
        Self {
            symbols: flatten(symbols),
            placeholders: Vec::new(),
            labels: LabelStore::default(),
            flags: FlagStore::default(),
            annotation_lines: BTreeSet::new(),
        }
    }

    fn build(&self) -> OutlineTree {
        build(&BuildContext {
            symbols: &self.symbols,
            placeholders: &self.placeholders,
            labels: &self.labels,
            flags: &self.flags,
            annotation_lines: &self.annotation_lines,
            placeholder_prefix: "Commented: ",
        })
    }
}

fn names(items: &[super::OutlineItem]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

#[test]
fn test_symbols_nest_and_carry_labels() {
    let mut fixture = Fixture::new(&[
        Symbol::new("intro", 1, 10).with_children(vec![Symbol::new("setup", 3, 6)]),
        Symbol::new("outro", 12, 15),
    ]);
    fixture
        .labels
        .set_label(StoreKey::Symbol(SymbolKey::new("setup", 3)), Label::Hidden);
    let tree = fixture.build();

    assert_eq!(names(tree.roots()), ["intro", "outro"]);
    assert_eq!(names(tree.children("intro")), ["setup"]);
    assert_eq!(tree.children("intro")[0].label, Label::Hidden);
    assert_eq!(tree.parent_of(&tree.children("intro")[0]), Some("intro"));

    let intro = &tree.roots()[0];
    assert_eq!(intro.collapse, Collapse::Collapsed);
    assert_eq!(intro.description.as_deref(), Some("🙈1"));
    assert_eq!(tree.roots()[1].collapse, Collapse::None);
}

#[test]
fn test_name_label_applies_without_keyed_entry() {
    let mut fixture = Fixture::new(&[Symbol::new("intro", 0, 4)]);
    fixture
        .labels
        .set_label(StoreKey::Name("intro".to_string()), Label::Locked);
    let tree = fixture.build();
    assert_eq!(tree.roots()[0].label, Label::Locked);
    assert_eq!(tree.roots()[0].description.as_deref(), Some("🔒 Locked"));
}

#[test]
fn test_placeholder_attaches_under_parent_once() {
    let mut fixture = Fixture::new(&[Symbol::new("body", 0, 20)]);
    fixture.placeholders = vec![
        placeholder(18, "Hidden", Label::Hidden, Some("body")),
        placeholder(18, "Hidden", Label::Hidden, Some("body")),
    ];
    let tree = fixture.build();

    assert_eq!(names(tree.children("body")), ["Commented: Hidden"]);
    let entry = &tree.children("body")[0];
    assert_eq!(entry.kind, ItemKind::Placeholder);
    assert_eq!(entry.label, Label::Hidden);
    assert_eq!(entry.start_line(), Some(18));
}

#[test]
fn test_orphan_placeholder_sits_in_line_order() {
    let mut fixture = Fixture::new(&[Symbol::new("first", 0, 2), Symbol::new("second", 10, 12)]);
    fixture.placeholders = vec![placeholder(5, "Locked", Label::Locked, Some("missing"))];
    let tree = fixture.build();
    assert_eq!(names(tree.roots()), ["first", "Commented: Locked", "second"]);
}

#[test]
fn test_placeholder_name_label_overrides_marker() {
    let mut fixture = Fixture::new(&[]);
    fixture.placeholders = vec![placeholder(3, "Hidden", Label::Hidden, None)];
    fixture
        .labels
        .set_label(StoreKey::Name("Commented: Hidden".to_string()), Label::Blocked);
    let tree = fixture.build();
    assert_eq!(tree.roots()[0].label, Label::Blocked);
}

#[test]
fn test_symbol_on_annotation_line_is_skipped_and_children_hoisted() {
    let mut fixture = Fixture::new(&[Symbol::new("chapter", 0, 20).with_children(vec![
        Symbol::new("<!-- #Hidden -->", 4, 12)
            .with_children(vec![Symbol::new("nested", 6, 8)]),
        Symbol::new("tail", 14, 18),
    ])]);
    fixture.annotation_lines.insert(4);
    let tree = fixture.build();

    assert_eq!(names(tree.children("chapter")), ["nested", "tail"]);
    assert!(tree.find("<!-- #Hidden -->").is_none());
    assert_eq!(tree.parent_of(&tree.children("chapter")[0]), Some("chapter"));
}

#[test]
fn test_flag_attaches_to_section_and_wins_display() {
    let mut fixture = Fixture::new(&[Symbol::new("intro", 0, 4)]);
    fixture
        .labels
        .set_label(StoreKey::Symbol(SymbolKey::new("intro", 0)), Label::Hidden);
    fixture.flags.set_flag(Flag {
        section: "intro".to_string(),
        name: "review".to_string(),
        color: "#FF9800".to_string(),
        purpose: None,
    });
    let tree = fixture.build();

    let intro = &tree.roots()[0];
    assert_eq!(intro.label, Label::Hidden);
    assert_eq!(intro.effective_label(), Label::Flagged);
    assert_eq!(intro.description.as_deref(), Some("🚩 Flagged: review"));
}

#[test]
fn test_labels_group_counts_branches() {
    let mut fixture = Fixture::new(&[
        Symbol::new("a", 0, 10).with_children(vec![
            Symbol::new("a1", 2, 4),
            Symbol::new("a2", 5, 8),
        ]),
        Symbol::new("b", 11, 20),
    ]);
    for (name, line) in [("a1", 2), ("a2", 5), ("b", 11)] {
        fixture
            .labels
            .set_label(StoreKey::Symbol(SymbolKey::new(name, line)), Label::Hidden);
    }
    let tree = fixture.build();

    let (group, rows) = labels_group(&tree, &FilterSet::default());
    assert_eq!(group.kind, ItemKind::LabelsGroup);
    assert_eq!(group.description.as_deref(), Some("☐ 🙈2"));
    assert_eq!(rows.len(), Label::ANNOTATED.len());
    assert_eq!(rows[0].description.as_deref(), Some("☐ Hidden (2)"));
    assert_eq!(rows[1].description.as_deref(), Some("☐ Locked (0)"));
}

#[test]
fn test_labels_group_reflects_filter() {
    let tree = Fixture::new(&[Symbol::new("a", 0, 1)]).build();
    let mut filters = FilterSet::default();
    filters.set([Label::Locked]);

    let (group, rows) = labels_group(&tree, &filters);
    assert_eq!(group.description.as_deref(), Some("☑ "));
    let locked = rows.iter().find(|r| r.label == Label::Locked).unwrap();
    assert_eq!(locked.description.as_deref(), Some("☑ Locked (0)"));
}

#[test]
fn test_empty_document_builds_empty_tree() {
    let tree = Fixture::new(&[]).build();
    assert!(tree.is_empty());
}

#[test]
fn test_same_named_placeholders_keep_their_own_parents() {
    let mut fixture = Fixture::new(&[Symbol::new("alpha", 0, 5), Symbol::new("beta", 6, 10)]);
    fixture.placeholders = vec![
        placeholder(4, "Hidden", Label::Hidden, Some("alpha")),
        placeholder(9, "Hidden", Label::Hidden, Some("beta")),
    ];
    let tree = fixture.build();

    let under_alpha = &tree.children("alpha")[0];
    let under_beta = &tree.children("beta")[0];
    assert_eq!(under_alpha.name, under_beta.name);
    assert_eq!(tree.parent_of(under_alpha), Some("alpha"));
    assert_eq!(tree.parent_of(under_beta), Some("beta"));
}
