use super::{owning_symbol, placeholder_parent, resolve};
use crate::label::Label;
use crate::scanner::{scan, LanguageFamily};
use crate::symbol::{flatten, Symbol, SymbolKey};

fn flat(symbols: &[Symbol]) -> Vec<crate::symbol::FlatSymbol> {
    flatten(symbols)
}

#[test]
fn test_marker_attaches_to_nearest_following_symbol() {
    let symbols = flat(&[
        Symbol::new("ten", 10, 12),
        Symbol::new("twenty", 20, 22),
        Symbol::new("thirty", 30, 32),
    ]);
    let owner = owning_symbol(&symbols, 15).unwrap();
    assert_eq!(symbols[owner].name, "twenty");
}

#[test]
fn test_marker_on_symbol_line_attaches_to_it() {
    let symbols = flat(&[Symbol::new("a", 3, 8), Symbol::new("b", 9, 12)]);
    assert_eq!(owning_symbol(&symbols, 3), Some(0));
}

#[test]
fn test_tie_prefers_shallower_symbol() {
    // An unrelated nested symbol appears first in flattened order but the top-level one wins.
    let symbols = flat(&[
        Symbol::new("outer", 0, 10).with_children(vec![Symbol::new("inner", 5, 6)]),
        Symbol::new("top", 5, 9),
    ]);
    let owner = owning_symbol(&symbols, 4).unwrap();
    assert_eq!(symbols[owner].name, "top");
}

#[test]
fn test_tie_between_parent_and_first_child() {
    let symbols = flat(&[Symbol::new("section", 2, 9).with_children(vec![Symbol::new("child", 2, 4)])]);
    let owner = owning_symbol(&symbols, 1).unwrap();
    assert_eq!(symbols[owner].name, "section");
}

#[test]
fn test_placeholder_parent_prefers_enclosing_symbol() {
    let symbols = flat(&[Symbol::new("a", 0, 3), Symbol::new("b", 4, 20)]);
    assert_eq!(placeholder_parent(&symbols, 5), Some(1));
}

#[test]
fn test_placeholder_parent_falls_back_to_preceding_symbol() {
    let symbols = flat(&[Symbol::new("a", 0, 1), Symbol::new("b", 2, 3)]);
    assert_eq!(placeholder_parent(&symbols, 7), Some(1));
}

#[test]
fn test_orphan_placeholder_without_symbols() {
    let text = "\n\n\n\n\n<!-- #Hidden -->\n";
    let resolution = resolve(scan(text, LanguageFamily::Any), &[]);

    assert!(resolution.assignments.is_empty());
    assert_eq!(resolution.placeholders.len(), 1);
    let placeholder = &resolution.placeholders[0];
    assert_eq!(placeholder.key.line, 5);
    assert_eq!(placeholder.key.token, "Hidden");
    assert_eq!(placeholder.label, Label::Hidden);
    assert_eq!(placeholder.parent_name, None);
    assert_eq!(placeholder.range.start, placeholder.range.end);
}

#[test]
fn test_resolve_mixes_assignments_and_placeholders() {
    let text = "// #Locked\nfn main() {\n}\n// #Blocked\n";
    let symbols = flat(&[Symbol::new("main", 1, 2)]);
    let resolution = resolve(scan(text, LanguageFamily::CStyle), &symbols);

    assert_eq!(resolution.assignments.len(), 1);
    assert_eq!(resolution.assignments[0].key, SymbolKey::new("main", 1));
    assert_eq!(resolution.assignments[0].label, Label::Locked);

    assert_eq!(resolution.placeholders.len(), 1);
    assert_eq!(resolution.placeholders[0].parent_name.as_deref(), Some("main"));
    assert_eq!(resolution.placeholders[0].label, Label::Blocked);
}
