use super::{flatten, Symbol};

fn sample() -> Vec<Symbol> {
    vec![
        Symbol::new("Intro", 0, 9).with_children(vec![
            Symbol::new("Setup", 2, 5).with_children(vec![Symbol::new("Install", 3, 5)]),
            Symbol::new("Usage", 6, 9),
        ]),
        Symbol::new("Outro", 10, 12),
    ]
}

#[test]
fn test_flatten_is_preorder() {
    let flat = flatten(&sample());
    let names: Vec<&str> = flat.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Intro", "Setup", "Install", "Usage", "Outro"]);
}

#[test]
fn test_flatten_records_links_and_depth() {
    let flat = flatten(&sample());

    assert_eq!(flat[0].parent_index, None);
    assert_eq!(flat[0].children_indices, vec![1, 3]);
    assert_eq!(flat[1].parent_index, Some(0));
    assert_eq!(flat[1].children_indices, vec![2]);
    assert_eq!(flat[2].parent_index, Some(1));
    assert_eq!(flat[2].depth, 2);
    assert_eq!(flat[4].depth, 0);
    assert!(flat[4].children_indices.is_empty());
}

#[test]
fn test_flatten_empty_tree() {
    assert!(flatten(&[]).is_empty());
}

#[test]
fn test_symbols_deserialize_without_children() {
    let json = r#"[{"name":"A","start_line":1,"end_line":4}]"#;
    let symbols: Vec<Symbol> = serde_json::from_str(json).unwrap();
    assert_eq!(symbols, vec![Symbol::new("A", 1, 4)]);
}

#[test]
fn test_shift_lines_follows_insert_and_delete() {
    let mut intro = sample().remove(0);

    intro.shift_lines(3, 0, 1);
    assert_eq!((intro.start_line, intro.end_line), (0, 10));
    let setup = &intro.children[0];
    assert_eq!((setup.start_line, setup.end_line), (2, 6));
    assert_eq!(setup.children[0].start_line, 4);

    intro.shift_lines(3, 1, 0);
    assert_eq!(intro, sample().remove(0));
}
