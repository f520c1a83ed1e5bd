use super::{document_lines, line_terminator, EditKind, TextEdit};
use pretty_assertions::assert_eq;
use ropey::Rope;
use std::fs;
use tempfile::TempDir;
use textum::PatchSet;

#[test]
fn test_single_line_replacement() {
    let edit = TextEdit::replace_line(1, "Modified\n".to_string());
    assert_eq!(edit.kind, EditKind::Replace);
    assert_eq!(edit.apply_to("Line 1\nLine 2\nLine 3\n").unwrap(), "Line 1\nModified\nLine 3\n");
}

#[test]
fn test_insert_before_line() {
    let edit = TextEdit::insert(1, "<!-- #Hidden -->\n".to_string());
    assert_eq!(
        edit.apply_to("# A\n## B\n").unwrap(),
        "# A\n<!-- #Hidden -->\n## B\n"
    );
}

#[test]
fn test_delete_line() {
    let edit = TextEdit::delete_line(0);
    assert_eq!(edit.apply_to("A\nB\nC").unwrap(), "B\nC");
}

#[test]
fn test_delete_unterminated_last_line() {
    let edit = TextEdit::delete_line(2);
    assert_eq!(edit.apply_to("A\nB\nC").unwrap(), "A\nB\n");
}

#[test]
fn test_insert_at_end_of_unterminated_text() {
    let edit = TextEdit::insert(5, "D\n".to_string());
    assert_eq!(edit.apply_to("A\nB").unwrap(), "A\nB\nD\n");
}

#[test]
fn test_insert_before_unterminated_last_line() {
    let edit = TextEdit::insert(1, "// #Hidden\n".to_string());
    assert_eq!(edit.apply_to("A\nB").unwrap(), "A\n// #Hidden\nB");
}

#[test]
fn test_crlf_terminators_survive() {
    let edit = TextEdit::replace_line(0, "// #Locked\r\n".to_string());
    assert_eq!(edit.apply_to("// #Hidden\r\nfn a() {}\r\n").unwrap(), "// #Locked\r\nfn a() {}\r\n");
}

#[test]
fn test_patch_applies_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("doc.rs");
    let original = "fn a() {}\n// #Hidden\nfn b() {}\n";
    fs::write(&path, original).unwrap();

    let file = path.to_string_lossy().to_string();
    let edit = TextEdit::replace_line(1, "// #Locked\n".to_string());
    let mut patchset = PatchSet::new();
    patchset.add(edit.to_patch(&file, &Rope::from_str(original)));
    let results = patchset.apply_to_files().unwrap();

    assert_eq!(results[&file], "fn a() {}\n// #Locked\nfn b() {}\n");
    // The patch set only computes the new contents.
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_boundary_is_exclusive() {
    // Replacing line 1 must leave line 2 (C) untouched.
    let edit = TextEdit {
        line_start: 1,
        line_end: 2,
        replacement: "REPLACED\n".to_string(),
        kind: EditKind::Replace,
    };
    assert_eq!(edit.apply_to("A\nB\nC\nD\n").unwrap(), "A\nREPLACED\nC\nD\n");
}

#[test]
fn test_document_lines_strip_terminators() {
    assert_eq!(document_lines("a\r\nb\nc"), vec!["a", "b", "c"]);
    assert!(document_lines("").is_empty());
}

#[test]
fn test_line_terminators() {
    let text = "a\r\nb\nc";
    assert_eq!(line_terminator(text, 0), "\r\n");
    assert_eq!(line_terminator(text, 1), "\n");
    assert_eq!(line_terminator(text, 2), "");
    assert_eq!(line_terminator(text, 9), "\n");
}

#[test]
fn test_edit_serialises() {
    let edit = TextEdit::insert(3, "// #Locked\n".to_string());
    let json = serde_json::to_string(&edit).unwrap();
    let back: TextEdit = serde_json::from_str(&json).unwrap();
    assert_eq!(back, edit);
}
