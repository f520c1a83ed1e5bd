//! Collaborators the outline engine talks to.
//!
//! The engine needs only four things from its surroundings: the active document's text, a
//! symbol tree for it, a way to apply a line edit, and a way to tell the view to redraw. An
//! editor integration implements [`EditorHost`] directly; [`MemoryHost`] and [`FileHost`] cover
//! tests and the command line.

use crate::edit_plan::TextEdit;
use crate::error::{OutlineError, Result};
use crate::symbol::Symbol;
use ropey::Rope;
use std::fs;
use std::path::{Path, PathBuf};
use textum::PatchSet;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Snapshot of the active document.
pub struct Document {
    /// Identifier of the document (path or editor URI).
    pub uri: String,
    /// Language identifier, used to pick acceptable comment shapes.
    pub language_id: String,
    /// Full text of the document.
    pub text: String,
}

/// Host environment of an outline session.
pub trait EditorHost {
    /// The document currently being edited, if any.
    fn active_document(&self) -> Option<Document>;

    /// Symbol tree of `document`; empty when the analysis service has nothing.
    fn resolve_symbols(&self, document: &Document) -> Vec<Symbol>;

    /// Applies `edit` to `document`.
    ///
    /// # Errors
    ///
    /// Returns an error if the edit could not be applied; the document must then be unchanged.
    fn apply_edit(&mut self, document: &Document, edit: &TextEdit) -> Result<()>;

    /// Tells the view to redraw. Fire and forget.
    fn notify_view_changed(&mut self);

    /// Line of the cursor in the active document, used to break ties between same-named symbols.
    fn cursor_line(&self) -> Option<usize> {
        None
    }
}

/// Source of symbol trees for documents.
pub trait SymbolSource {
    /// Symbol tree of `document`.
    fn symbols(&self, document: &Document) -> Vec<Symbol>;

    /// Called once `edit` has been applied, so sources holding line numbers can move them.
    fn edit_applied(&mut self, _edit: &TextEdit) {}
}

impl<F> SymbolSource for F
where
    F: Fn(&Document) -> Vec<Symbol>,
{
    fn symbols(&self, document: &Document) -> Vec<Symbol> {
        self(document)
    }
}

#[derive(Clone, Debug, Default)]
/// A fixed symbol tree, for example one read from an analysis service's JSON output.
pub struct StaticSymbols(pub Vec<Symbol>);

impl StaticSymbols {
    /// Reads a JSON array of symbols.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a symbol array.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self(serde_json::from_str(&contents)?))
    }
}

impl SymbolSource for StaticSymbols {
    fn symbols(&self, _document: &Document) -> Vec<Symbol> {
        self.0.clone()
    }

    fn edit_applied(&mut self, edit: &TextEdit) {
        let removed = edit.line_end.saturating_sub(edit.line_start);
        let inserted = edit.replacement.matches('\n').count();
        for symbol in &mut self.0 {
            symbol.shift_lines(edit.line_start, removed, inserted);
        }
    }
}

/// In-memory document with a pluggable symbol source.
pub struct MemoryHost<S> {
    document: Option<Document>,
    source: S,
    cursor: Option<usize>,
    reject_edits: bool,
    /// Number of edits applied so far.
    pub edits_applied: usize,
    /// Number of view notifications received.
    pub refreshes: usize,
}

impl<S: SymbolSource> MemoryHost<S> {
    #[must_use]
    /// Host holding one open document.
    pub fn new(uri: &str, language_id: &str, text: &str, source: S) -> Self {
        Self {
            document: Some(Document {
                uri: uri.to_string(),
                language_id: language_id.to_string(),
                text: text.to_string(),
            }),
            source,
            cursor: None,
            reject_edits: false,
            edits_applied: 0,
            refreshes: 0,
        }
    }

    #[must_use]
    /// A host with no document open.
    pub fn empty(source: S) -> Self {
        Self {
            document: None,
            source,
            cursor: None,
            reject_edits: false,
            edits_applied: 0,
            refreshes: 0,
        }
    }

    #[must_use]
    /// Current text of the open document.
    pub fn text(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.text.as_str())
    }

    /// Replaces the document text, as an external edit would.
    pub fn set_text(&mut self, text: &str) {
        if let Some(document) = self.document.as_mut() {
            document.text = text.to_string();
        }
    }

    /// Closes the document, as switching to a non-text view would.
    pub fn close(&mut self) {
        self.document = None;
    }

    /// Moves the cursor, or removes it with `None`.
    pub fn set_cursor(&mut self, line: Option<usize>) {
        self.cursor = line;
    }

    /// Makes every subsequent edit fail.
    pub fn reject_edits(&mut self, reject: bool) {
        self.reject_edits = reject;
    }
}

impl<S: SymbolSource> EditorHost for MemoryHost<S> {
    fn active_document(&self) -> Option<Document> {
        self.document.clone()
    }

    fn resolve_symbols(&self, document: &Document) -> Vec<Symbol> {
        self.source.symbols(document)
    }

    fn apply_edit(&mut self, document: &Document, edit: &TextEdit) -> Result<()> {
        if self.reject_edits {
            return Err(OutlineError::edit_rejected(
                &document.uri,
                edit.line_start,
                "document is read-only",
            ));
        }
        let Some(current) = self.document.as_mut() else {
            return Err(OutlineError::edit_rejected(
                &document.uri,
                edit.line_start,
                "no document open",
            ));
        };
        current.text = edit.apply_to(&current.text)?;
        self.source.edit_applied(edit);
        self.edits_applied += 1;
        Ok(())
    }

    fn notify_view_changed(&mut self) {
        self.refreshes += 1;
    }

    fn cursor_line(&self) -> Option<usize> {
        self.cursor
    }
}

/// Document backed by a file on disk; edits rewrite the file.
pub struct FileHost<S> {
    path: PathBuf,
    language_id: String,
    source: S,
}

impl<S: SymbolSource> FileHost<S> {
    #[must_use]
    /// Opens `path`, taking the language from `language_id` or else the file extension.
    pub fn new(path: PathBuf, language_id: Option<String>, source: S) -> Self {
        let language_id = language_id.unwrap_or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_string()
        });
        Self {
            path,
            language_id,
            source,
        }
    }

    #[must_use]
    /// File backing the document.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<S: SymbolSource> EditorHost for FileHost<S> {
    fn active_document(&self) -> Option<Document> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Some(Document {
                uri: self.path.to_string_lossy().to_string(),
                language_id: self.language_id.clone(),
                text,
            }),
            Err(e) => {
                log::warn!("cannot read {}: {e}", self.path.display());
                None
            }
        }
    }

    fn resolve_symbols(&self, document: &Document) -> Vec<Symbol> {
        self.source.symbols(document)
    }

    fn apply_edit(&mut self, document: &Document, edit: &TextEdit) -> Result<()> {
        let current = fs::read_to_string(&self.path)?;
        if current != document.text {
            return Err(OutlineError::edit_rejected(
                &document.uri,
                edit.line_start,
                "file changed on disk since it was read",
            ));
        }
        let file = self.path.to_string_lossy().to_string();
        let mut patchset = PatchSet::new();
        patchset.add(edit.to_patch(&file, &Rope::from_str(&current)));
        let results = patchset.apply_to_files()?;
        if let Some(new_content) = results.get(&file) {
            fs::write(&self.path, new_content)?;
        }
        self.source.edit_applied(edit);
        Ok(())
    }

    fn notify_view_changed(&mut self) {
        log::debug!("outline for {} changed", self.path.display());
    }
}

#[cfg(test)]
#[path = "tests/host.rs"]
mod tests;
