//! Error type shared by the outline engine, its hosts and the CLI.
//!
//! Nothing in the core is fatal: the only fallible operations are document edits issued by the
//! annotation rewriter, symbol extraction and the file/JSON handling of the binary.

use thiserror::Error;

/// Result type for outline operations
pub type Result<T> = std::result::Result<T, OutlineError>;

/// Errors surfaced by the outline engine and its collaborators
#[derive(Error, Debug)]
pub enum OutlineError {
    /// The host refused or failed to apply a text edit
    #[error("Edit rejected for {uri} at line {line}: {reason}")]
    EditRejected {
        /// Document the edit was meant for
        uri: String,
        /// First line of the edit
        line: usize,
        /// Why the host refused it
        reason: String,
    },

    /// A text edit could not be resolved against the document
    #[error("Patch error: {0}")]
    Patch(#[from] textum::PatchError),

    /// Symbol extraction failed
    #[error("Parse error: {0}")]
    Parse(String),

    /// A label token that is not one of the fixed labels
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON symbol tree could not be read
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OutlineError {
    /// Create an edit rejection
    #[must_use]
    pub fn edit_rejected(uri: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        Self::EditRejected {
            uri: uri.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Create a parse error
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
