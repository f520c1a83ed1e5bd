//! Instructor labels attached to outline entries.
//!
//! The set is closed. `Normal` is the implicit default and never appears as an annotation;
//! the other six are recognised in annotation comments, case-insensitively.

use crate::error::OutlineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Instructor state of a section.
pub enum Label {
    #[default]
    /// No instructor state.
    Normal,
    /// Hidden from students.
    Hidden,
    /// Visible but not editable.
    Locked,
    /// Withheld entirely.
    Blocked,
    /// Subject to instructor rules.
    Governed,
    /// Grouped as a section of an exercise.
    Sectioned,
    /// Marked for attention, usually through a flag.
    Flagged,
}

impl Label {
    /// Every label that can appear in an annotation, in display order.
    pub const ANNOTATED: [Label; 6] = [
        Label::Hidden,
        Label::Locked,
        Label::Blocked,
        Label::Governed,
        Label::Sectioned,
        Label::Flagged,
    ];

    #[must_use]
    /// Parses an annotation token. Unknown tokens and `Normal` yield `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "hidden" => Some(Self::Hidden),
            "locked" => Some(Self::Locked),
            "blocked" => Some(Self::Blocked),
            "governed" => Some(Self::Governed),
            "sectioned" => Some(Self::Sectioned),
            "flagged" => Some(Self::Flagged),
            _ => None,
        }
    }

    #[must_use]
    /// Display name of the label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Hidden => "Hidden",
            Self::Locked => "Locked",
            Self::Blocked => "Blocked",
            Self::Governed => "Governed",
            Self::Sectioned => "Sectioned",
            Self::Flagged => "Flagged",
        }
    }

    #[must_use]
    /// Short glyph used in compact count summaries.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::Hidden => "🙈",
            Self::Locked => "🔒",
            Self::Blocked => "🚫",
            Self::Governed => "📜",
            Self::Sectioned => "📁",
            Self::Flagged => "🚩",
        }
    }

    #[must_use]
    /// Whether this is the default `Normal` label.
    pub fn is_normal(self) -> bool {
        self == Self::Normal
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = OutlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("normal") {
            return Ok(Self::Normal);
        }
        Self::from_token(s).ok_or_else(|| OutlineError::UnknownLabel(s.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/label.rs"]
mod tests;
