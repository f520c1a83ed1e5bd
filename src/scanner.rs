//! Annotation scanning over raw document text.
//!
//! Instructors mark sections with comments such as `<!-- #Hidden -->` or `// #IN:Locked`. The
//! scanner finds every such marker across the four supported comment shapes, keeps those whose
//! shape is acceptable for the document's language family, and yields them lazily in document
//! order. Tokens that are not one of the fixed labels are skipped without complaint.

use crate::label::Label;
use crate::symbol::Position;
use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::sync::LazyLock;

const MARKER_PATTERN: &str = r"(?i)<!--\s*(?:IN:)?#(?:IN:)?(?P<html>\w+)\s*-->|//\s*(?:IN:)?#(?:IN:)?(?P<slash>\w+)|/\*\s*(?:IN:)?#(?:IN:)?(?P<block>\w+)\s*\*/|#\s*(?:IN:)?#(?:IN:)?(?P<hash>\w+)";

const LINE_PATTERN: &str = r"(?i)^\s*(?:<!--\s*(?:IN:)?#(?:IN:)?(?P<html>\w+)\s*-->|//\s*(?:IN:)?#(?:IN:)?(?P<slash>\w+)|/\*\s*(?:IN:)?#(?:IN:)?(?P<block>\w+)\s*\*/|#\s*(?:IN:)?#(?:IN:)?(?P<hash>\w+))\s*$";

static MARKER: LazyLock<Option<Regex>> = LazyLock::new(|| compile(MARKER_PATTERN));
static LINE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(LINE_PATTERN));

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::error!("annotation pattern failed to compile, no markers will be found: {e}");
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Comment shape wrapping an annotation marker.
pub enum CommentStyle {
    /// `<!-- #Label -->`
    Html,
    /// `// #Label`
    DoubleSlash,
    /// `/* #Label */`
    SlashStar,
    /// `# #Label`
    Hash,
}

impl CommentStyle {
    #[must_use]
    /// Annotation comment text for a label, without indentation or line break.
    pub fn annotation(self, label: Label) -> String {
        match self {
            Self::Html => format!("<!-- #{label} -->"),
            Self::DoubleSlash => format!("// #{label}"),
            Self::SlashStar => format!("/* #{label} */"),
            Self::Hash => format!("# #{label}"),
        }
    }

    #[must_use]
    /// Parses a configured style name (`html`, `slash`, `block`, `hash`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "html" => Some(Self::Html),
            "slash" | "line" => Some(Self::DoubleSlash),
            "block" => Some(Self::SlashStar),
            "hash" => Some(Self::Hash),
            _ => None,
        }
    }

    fn from_captures(caps: &Captures<'_>) -> Option<(Self, String)> {
        [
            ("html", Self::Html),
            ("slash", Self::DoubleSlash),
            ("block", Self::SlashStar),
            ("hash", Self::Hash),
        ]
        .into_iter()
        .find_map(|(group, style)| caps.name(group).map(|m| (style, m.as_str().to_string())))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Broad grouping of document languages by the comment shapes they can contain.
pub enum LanguageFamily {
    /// Markdown: HTML comments only, since `#` starts a heading.
    Markdown,
    /// HTML and XML-like documents, which may embed script and style blocks.
    Markup,
    /// C-like languages with `//` and `/* */` comments.
    CStyle,
    /// Languages commenting with `#`.
    Hash,
    /// Unknown language: every shape is accepted.
    Any,
}

impl LanguageFamily {
    #[must_use]
    /// Maps an editor language identifier or file extension to its family.
    pub fn from_language_id(language_id: &str) -> Self {
        match language_id.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Self::Markdown,
            "html" | "htm" | "xml" | "vue" | "svelte" => Self::Markup,
            "javascript" | "js" | "typescript" | "ts" | "javascriptreact" | "typescriptreact"
            | "jsx" | "tsx" | "c" | "cpp" | "csharp" | "cs" | "java" | "rust" | "rs" | "go"
            | "css" | "scss" | "less" | "kotlin" | "swift" | "php" => Self::CStyle,
            "python" | "py" | "shellscript" | "sh" | "bash" | "ruby" | "rb" | "yaml" | "yml"
            | "toml" | "perl" | "r" | "powershell" | "ps1" | "makefile" => Self::Hash,
            _ => Self::Any,
        }
    }

    #[must_use]
    /// Whether annotations in `style` are recognised in this family.
    pub fn accepts(self, style: CommentStyle) -> bool {
        match self {
            Self::Markdown => style == CommentStyle::Html,
            Self::Markup => style != CommentStyle::Hash,
            Self::CStyle => matches!(style, CommentStyle::DoubleSlash | CommentStyle::SlashStar),
            Self::Hash => style == CommentStyle::Hash,
            Self::Any => true,
        }
    }

    #[must_use]
    /// Style used when writing a new annotation into a document of this family.
    pub fn preferred_style(self) -> CommentStyle {
        match self {
            Self::Markdown | Self::Markup | Self::Any => CommentStyle::Html,
            Self::CStyle => CommentStyle::DoubleSlash,
            Self::Hash => CommentStyle::Hash,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Annotation marker found in a document.
pub struct Marker {
    /// Recognised label.
    pub label: Label,
    /// Token as written in the document.
    pub token: String,
    /// Byte offset of the start of the comment.
    pub offset: usize,
    /// Line/character position of the start of the comment.
    pub position: Position,
    /// Comment shape the marker was written in.
    pub style: CommentStyle,
}

/// Byte offsets of line starts, for offset to position conversion.
pub struct LineIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    #[must_use]
    /// Indexes the line starts of `text`.
    pub fn new(text: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, starts }
    }

    #[must_use]
    /// Line and character of byte `offset`.
    pub fn position(&self, offset: usize) -> Position {
        let line = match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.starts[line];
        let character = self
            .text
            .get(start..offset)
            .map_or(offset - start, |s| s.chars().count());
        Position::new(line, character)
    }

    #[must_use]
    /// Number of lines, counting a trailing empty one.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}

/// Lazily scans `text` for annotation markers acceptable in `family`, in document order.
///
/// If the marker pattern is unavailable the scan yields nothing.
pub fn scan(text: &str, family: LanguageFamily) -> impl Iterator<Item = Marker> + '_ {
    let index = LineIndex::new(text);
    MARKER
        .as_ref()
        .into_iter()
        .flat_map(move |regex| regex.captures_iter(text))
        .filter_map(move |caps| {
            let whole = caps.get(0)?;
            let (style, token) = CommentStyle::from_captures(&caps)?;
            if !family.accepts(style) {
                return None;
            }
            let label = Label::from_token(&token)?;
            Some(Marker {
                label,
                token,
                offset: whole.start(),
                position: index.position(whole.start()),
                style,
            })
        })
}

#[must_use]
/// Returns the comment style and token if `line` consists of nothing but an annotation.
///
/// Any token is accepted here, recognised or not: the line still has annotation shape.
pub fn bare_annotation(line: &str) -> Option<(CommentStyle, String)> {
    let caps = LINE.as_ref()?.captures(line)?;
    CommentStyle::from_captures(&caps)
}

#[must_use]
/// Lines of `text` holding only an annotation comment acceptable in `family`.
pub fn annotation_lines(text: &str, family: LanguageFamily) -> BTreeSet<usize> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| bare_annotation(line).is_some_and(|(style, _)| family.accepts(style)))
        .map(|(i, _)| i)
        .collect()
}

#[must_use]
/// True if `offset` falls between an opening `<script` tag and its closing tag.
pub fn is_inside_html_script(text: &str, offset: usize) -> bool {
    let Some(before) = text.get(..offset.min(text.len())) else {
        return false;
    };
    let lowered = before.to_ascii_lowercase();
    match (lowered.rfind("<script"), lowered.rfind("</script")) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/scanner.rs"]
mod tests;
