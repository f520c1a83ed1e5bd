//! Configuration to acknowledge instructor preferences as well as set defaults.
//!
//! Specifically, we try to find an instructor-outline.toml, and if present we load settings from
//! there. This provides the annotation lookback window, the comment style used when writing
//! annotations, and the display prefix of placeholder entries.

use crate::rewriter::DEFAULT_LOOKBACK;
use crate::scanner::{is_inside_html_script, CommentStyle, LanguageFamily};
use facet::Facet;
use std::fs;
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "instructor-outline.toml";

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from instructor-outline.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 8)]
    /// Lines scanned above a symbol when looking for its annotation.
    pub max_lookback: usize,
    #[facet(default = "auto".to_string())]
    /// Comment style for new annotations: `auto`, `html`, `slash`, `block` or `hash`.
    pub annotation_style: String,
    #[facet(default = "Commented: ".to_string())]
    /// Display prefix of entries for annotations with no following symbol.
    pub placeholder_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_lookback: DEFAULT_LOOKBACK,
            annotation_style: "auto".to_string(),
            placeholder_prefix: "Commented: ".to_string(),
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from instructor-outline.toml if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from `path`, falling back to defaults if it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        Self::parse(&contents).unwrap_or_else(|| {
            log::warn!("ignoring invalid configuration in {}", path.display());
            Self::default()
        })
    }

    #[must_use]
    /// Parses TOML configuration, `None` when it is malformed.
    pub fn parse(contents: &str) -> Option<Self> {
        facet_toml::from_str::<Self>(contents).ok()
    }

    #[must_use]
    /// Comment style for a new annotation at byte `offset` of a document in `family`.
    ///
    /// An explicit style always wins. Under `auto`, HTML documents switch to `//` inside script
    /// blocks and other documents use their family's preferred shape.
    pub fn comment_style(&self, family: LanguageFamily, text: &str, offset: usize) -> CommentStyle {
        if let Some(style) = CommentStyle::from_name(&self.annotation_style) {
            return style;
        }
        if family == LanguageFamily::Markup && is_inside_html_script(text, offset) {
            return CommentStyle::DoubleSlash;
        }
        family.preferred_style()
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
