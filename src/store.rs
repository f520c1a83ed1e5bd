//! Session state that outlives outline rebuilds.
//!
//! Labels are keyed by symbol identity, by synthetic placeholder identity, or by bare name when
//! no range is known. Symbol and placeholder entries are derived from the document and are
//! re-derived on every rebuild; name entries, flags, bundled sections and filters belong to the
//! session and persist until an explicit reset.

use crate::label::Label;
use crate::resolver::PlaceholderKey;
use crate::symbol::{Range, SymbolKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Parent key under which bundled sections are placed at the top level.
pub const BUNDLE_ROOT: &str = "root";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// Identity of a label entry.
pub enum StoreKey {
    /// Real symbol: name plus start line.
    Symbol(SymbolKey),
    /// Placeholder for an annotation with no following symbol.
    Placeholder(PlaceholderKey),
    /// Name only, used when no range is known.
    Name(String),
}

impl StoreKey {
    fn is_document_derived(&self) -> bool {
        !matches!(self, Self::Name(_))
    }
}

#[derive(Clone, Debug, Default)]
/// Label and range lookup keyed by [`StoreKey`].
pub struct LabelStore {
    labels: HashMap<StoreKey, Label>,
    ranges: HashMap<StoreKey, Range>,
}

impl LabelStore {
    /// Stores `label` under `key`.
    pub fn set_label(&mut self, key: StoreKey, label: Label) {
        self.labels.insert(key, label);
    }

    #[must_use]
    /// Stored label, `Normal` when absent.
    pub fn label(&self, key: &StoreKey) -> Label {
        self.labels.get(key).copied().unwrap_or_default()
    }

    #[must_use]
    /// Label for a real symbol, falling back to a name-only entry when no keyed entry exists.
    pub fn symbol_label(&self, key: &SymbolKey) -> Label {
        self.labels
            .get(&StoreKey::Symbol(key.clone()))
            .or_else(|| self.labels.get(&StoreKey::Name(key.name.clone())))
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    /// Label stored under the bare name `name`.
    pub fn name_label(&self, name: &str) -> Option<Label> {
        self.labels.get(&StoreKey::Name(name.to_string())).copied()
    }

    /// Stores the document span of `key`.
    pub fn set_range(&mut self, key: StoreKey, range: Range) {
        self.ranges.insert(key, range);
    }

    #[must_use]
    /// Document span stored under `key`.
    pub fn range(&self, key: &StoreKey) -> Option<Range> {
        self.ranges.get(key).copied()
    }

    /// Records `range` under a bare name unless the name already has one.
    pub fn remember_name_range(&mut self, name: &str, range: Range) {
        self.ranges
            .entry(StoreKey::Name(name.to_string()))
            .or_insert(range);
    }

    /// Drops every entry derived from document content, keeping session-owned name labels.
    pub fn clear_document_entries(&mut self) {
        self.labels.retain(|key, _| !key.is_document_derived());
        self.ranges.clear();
    }

    /// Drops every label and range.
    pub fn clear(&mut self) {
        self.labels.clear();
        self.ranges.clear();
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Instructor flag raised on a section.
pub struct Flag {
    /// Section the flag belongs to; at most one flag per section.
    pub section: String,
    /// Name of the flag, shared by flags toggled together.
    pub name: String,
    /// Display color.
    pub color: String,
    /// What the flag asks for, if decided.
    pub purpose: Option<Label>,
}

#[derive(Clone, Debug, Default)]
/// Flags in insertion order, unique per section.
pub struct FlagStore {
    flags: Vec<Flag>,
}

impl FlagStore {
    /// Adds a flag, replacing any existing flag on the same section.
    pub fn set_flag(&mut self, flag: Flag) {
        if let Some(existing) = self.flags.iter_mut().find(|f| f.section == flag.section) {
            *existing = flag;
        } else {
            self.flags.push(flag);
        }
    }

    #[must_use]
    /// Flags in insertion order.
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    #[must_use]
    /// Flag raised on `section`.
    pub fn for_section(&self, section: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.section == section)
    }

    /// Sets the purpose of every flag called `name`.
    ///
    /// Without an explicit purpose the flag flips between `Blocked` and `Normal`.
    pub fn toggle(&mut self, name: &str, purpose: Option<Label>) {
        for flag in self.flags.iter_mut().filter(|f| f.name == name) {
            flag.purpose = Some(purpose.unwrap_or(match flag.purpose {
                Some(Label::Blocked) => Label::Normal,
                _ => Label::Blocked,
            }));
        }
    }

    /// Gives every flag the purpose `purpose`.
    pub fn set_all_purposes(&mut self, purpose: Label) {
        for flag in &mut self.flags {
            flag.purpose = Some(purpose);
        }
    }

    /// Drops every flag.
    pub fn clear(&mut self) {
        self.flags.clear();
    }
}

#[derive(Clone, Debug, Default)]
/// User-made groupings: parent label to ordered child labels.
pub struct BundledSections {
    groups: Vec<(String, Vec<String>)>,
}

impl BundledSections {
    /// Appends `label` under `parent`, or under [`BUNDLE_ROOT`] when there is none.
    pub fn add(&mut self, label: &str, parent: Option<&str>) {
        let parent = parent.unwrap_or(BUNDLE_ROOT);
        if let Some((_, children)) = self.groups.iter_mut().find(|(p, _)| p == parent) {
            children.push(label.to_string());
        } else {
            self.groups.push((parent.to_string(), vec![label.to_string()]));
        }
    }

    #[must_use]
    /// Labels grouped under `parent`.
    pub fn children(&self, parent: &str) -> &[String] {
        self.groups
            .iter()
            .find(|(p, _)| p == parent)
            .map_or(&[], |(_, children)| children.as_slice())
    }

    #[must_use]
    /// Labels grouped at the top level.
    pub fn roots(&self) -> &[String] {
        self.children(BUNDLE_ROOT)
    }

    /// Drops every group.
    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

#[derive(Clone, Debug, Default)]
/// Active label filter. Empty means no filtering.
///
/// The last non-empty selection is remembered so toggling all filters off and on restores it.
pub struct FilterSet {
    active: BTreeSet<Label>,
    previous: BTreeSet<Label>,
}

impl FilterSet {
    /// Filters on exactly `labels`.
    pub fn set(&mut self, labels: impl IntoIterator<Item = Label>) {
        self.active = labels.into_iter().collect();
    }

    /// Switches filtering off, forgetting nothing.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Adds or removes a single label.
    pub fn toggle(&mut self, label: Label) {
        if !self.active.remove(&label) {
            self.active.insert(label);
        }
    }

    /// Switches filtering off, remembering the selection, or back on.
    ///
    /// Switching on restores the remembered selection, or every annotated label if there is none.
    pub fn toggle_all(&mut self) {
        if self.active.is_empty() {
            self.active = if self.previous.is_empty() {
                Label::ANNOTATED.into_iter().collect()
            } else {
                self.previous.clone()
            };
        } else {
            self.previous = std::mem::take(&mut self.active);
        }
    }

    #[must_use]
    /// Whether no label is filtered on.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    #[must_use]
    /// Whether `label` is filtered on.
    pub fn contains(&self, label: Label) -> bool {
        self.active.contains(&label)
    }

    #[must_use]
    /// Labels filtered on.
    pub fn active(&self) -> &BTreeSet<Label> {
        &self.active
    }
}

#[cfg(test)]
#[path = "tests/store.rs"]
mod tests;
