//! The outline session: single owner of the stores and the derived tree.
//!
//! A view needs one source of truth it can interrogate and mutate as the instructor labels,
//! flags, groups and filters sections. The session keeps the session-lived stores (labels set
//! by name, flags, bundled sections, filters) and rebuilds everything document-derived from the
//! host on each triggering event. Handlers run to completion, so a rebuild always observes the
//! state left by the previous handler and the most recent rebuild wins.

use crate::aggregate::{self, filter_items};
use crate::config::Config;
use crate::edit_plan::EditKind;
use crate::error::Result;
use crate::host::EditorHost;
use crate::label::Label;
use crate::outline::{self, BuildContext, Collapse, ItemKind, OutlineItem, OutlineTree};
use crate::resolver::{resolve, PlaceholderEntry};
use crate::rewriter::plan_rewrite;
use crate::scanner::{annotation_lines, scan, LanguageFamily};
use crate::store::{BundledSections, FilterSet, Flag, FlagStore, LabelStore, StoreKey};
use crate::symbol::{flatten, FlatSymbol, Range, SymbolKey};
use std::collections::BTreeSet;

/// Default flag colour.
pub const FLAG_COLOR: &str = "#FF9800";

const TITLE: &str = "Instructor Outline";
const FILTERED_TITLE: &str = "Instructor Outline (Filtered)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What [`OutlineSession::set_label`] did.
pub enum LabelChange {
    /// The document was edited.
    Edited(EditKind),
    /// The document already carried the label.
    Unchanged,
    /// No symbol matched; the label was stored by name and now reads as the given value.
    Stored(Label),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where dropped rows were dragged from.
pub enum DropOrigin {
    /// The structural outline of the document.
    Outline,
    /// This outline's own rows, such as the label rows.
    Instructor,
}

/// Bridges the host document and the labelled outline, maintaining session state.
pub struct OutlineSession<H> {
    host: H,
    config: Config,
    labels: LabelStore,
    flags: FlagStore,
    bundled: BundledSections,
    filters: FilterSet,
    tree: OutlineTree,
    symbols: Vec<FlatSymbol>,
    placeholders: Vec<PlaceholderEntry>,
    annotation_lines: BTreeSet<usize>,
}

impl<H: EditorHost> OutlineSession<H> {
    #[must_use]
    /// Creates a session and performs the initial build.
    pub fn new(host: H, config: Config) -> Self {
        let mut session = Self {
            host,
            config,
            labels: LabelStore::default(),
            flags: FlagStore::default(),
            bundled: BundledSections::default(),
            filters: FilterSet::default(),
            tree: OutlineTree::default(),
            symbols: Vec::new(),
            placeholders: Vec::new(),
            annotation_lines: BTreeSet::new(),
        };
        session.rebuild();
        session
    }

    #[must_use]
    /// Host the session talks to.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    /// Current outline tree.
    pub fn tree(&self) -> &OutlineTree {
        &self.tree
    }

    #[must_use]
    /// Placeholders from the last rebuild.
    pub fn placeholders(&self) -> &[PlaceholderEntry] {
        &self.placeholders
    }

    #[must_use]
    /// Flags in insertion order.
    pub fn flags(&self) -> &[Flag] {
        self.flags.flags()
    }

    /// Rebuilds every document-derived structure from the host, then notifies the view.
    ///
    /// With no active document the outline becomes empty; that is a valid state, not an error.
    pub fn rebuild(&mut self) {
        self.labels.clear_document_entries();
        self.placeholders.clear();

        let Some(document) = self.host.active_document() else {
            self.symbols.clear();
            self.annotation_lines.clear();
            self.tree.clear();
            self.refresh();
            return;
        };

        let family = LanguageFamily::from_language_id(&document.language_id);
        self.symbols = flatten(&self.host.resolve_symbols(&document));
        self.annotation_lines = annotation_lines(&document.text, family);

        let resolution = resolve(scan(&document.text, family), &self.symbols);
        for assignment in resolution.assignments {
            let key = StoreKey::Symbol(assignment.key);
            self.labels.set_label(key.clone(), assignment.label);
            self.labels.set_range(key, Range::point(assignment.marker));
        }
        for entry in &resolution.placeholders {
            let key = StoreKey::Placeholder(entry.key.clone());
            self.labels.set_label(key.clone(), entry.label);
            self.labels.set_range(key, entry.range);
        }
        for symbol in &self.symbols {
            self.labels.remember_name_range(&symbol.name, symbol.range());
        }
        self.placeholders = resolution.placeholders;

        log::debug!(
            "rebuilt outline for {}: {} symbols, {} placeholders",
            document.uri,
            self.symbols.len(),
            self.placeholders.len()
        );
        self.rebuild_tree();
    }

    /// Manual resynchronisation with the document.
    pub fn resync(&mut self) {
        self.rebuild();
    }

    /// Rebuilds the tree from the last scan after a store change, without asking the host.
    fn rebuild_tree(&mut self) {
        self.tree = outline::build(&BuildContext {
            symbols: &self.symbols,
            placeholders: &self.placeholders,
            labels: &self.labels,
            flags: &self.flags,
            annotation_lines: &self.annotation_lines,
            placeholder_prefix: &self.config.placeholder_prefix,
        });
        self.refresh();
    }

    /// Signals the view that the outline changed.
    pub fn refresh(&mut self) {
        self.host.notify_view_changed();
    }

    /// Clears every session store and rebuilds.
    pub fn reset(&mut self) {
        self.labels.clear();
        self.flags.clear();
        self.bundled.clear();
        self.filters = FilterSet::default();
        self.rebuild();
    }

    // --- View ---

    #[must_use]
    /// Top-level rows: the labels group, document roots, bundled roots, then flag entries.
    ///
    /// With an active filter only branches holding a match remain, plus the labels group so the
    /// filter can always be changed.
    pub fn get_root_items(&self) -> Vec<OutlineItem> {
        let (group, _) = outline::labels_group(&self.tree, &self.filters);

        let mut items: Vec<OutlineItem> = self
            .tree
            .roots()
            .iter()
            .map(|item| self.decorate(item.clone()))
            .collect();
        items.extend(self.bundled.roots().iter().filter_map(|l| self.bundled_item(l)));
        items.extend(self.flags.flags().iter().map(|flag| self.flag_item(flag)));

        let mut rows = vec![group];
        rows.extend(filter_items(&self.tree, items, &self.filters));
        rows
    }

    #[must_use]
    /// Children of `item`, filtered like the roots. Label rows are never filtered.
    pub fn get_children(&self, item: &OutlineItem) -> Vec<OutlineItem> {
        match item.kind {
            ItemKind::LabelsGroup => return outline::labels_group(&self.tree, &self.filters).1,
            ItemKind::LabelRow => return Vec::new(),
            _ => {}
        }

        let bundled = self.bundled.children(&item.name);
        if !bundled.is_empty() {
            return bundled.iter().filter_map(|l| self.bundled_item(l)).collect();
        }

        let children = self
            .tree
            .children(&item.name)
            .iter()
            .map(|child| self.decorate(child.clone()))
            .collect();
        filter_items(&self.tree, children, &self.filters)
    }

    #[must_use]
    /// Item `item` hangs under, or the labels group for a label row.
    pub fn get_parent(&self, item: &OutlineItem) -> Option<OutlineItem> {
        if item.kind == ItemKind::LabelRow {
            return Some(outline::labels_group(&self.tree, &self.filters).0);
        }
        let parent = self.tree.parent_of(item)?;
        self.tree.find(parent).cloned().map(|p| self.decorate(p))
    }

    #[must_use]
    /// Every document item carrying `label`, for hosts folding or unfolding by label.
    pub fn items_with_label(&self, label: Label) -> Vec<OutlineItem> {
        aggregate::items_with_label(&self.tree, label)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    /// Number of top-level branches holding an item with `label`.
    pub fn count_top_level_branches_with_label(&self, label: Label) -> usize {
        aggregate::count_top_level_branches_with_label(&self.tree, label)
    }

    #[must_use]
    /// Outline title, marking an active filter.
    pub fn title(&self) -> &'static str {
        if self.filters.is_empty() {
            TITLE
        } else {
            FILTERED_TITLE
        }
    }

    fn decorate(&self, mut item: OutlineItem) -> OutlineItem {
        if item.collapse == Collapse::None && !self.bundled.children(&item.name).is_empty() {
            item.collapse = Collapse::Collapsed;
        }
        item
    }

    /// Entry for a bundled label, hidden when it resolves onto a bare annotation line.
    fn bundled_item(&self, name: &str) -> Option<OutlineItem> {
        let range = self.labels.range(&StoreKey::Name(name.to_string()));
        if range.is_some_and(|r| self.annotation_lines.contains(&r.start.line)) {
            return None;
        }
        let label = match (self.labels.name_label(name), range) {
            (Some(label), _) => label,
            (None, Some(r)) => self.labels.symbol_label(&SymbolKey::new(name, r.start.line)),
            (None, None) => Label::Normal,
        };
        let mut item = OutlineItem::new(name, ItemKind::Bundled, label).with_range(range);
        if !self.bundled.children(name).is_empty() || !self.tree.children(name).is_empty() {
            item.collapse = Collapse::Collapsed;
        }
        item.describe(&self.tree);
        Some(item)
    }

    fn flag_item(&self, flag: &Flag) -> OutlineItem {
        let mut item = OutlineItem::new(&flag.section, ItemKind::Flag, Label::Flagged)
            .with_range(self.labels.range(&StoreKey::Name(flag.section.clone())))
            .with_flag(Some(flag.clone()));
        item.describe(&self.tree);
        item
    }

    // --- Labels ---

    /// Gives the symbol called `name` the label `label`.
    ///
    /// When several symbols share the name, the one under the cursor wins, else the first in
    /// document order. The annotation above it is rewritten and the store updated only once the
    /// host accepted the edit. Names matching no symbol toggle a name-keyed label instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the edit; the store is left untouched.
    pub fn set_label(&mut self, name: &str, label: Label) -> Result<LabelChange> {
        if let Some(document) = self.host.active_document() {
            let symbols = flatten(&self.host.resolve_symbols(&document));
            let cursor = self.host.cursor_line();
            let symbol = symbols
                .iter()
                .find(|s| s.name == name && cursor.is_some_and(|c| s.contains_line(c)))
                .or_else(|| symbols.iter().find(|s| s.name == name));

            if let Some(symbol) = symbol {
                let family = LanguageFamily::from_language_id(&document.language_id);
                let offset = line_offset(&document.text, symbol.start_line);
                let style = self.config.comment_style(family, &document.text, offset);
                let key = StoreKey::Symbol(symbol.key());

                let Some(edit) = plan_rewrite(
                    &document.text,
                    symbol.start_line,
                    label,
                    style,
                    self.config.max_lookback,
                ) else {
                    self.labels.set_label(key, label);
                    self.rebuild_tree();
                    return Ok(LabelChange::Unchanged);
                };

                if let Err(e) = self.host.apply_edit(&document, &edit) {
                    log::warn!("could not label {name} as {label}: {e}");
                    return Err(e);
                }
                self.labels.set_label(key, label);
                self.rebuild();
                return Ok(LabelChange::Edited(edit.kind));
            }
        }

        let next = if self.labels.name_label(name) == Some(label) {
            Label::Normal
        } else {
            label
        };
        self.labels.set_label(StoreKey::Name(name.to_string()), next);
        self.rebuild_tree();
        Ok(LabelChange::Stored(next))
    }

    /// Applies `label` to the outline entry called `target`, if it has a known range.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the annotation edit.
    pub fn apply_label_to_target(&mut self, label: Label, target: &str) -> Result<bool> {
        let known = self.tree.find(target).is_some_and(|i| i.range.is_some())
            || self.labels.range(&StoreKey::Name(target.to_string())).is_some();
        if !known {
            return Ok(false);
        }
        self.set_label(target, label)?;
        Ok(true)
    }

    // --- Flags ---

    /// Raises a flag on `section`, replacing any flag it already has.
    pub fn add_flag(&mut self, section: &str, name: &str, color: &str, purpose: Option<Label>) {
        self.flags.set_flag(Flag {
            section: section.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            purpose,
        });
        self.rebuild_tree();
    }

    /// Sets the purpose of the flags called `name`, flipping Blocked/Normal without one.
    pub fn toggle_flag_state(&mut self, name: &str, purpose: Option<Label>) {
        self.flags.toggle(name, purpose);
        self.rebuild_tree();
    }

    /// Gives every flag the purpose `purpose`.
    pub fn bulk_toggle_flags(&mut self, purpose: Label) {
        self.flags.set_all_purposes(purpose);
        self.rebuild_tree();
    }

    // --- Bundled sections ---

    /// Groups `label` under `parent`, or at the top level.
    pub fn add_bundled_section(&mut self, label: &str, parent: Option<&str>) {
        self.bundled.add(label, parent);
        self.refresh();
    }

    /// Handles rows dropped onto `target`.
    ///
    /// Rows from the structural outline become bundled sections; label rows dragged from this
    /// outline apply their label to the target.
    ///
    /// # Errors
    ///
    /// Returns an error if applying a label fails.
    pub fn handle_drop(
        &mut self,
        origin: DropOrigin,
        labels: &[String],
        target: Option<&OutlineItem>,
    ) -> Result<()> {
        match origin {
            DropOrigin::Outline => {
                for label in labels {
                    self.add_bundled_section(label, target.map(|t| t.name.as_str()));
                }
            }
            DropOrigin::Instructor => {
                let Some(target) = target else {
                    return Ok(());
                };
                for label in labels.iter().filter_map(|l| Label::from_token(l)) {
                    self.apply_label_to_target(label, &target.name)?;
                }
            }
        }
        Ok(())
    }

    // --- Filters ---

    #[must_use]
    /// Labels currently filtered on, in label order.
    pub fn active_filter_labels(&self) -> Vec<Label> {
        self.filters.active().iter().copied().collect()
    }

    /// Filters on exactly `labels`.
    pub fn set_filter_labels(&mut self, labels: impl IntoIterator<Item = Label>) {
        self.filters.set(labels);
        self.refresh();
    }

    /// Switches filtering off.
    pub fn clear_filter(&mut self) {
        self.filters.clear();
        self.refresh();
    }

    /// Adds or removes `label` from the filter.
    pub fn toggle_label_filter(&mut self, label: Label) {
        self.filters.toggle(label);
        self.refresh();
    }

    /// Switches all filters off, or back on with the previous selection.
    pub fn toggle_all_filters(&mut self) {
        self.filters.toggle_all();
        self.refresh();
    }

    /// Shows only flagged entries.
    pub fn filter_flags(&mut self) {
        self.filters.set([Label::Flagged]);
        self.refresh();
    }
}

fn line_offset(text: &str, line: usize) -> usize {
    text.split_inclusive('\n').take(line).map(str::len).sum()
}

#[cfg(test)]
#[path = "tests/session.rs"]
mod tests;
