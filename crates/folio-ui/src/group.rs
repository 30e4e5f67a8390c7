//! Disclosure groups and their "expand all" aggregate control
//!
//! The aggregate is never stored. Every read scans the members, and every
//! mutation path ends in [`DisclosureGroup::on_member_toggled`], which
//! rewrites the aggregate control from a fresh scan. Members toggled on their
//! own therefore can never leave the control out of date.

use crate::disclosure::DisclosureItem;
use crate::document::{class, Document, ElementId};

/// Ordered items sharing one aggregate control
#[derive(Debug, Clone)]
pub struct DisclosureGroup {
    name: String,
    aggregate_control: Option<ElementId>,
    items: Vec<DisclosureItem>,
}

impl DisclosureGroup {
    /// Create a group
    pub fn new(
        name: impl Into<String>,
        aggregate_control: Option<ElementId>,
        items: Vec<DisclosureItem>,
    ) -> Self {
        Self {
            name: name.into(),
            aggregate_control,
            items,
        }
    }

    /// Group name, used in logs and snapshots
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The aggregate control, when present in the markup
    pub fn aggregate_control(&self) -> Option<&ElementId> {
        self.aggregate_control.as_ref()
    }

    /// Members in markup order
    pub fn items(&self) -> &[DisclosureItem] {
        &self.items
    }

    /// Get a member by index
    pub fn item(&self, index: usize) -> Option<&DisclosureItem> {
        self.items.get(index)
    }

    /// Index of the member with this id
    pub fn position(&self, id: &ElementId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the group has no members
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True iff the group is non-empty and every member is expanded
    pub fn aggregate_expanded(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(DisclosureItem::is_expanded)
    }

    /// Re-derive the aggregate and write it to the aggregate control
    pub fn on_member_toggled(&self, doc: &mut dyn Document) -> bool {
        let all_expanded = self.aggregate_expanded();
        if let Some(control) = &self.aggregate_control {
            doc.set_class(control, class::ALL_EXPANDED, all_expanded);
        }
        all_expanded
    }

    /// Expand every member in order, then re-derive the aggregate
    pub fn expand_all(&mut self, doc: &mut dyn Document) -> bool {
        self.set_all(true, doc)
    }

    /// Collapse every member in order, then re-derive the aggregate
    pub fn collapse_all(&mut self, doc: &mut dyn Document) -> bool {
        self.set_all(false, doc)
    }

    /// Aggregate control click: collapse when all are expanded, else expand
    pub fn toggle_all(&mut self, doc: &mut dyn Document) -> bool {
        if self.aggregate_expanded() {
            self.collapse_all(doc)
        } else {
            self.expand_all(doc)
        }
    }

    /// Mutate one member, then re-derive the aggregate
    pub fn update_member<R>(
        &mut self,
        index: usize,
        doc: &mut dyn Document,
        f: impl FnOnce(&mut DisclosureItem, &mut dyn Document) -> R,
    ) -> Option<R> {
        let item = self.items.get_mut(index)?;
        let result = f(item, doc);
        self.on_member_toggled(doc);
        Some(result)
    }

    /// Toggle one member; returns its new state
    pub fn toggle_member(&mut self, index: usize, doc: &mut dyn Document) -> Option<bool> {
        self.update_member(index, doc, |item, doc| item.toggle(doc))
    }

    /// Set one member; returns whether its state changed
    pub fn set_member(
        &mut self,
        index: usize,
        expanded: bool,
        doc: &mut dyn Document,
    ) -> Option<bool> {
        self.update_member(index, doc, |item, doc| item.set_expanded(expanded, doc))
    }

    /// Close one member through its close control
    pub fn close_member(&mut self, index: usize, doc: &mut dyn Document) -> Option<bool> {
        self.update_member(index, doc, |item, doc| item.close(doc))
    }

    fn set_all(&mut self, expanded: bool, doc: &mut dyn Document) -> bool {
        for item in &mut self.items {
            item.set_expanded(expanded, doc);
        }
        let all_expanded = self.on_member_toggled(doc);
        tracing::debug!(
            "Group '{}' {} ({} members, all_expanded={})",
            self.name,
            if expanded { "expand all" } else { "collapse all" },
            self.items.len(),
            all_expanded
        );
        all_expanded
    }
}
