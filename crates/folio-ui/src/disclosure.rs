//! Collapsible content units
//!
//! A [`DisclosureItem`] is one job entry, one project entry, or the whole
//! skills grid. It owns its expanded flag and pushes it to the view as the
//! kind's marker class plus the `aria-expanded` attribute.

use crate::document::{class, Document, ElementId};
use serde::{Deserialize, Serialize};

/// Widget family an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisclosureKind {
    /// One entry in the experience list
    Job,
    /// One entry in the projects list
    Project,
    /// The skills grid as a single expandable region
    SkillsRegion,
}

impl DisclosureKind {
    /// Class marking the expanded state for this kind
    pub fn expanded_class(&self) -> &'static str {
        match self {
            DisclosureKind::Job | DisclosureKind::Project => class::EXPANDED,
            DisclosureKind::SkillsRegion => class::SKILLS_EXPANDED,
        }
    }

    /// Whether expansion is height-animated (and so needs scroll compensation)
    pub fn is_animated(&self) -> bool {
        matches!(self, DisclosureKind::SkillsRegion)
    }

    /// Get short display text
    pub fn short_text(&self) -> &'static str {
        match self {
            DisclosureKind::Job => "job",
            DisclosureKind::Project => "project",
            DisclosureKind::SkillsRegion => "skills-region",
        }
    }
}

/// A single collapsible unit
#[derive(Debug, Clone, PartialEq)]
pub struct DisclosureItem {
    id: ElementId,
    kind: DisclosureKind,
    expanded: bool,
    animated: bool,
    present: bool,
    /// Element carrying `aria-expanded`; the item itself unless overridden
    attribute_target: ElementId,
}

impl DisclosureItem {
    /// Create a collapsed item backed by an existing element
    pub fn new(id: impl Into<ElementId>, kind: DisclosureKind) -> Self {
        let id = id.into();
        Self {
            attribute_target: id.clone(),
            id,
            kind,
            expanded: false,
            animated: kind.is_animated(),
            present: true,
        }
    }

    /// Create an item for an element missing from the markup
    ///
    /// Inert items stay collapsed and ignore every mutation.
    pub fn inert(id: impl Into<ElementId>, kind: DisclosureKind) -> Self {
        Self {
            present: false,
            animated: false,
            ..Self::new(id, kind)
        }
    }

    /// Build an item from the page markup, reading its initial state
    pub fn attach(id: impl Into<ElementId>, kind: DisclosureKind, doc: &dyn Document) -> Self {
        let id = id.into();
        if !doc.contains(&id) {
            tracing::debug!("No element for {} '{}', treating as inert", kind.short_text(), id);
            return Self::inert(id, kind);
        }
        let expanded = doc.has_class(&id, kind.expanded_class());
        Self {
            expanded,
            ..Self::new(id, kind)
        }
    }

    /// Put `aria-expanded` on another element (e.g. the skills see-more button)
    pub fn with_attribute_target(mut self, target: impl Into<ElementId>) -> Self {
        self.attribute_target = target.into();
        self
    }

    /// Element id
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Widget family
    pub fn kind(&self) -> DisclosureKind {
        self.kind
    }

    /// Element carrying `aria-expanded`
    pub fn attribute_target(&self) -> &ElementId {
        &self.attribute_target
    }

    /// Whether the item is expanded
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether collapsing the item animates its height
    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// Whether the backing element exists
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Flip the expanded state; returns the new state
    pub fn toggle(&mut self, doc: &mut dyn Document) -> bool {
        let target = !self.expanded;
        self.set_expanded(target, doc);
        self.expanded
    }

    /// Set the expanded state; returns whether the state changed
    ///
    /// The view is rewritten even when the state is unchanged.
    pub fn set_expanded(&mut self, expanded: bool, doc: &mut dyn Document) -> bool {
        if !self.present {
            return false;
        }
        let changed = self.expanded != expanded;
        self.expanded = expanded;
        self.sync_view(doc);
        if changed {
            tracing::debug!(
                "{} '{}' {}",
                self.kind.short_text(),
                self.id,
                if expanded { "expanded" } else { "collapsed" }
            );
        }
        changed
    }

    /// Close control: always collapses, never toggles
    pub fn close(&mut self, doc: &mut dyn Document) -> bool {
        self.set_expanded(false, doc)
    }

    /// Write the current state to the view
    pub fn sync_view(&self, doc: &mut dyn Document) {
        if !self.present {
            return;
        }
        doc.set_class(&self.id, self.kind.expanded_class(), self.expanded);
        doc.set_expanded_attr(&self.attribute_target, self.expanded);
    }
}
