//! The document surface the engine drives
//!
//! Everything the disclosure engine observes or mutates goes through
//! [`Document`]: element presence, classes, the expanded attribute, element
//! geometry and the shared document scroll position. Components receive the
//! document explicitly on every call instead of closing over element handles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class names written by the engine
pub mod class {
    /// Marker on an expanded job or project
    pub const EXPANDED: &str = "expanded";
    /// Marker on the expanded skills grid
    pub const SKILLS_EXPANDED: &str = "skills-expanded";
    /// Marker on an aggregate control whose members are all expanded
    pub const ALL_EXPANDED: &str = "all-expanded";
    /// Marker on a flipped skill card
    pub const FLIPPED: &str = "flipped";
    /// Layout class on the content grid when the contact panel is docked
    pub const CONTACT_BOTTOM: &str = "contact-bottom";
}

/// Identifier of an element in the page markup
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create an element id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Viewport width
    pub width: f64,
    /// Viewport height
    pub height: f64,
}

impl ViewportSize {
    /// Create a viewport size
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Element box relative to the viewport, like `getBoundingClientRect`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementRect {
    /// Distance from the viewport top to the element top
    pub top: f64,
    /// Element height
    pub height: f64,
}

impl ElementRect {
    /// Create a rect
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Distance from the viewport top to the element bottom
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// How a scroll write is performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    /// Jump immediately
    Instant,
    /// Animate to the target
    Smooth,
}

/// Page document as seen by the engine
///
/// Implementations must treat operations on absent elements as no-ops.
pub trait Document {
    /// Whether the element exists in the markup
    fn contains(&self, id: &ElementId) -> bool;

    /// Parent of an element, used to route clicks the way events bubble
    fn parent(&self, id: &ElementId) -> Option<ElementId>;

    /// Add or remove a class
    fn set_class(&mut self, id: &ElementId, class: &str, on: bool);

    /// Whether the element carries a class
    fn has_class(&self, id: &ElementId, class: &str) -> bool;

    /// Write the boolean `aria-expanded` attribute
    fn set_expanded_attr(&mut self, id: &ElementId, expanded: bool);

    /// Read the `aria-expanded` attribute
    fn expanded_attr(&self, id: &ElementId) -> Option<bool>;

    /// Current box of the element relative to the viewport
    fn bounding_rect(&self, id: &ElementId) -> Option<ElementRect>;

    /// Current document scroll offset
    fn scroll_offset(&self) -> f64;

    /// Write the document scroll offset
    fn scroll_to(&mut self, offset: f64, behavior: ScrollBehavior);

    /// Current viewport dimensions
    fn viewport(&self) -> ViewportSize;

    /// Element top in document coordinates
    fn document_top(&self, id: &ElementId) -> Option<f64> {
        self.bounding_rect(id)
            .map(|rect| rect.top + self.scroll_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_id_conversions() {
        let id: ElementId = "skillsSeeMore".into();
        assert_eq!(id.as_str(), "skillsSeeMore");
        assert_eq!(id.to_string(), "skillsSeeMore");
        assert_eq!(ElementId::from(String::from("job-1")), ElementId::new("job-1"));
    }

    #[test]
    fn test_rect_bottom() {
        let rect = ElementRect::new(120.0, 40.0);
        assert_eq!(rect.bottom(), 160.0);
    }
}
