//! In-memory block-flow document
//!
//! Models the page as a vertical stack of blocks. A block's height depends on
//! whether it carries its grow class, so toggling a disclosure class reflows
//! every block below it. Like a browser, the scroll offset is clamped into the
//! scrollable range whenever the document shrinks or the viewport changes.

use crate::document::{Document, ElementId, ElementRect, ScrollBehavior, ViewportSize};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One block in the document flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Element id of the block
    pub id: ElementId,
    /// Height without the grow class
    pub height: f64,
    /// Height while the grow class is present
    #[serde(default)]
    pub expanded_height: Option<f64>,
    /// Class that switches the block to `expanded_height`
    #[serde(default)]
    pub grow_class: Option<String>,
    /// Classes present at page load
    #[serde(default)]
    pub classes: Vec<String>,
    /// Nested elements sharing this block's box (cards, close buttons)
    #[serde(default)]
    pub children: Vec<ElementId>,
}

impl Block {
    /// Create a fixed-height block
    pub fn new(id: impl Into<ElementId>, height: f64) -> Self {
        Self {
            id: id.into(),
            height,
            expanded_height: None,
            grow_class: None,
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Make the block grow to `expanded_height` while `class` is present
    pub fn growing(mut self, class: &str, expanded_height: f64) -> Self {
        self.grow_class = Some(class.to_string());
        self.expanded_height = Some(expanded_height);
        self
    }

    /// Add a class present at page load
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Add a nested element
    pub fn with_child(mut self, id: impl Into<ElementId>) -> Self {
        self.children.push(id.into());
        self
    }
}

/// A scroll write recorded by the simulated document
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollWrite {
    /// Offset requested by the writer
    pub requested: f64,
    /// Offset after clamping
    pub applied: f64,
    /// Behavior requested by the writer
    pub behavior: ScrollBehavior,
}

/// Block-flow document used by the simulator and tests
#[derive(Debug, Clone)]
pub struct SimulatedDocument {
    blocks: Vec<Block>,
    parents: HashMap<ElementId, ElementId>,
    classes: HashMap<ElementId, BTreeSet<String>>,
    expanded_attrs: HashMap<ElementId, bool>,
    viewport: ViewportSize,
    scroll: f64,
    scroll_log: Vec<ScrollWrite>,
}

impl SimulatedDocument {
    /// Create a document from its blocks
    pub fn new(blocks: Vec<Block>, viewport: ViewportSize) -> Self {
        let mut parents = HashMap::new();
        let mut classes: HashMap<ElementId, BTreeSet<String>> = HashMap::new();

        for block in &blocks {
            classes
                .entry(block.id.clone())
                .or_default()
                .extend(block.classes.iter().cloned());
            for child in &block.children {
                parents.insert(child.clone(), block.id.clone());
                classes.entry(child.clone()).or_default();
            }
        }

        Self {
            blocks,
            parents,
            classes,
            expanded_attrs: HashMap::new(),
            viewport,
            scroll: 0.0,
            scroll_log: Vec::new(),
        }
    }

    /// Total document height
    pub fn document_height(&self) -> f64 {
        self.blocks.iter().map(|b| self.block_height(b)).sum()
    }

    /// Largest reachable scroll offset
    pub fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport.height).max(0.0)
    }

    /// Change the viewport, as a window resize does
    pub fn resize(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
        self.reflow();
    }

    /// Scroll the way the user does; not recorded as an engine write
    pub fn user_scroll(&mut self, offset: f64) {
        self.scroll = offset.clamp(0.0, self.max_scroll());
    }

    /// Scroll writes issued through [`Document::scroll_to`]
    pub fn scroll_log(&self) -> &[ScrollWrite] {
        &self.scroll_log
    }

    fn block_height(&self, block: &Block) -> f64 {
        match (&block.grow_class, block.expanded_height) {
            (Some(class), Some(expanded)) if self.has_class(&block.id, class) => expanded,
            _ => block.height,
        }
    }

    /// Document-coordinate box of the block hosting `id`
    fn layout_box(&self, id: &ElementId) -> Option<(f64, f64)> {
        let host = self.parents.get(id).unwrap_or(id);
        let mut top = 0.0;
        for block in &self.blocks {
            let height = self.block_height(block);
            if &block.id == host {
                return Some((top, height));
            }
            top += height;
        }
        None
    }

    fn reflow(&mut self) {
        self.scroll = self.scroll.clamp(0.0, self.max_scroll());
    }
}

impl Document for SimulatedDocument {
    fn contains(&self, id: &ElementId) -> bool {
        self.classes.contains_key(id)
    }

    fn parent(&self, id: &ElementId) -> Option<ElementId> {
        self.parents.get(id).cloned()
    }

    fn set_class(&mut self, id: &ElementId, class: &str, on: bool) {
        let Some(set) = self.classes.get_mut(id) else {
            return;
        };
        if on {
            set.insert(class.to_string());
        } else {
            set.remove(class);
        }
        self.reflow();
    }

    fn has_class(&self, id: &ElementId, class: &str) -> bool {
        self.classes
            .get(id)
            .map(|set| set.contains(class))
            .unwrap_or(false)
    }

    fn set_expanded_attr(&mut self, id: &ElementId, expanded: bool) {
        if self.contains(id) {
            self.expanded_attrs.insert(id.clone(), expanded);
        }
    }

    fn expanded_attr(&self, id: &ElementId) -> Option<bool> {
        self.expanded_attrs.get(id).copied()
    }

    fn bounding_rect(&self, id: &ElementId) -> Option<ElementRect> {
        self.layout_box(id)
            .map(|(top, height)| ElementRect::new(top - self.scroll, height))
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    fn scroll_to(&mut self, offset: f64, behavior: ScrollBehavior) {
        let applied = offset.clamp(0.0, self.max_scroll());
        self.scroll = applied;
        self.scroll_log.push(ScrollWrite {
            requested: offset,
            applied,
            behavior,
        });
    }

    fn viewport(&self) -> ViewportSize {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> SimulatedDocument {
        SimulatedDocument::new(
            vec![
                Block::new("header", 400.0),
                Block::new("grid", 100.0)
                    .growing("open", 400.0)
                    .with_child("card"),
                Block::new("footer", 2000.0),
            ],
            ViewportSize::new(1280.0, 800.0),
        )
    }

    #[test]
    fn test_block_flow_tops() {
        let mut doc = doc();
        doc.user_scroll(150.0);
        assert_eq!(doc.document_top(&"grid".into()), Some(400.0));
        assert_eq!(doc.bounding_rect(&"footer".into()), Some(ElementRect::new(350.0, 2000.0)));
        assert_eq!(doc.document_top(&"card".into()), Some(400.0));
        assert_eq!(doc.parent(&"card".into()), Some("grid".into()));
    }

    #[test]
    fn test_grow_class_reflows_following_blocks() {
        let mut doc = doc();
        doc.set_class(&"grid".into(), "open", true);
        assert_eq!(doc.document_top(&"footer".into()), Some(800.0));
        doc.set_class(&"grid".into(), "open", false);
        assert_eq!(doc.document_top(&"footer".into()), Some(500.0));
    }

    #[test]
    fn test_scroll_clamped_on_shrink() {
        let mut doc = doc();
        doc.set_class(&"grid".into(), "open", true);
        doc.user_scroll(10_000.0);
        assert_eq!(doc.scroll_offset(), 2800.0 - 800.0);

        doc.set_class(&"grid".into(), "open", false);
        assert_eq!(doc.scroll_offset(), 2500.0 - 800.0);
    }

    #[test]
    fn test_absent_elements_are_inert() {
        let mut doc = doc();
        let missing = ElementId::new("nope");
        doc.set_class(&missing, "open", true);
        doc.set_expanded_attr(&missing, true);
        assert!(!doc.contains(&missing));
        assert!(!doc.has_class(&missing, "open"));
        assert_eq!(doc.expanded_attr(&missing), None);
        assert_eq!(doc.bounding_rect(&missing), None);
    }

    #[test]
    fn test_scroll_writes_are_logged() {
        let mut doc = doc();
        doc.scroll_to(-50.0, ScrollBehavior::Smooth);
        assert_eq!(doc.scroll_offset(), 0.0);
        assert_eq!(doc.scroll_log().len(), 1);
        assert_eq!(doc.scroll_log()[0].requested, -50.0);
        assert_eq!(doc.scroll_log()[0].behavior, ScrollBehavior::Smooth);
    }
}
