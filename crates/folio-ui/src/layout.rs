//! Responsive layout management

use crate::config::LayoutConfig;
use crate::document::{class, Document, ElementId, ViewportSize};
use serde::Serialize;

/// Coarse page arrangement derived from the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LayoutMode {
    /// Contact panel moved below the content instead of beside it
    pub contact_docked: bool,
}

impl LayoutMode {
    /// Compute the mode for a viewport
    ///
    /// Docked when the viewport is wider than the desktop breakpoint and
    /// shorter than the dock threshold. Pure: no hysteresis.
    pub fn compute(viewport: ViewportSize, config: &LayoutConfig) -> Self {
        Self {
            contact_docked: viewport.width > config.desktop_min_width
                && viewport.height < config.dock_max_height,
        }
    }
}

/// Applies the layout mode to the content container on load and resize
#[derive(Debug, Clone)]
pub struct ResponsiveLayoutController {
    config: LayoutConfig,
    container: Option<ElementId>,
}

impl ResponsiveLayoutController {
    /// Create a controller; `container` is `None` when the markup lacks it
    pub fn new(config: LayoutConfig, container: Option<ElementId>) -> Self {
        Self { config, container }
    }

    /// Layout thresholds
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Recompute from scratch and write the layout class
    pub fn on_resize(&self, viewport: ViewportSize, doc: &mut dyn Document) -> LayoutMode {
        let mode = LayoutMode::compute(viewport, &self.config);
        if let Some(container) = &self.container {
            doc.set_class(container, class::CONTACT_BOTTOM, mode.contact_docked);
        }
        tracing::debug!(
            "Layout {}x{}: contact_docked={}",
            viewport.width,
            viewport.height,
            mode.contact_docked
        );
        mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::{Block, SimulatedDocument};

    #[test]
    fn test_layout_mode_thresholds() {
        let config = LayoutConfig::default();
        let docked = |w, h| LayoutMode::compute(ViewportSize::new(w, h), &config).contact_docked;

        assert!(!docked(1920.0, 800.0));
        assert!(!docked(1920.0, 700.0));
        assert!(docked(1920.0, 699.0));
        // Narrow viewports never dock, whatever the height
        assert!(!docked(900.0, 400.0));
        assert!(docked(901.0, 400.0));
    }

    #[test]
    fn test_resize_writes_container_class() {
        let mut doc =
            SimulatedDocument::new(vec![Block::new("grid", 100.0)], ViewportSize::new(1920.0, 800.0));
        let controller = ResponsiveLayoutController::new(LayoutConfig::default(), Some("grid".into()));

        assert!(controller.on_resize(ViewportSize::new(1920.0, 650.0), &mut doc).contact_docked);
        assert!(doc.has_class(&"grid".into(), class::CONTACT_BOTTOM));

        assert!(!controller.on_resize(ViewportSize::new(1920.0, 800.0), &mut doc).contact_docked);
        assert!(!doc.has_class(&"grid".into(), class::CONTACT_BOTTOM));
    }

    #[test]
    fn test_missing_container_still_computes() {
        let mut doc = SimulatedDocument::new(vec![], ViewportSize::new(1920.0, 650.0));
        let controller = ResponsiveLayoutController::new(LayoutConfig::default(), None);
        assert!(controller.on_resize(doc.viewport(), &mut doc).contact_docked);
    }
}
