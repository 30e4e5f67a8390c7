//! Viewport-stable collapse
//!
//! Collapsing a height-animated region shortens the document. When the region
//! sits above the reader's position, everything they were looking at slides
//! up. The compensator keeps the view stable with one of two strategies,
//! chosen by viewport width:
//!
//! - **Static anchor** (desktop): capture the scroll offset, the region top
//!   and the top of an anchor element below the region, apply the collapse,
//!   then on the next frame shift the scroll offset by however far the anchor
//!   moved. Only applied when the reader was scrolled past the region top.
//! - **Settle to control** (mobile): capture the scroll offset, apply the
//!   collapse, write the offset back immediately, then once the collapse
//!   animation has finished scroll so the toggling control sits at the bottom
//!   of the viewport with a small margin.
//!
//! Deferred corrections go through a [`ContinuationQueue`] keyed by region,
//! so a second collapse before the first correction fires supersedes it.

use crate::config::CompensationConfig;
use crate::document::{Document, ElementId, ScrollBehavior};
use crate::scheduler::{ContinuationQueue, Trigger};
use serde::Serialize;
use std::time::Duration;

/// Coarse viewport width class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthClass {
    /// Above the mobile breakpoint
    Desktop,
    /// At or below the mobile breakpoint
    Mobile,
}

impl WidthClass {
    /// Classify a viewport width
    pub fn classify(width: f64, config: &CompensationConfig) -> Self {
        if width <= config.mobile_max_width {
            WidthClass::Mobile
        } else {
            WidthClass::Desktop
        }
    }
}

/// Snapshot taken just before a collapse, in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportAnchor {
    /// Scroll offset before the mutation
    pub scroll_offset_before: f64,
    /// Top of the collapsing region before the mutation
    pub region_top_before: f64,
    /// Top of the anchor element (below the region) before the mutation
    pub anchor_element_top_before: f64,
}

impl ViewportAnchor {
    /// Whether the reader was scrolled past the region top
    ///
    /// A viewport straddling the region (past its top, not past its bottom)
    /// counts as past.
    pub fn is_past_region(&self) -> bool {
        self.scroll_offset_before > self.region_top_before
    }

    /// Offset that keeps the view still, given where the anchor is now
    ///
    /// Measured from the offset captured before the collapse: the document
    /// may already have clamped the live offset into the shorter page.
    /// Never lands above the region top or below zero.
    pub fn corrected_offset(&self, anchor_top_now: f64) -> f64 {
        let shift = self.anchor_element_top_before - anchor_top_now;
        (self.scroll_offset_before - shift)
            .max(self.region_top_before)
            .max(0.0)
    }
}

/// Elements involved in one collapse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseTarget {
    /// Section whose top decides whether the reader is past the region
    pub region: ElementId,
    /// Element below the collapsing content whose top tracks the reflow
    pub anchor: ElementId,
    /// Control the user activated
    pub control: ElementId,
}

/// Deferred correction payload
#[derive(Debug, Clone, PartialEq)]
pub enum Correction {
    /// Desktop: shift by the anchor's movement
    StaticAnchor {
        /// Pre-mutation snapshot
        anchor: ViewportAnchor,
        /// Element whose movement is measured
        anchor_element: ElementId,
    },
    /// Mobile: pin the control to the viewport bottom
    SettleToControl {
        /// Control to pin
        control: ElementId,
    },
}

/// Strategy taken for a collapse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Desktop correction scheduled for the next frame
    StaticAnchor,
    /// Mobile hold applied and settle scheduled after the animation
    SettleToControl,
    /// Mobile hold applied; no control to settle on
    HoldOnly,
    /// Region or anchor missing; collapse applied without compensation
    Uncompensated,
}

/// Result of running a deferred correction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CorrectionOutcome {
    /// Scroll offset was rewritten
    Applied {
        /// Region the correction belonged to
        region: ElementId,
        /// Offset before the write
        from: f64,
        /// Offset after the write
        to: f64,
    },
    /// Region was below the fold; the browser's own behavior is kept
    Suppressed {
        /// Region the correction belonged to
        region: ElementId,
    },
    /// Nothing moved
    Unchanged {
        /// Region the correction belonged to
        region: ElementId,
    },
    /// A referenced element disappeared
    Skipped {
        /// Region the correction belonged to
        region: ElementId,
    },
}

/// Compensates scroll position around disclosure collapses
#[derive(Debug)]
pub struct ViewportAnchorCompensator {
    config: CompensationConfig,
    queue: ContinuationQueue<Correction>,
}

impl ViewportAnchorCompensator {
    /// Create a compensator
    pub fn new(config: CompensationConfig) -> Self {
        Self {
            config,
            queue: ContinuationQueue::new(),
        }
    }

    /// Compensation settings
    pub fn config(&self) -> &CompensationConfig {
        &self.config
    }

    /// Width class of the document's current viewport
    pub fn width_class(&self, doc: &dyn Document) -> WidthClass {
        WidthClass::classify(doc.viewport().width, &self.config)
    }

    /// Apply a collapse through `mutate`, compensating the scroll position
    pub fn collapse(
        &mut self,
        doc: &mut dyn Document,
        target: &CollapseTarget,
        mutate: impl FnOnce(&mut dyn Document),
    ) -> Strategy {
        let strategy = match self.width_class(doc) {
            WidthClass::Desktop => self.collapse_static_anchor(doc, target, mutate),
            WidthClass::Mobile => self.collapse_settle_to_control(doc, target, mutate),
        };
        tracing::debug!("Collapse of '{}' compensated via {:?}", target.region, strategy);
        strategy
    }

    /// An expansion invalidates any pending collapse correction for the region
    pub fn on_expand(&mut self, region: &ElementId) -> bool {
        self.queue.cancel(region)
    }

    /// Whether a correction is pending for the region
    pub fn is_pending(&self, region: &ElementId) -> bool {
        self.queue.is_pending(region)
    }

    /// Number of pending corrections
    pub fn pending_count(&self) -> usize {
        self.queue.pending_count()
    }

    /// Virtual time seen by the compensator
    pub fn now(&self) -> Duration {
        self.queue.now()
    }

    /// Run corrections waiting for the next frame
    pub fn run_frame(&mut self, doc: &mut dyn Document) -> Vec<CorrectionOutcome> {
        self.queue
            .take_frame()
            .into_iter()
            .map(|(ticket, correction)| self.apply(ticket.region(), correction, doc))
            .collect()
    }

    /// Advance time and run corrections whose timers came due
    pub fn advance(&mut self, elapsed: Duration, doc: &mut dyn Document) -> Vec<CorrectionOutcome> {
        self.queue
            .advance(elapsed)
            .into_iter()
            .map(|(ticket, correction)| self.apply(ticket.region(), correction, doc))
            .collect()
    }

    fn collapse_static_anchor(
        &mut self,
        doc: &mut dyn Document,
        target: &CollapseTarget,
        mutate: impl FnOnce(&mut dyn Document),
    ) -> Strategy {
        let scroll_offset_before = doc.scroll_offset();
        let (Some(region_top_before), Some(anchor_element_top_before)) = (
            doc.document_top(&target.region),
            doc.document_top(&target.anchor),
        ) else {
            mutate(doc);
            self.queue.cancel(&target.region);
            return Strategy::Uncompensated;
        };

        mutate(doc);

        let anchor = ViewportAnchor {
            scroll_offset_before,
            region_top_before,
            anchor_element_top_before,
        };
        self.queue.schedule(
            target.region.clone(),
            Trigger::NextFrame,
            Correction::StaticAnchor {
                anchor,
                anchor_element: target.anchor.clone(),
            },
        );
        Strategy::StaticAnchor
    }

    fn collapse_settle_to_control(
        &mut self,
        doc: &mut dyn Document,
        target: &CollapseTarget,
        mutate: impl FnOnce(&mut dyn Document),
    ) -> Strategy {
        let scroll_offset_before = doc.scroll_offset();
        mutate(doc);
        doc.scroll_to(scroll_offset_before, ScrollBehavior::Instant);

        if !doc.contains(&target.control) {
            self.queue.cancel(&target.region);
            return Strategy::HoldOnly;
        }
        self.queue.schedule(
            target.region.clone(),
            Trigger::After(self.config.collapse_duration()),
            Correction::SettleToControl {
                control: target.control.clone(),
            },
        );
        Strategy::SettleToControl
    }

    fn apply(
        &self,
        region: &ElementId,
        correction: Correction,
        doc: &mut dyn Document,
    ) -> CorrectionOutcome {
        let region = region.clone();
        let current = doc.scroll_offset();

        let target = match correction {
            Correction::StaticAnchor {
                anchor,
                anchor_element,
            } => {
                if !anchor.is_past_region() {
                    tracing::debug!(
                        "Region '{}' below the fold ({} <= {}), no correction",
                        region,
                        anchor.scroll_offset_before,
                        anchor.region_top_before
                    );
                    return CorrectionOutcome::Suppressed { region };
                }
                let Some(anchor_top_now) = doc.document_top(&anchor_element) else {
                    return CorrectionOutcome::Skipped { region };
                };
                anchor.corrected_offset(anchor_top_now)
            }
            Correction::SettleToControl { control } => {
                let Some(rect) = doc.bounding_rect(&control) else {
                    return CorrectionOutcome::Skipped { region };
                };
                let viewport_height = doc.viewport().height;
                (current + rect.top - viewport_height + rect.height + self.config.control_margin)
                    .max(0.0)
            }
        };

        if (target - current).abs() < f64::EPSILON {
            return CorrectionOutcome::Unchanged { region };
        }
        doc.scroll_to(target, ScrollBehavior::Instant);
        let to = doc.scroll_offset();
        tracing::debug!("Corrected scroll for '{}': {} -> {}", region, current, to);
        CorrectionOutcome::Applied {
            region,
            from: current,
            to,
        }
    }
}
