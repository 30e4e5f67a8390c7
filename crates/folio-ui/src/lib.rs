//! Folio UI engine
//!
//! Interaction state for a single-page profile site: expandable entries
//! grouped into families with "expand all" controls, a skills region whose
//! collapse keeps the reader's viewport stable, flippable skill cards and a
//! responsive layout switch. The engine drives the page through the
//! [`Document`] trait; [`SimulatedDocument`] is a block-flow model used for
//! replays and tests.

pub mod compensator;
pub mod config;
pub mod disclosure;
pub mod document;
pub mod error;
pub mod group;
pub mod layout;
pub mod page;
pub mod scenario;
pub mod scheduler;
pub mod simulated;

// Re-export commonly used types
pub use compensator::{
    CollapseTarget, Correction, CorrectionOutcome, Strategy, ViewportAnchor,
    ViewportAnchorCompensator, WidthClass,
};
pub use config::{CompensationConfig, FolioConfig, LayoutConfig};
pub use disclosure::{DisclosureItem, DisclosureKind};
pub use document::{class, Document, ElementId, ElementRect, ScrollBehavior, ViewportSize};
pub use error::{FolioError, FolioResult};
pub use group::DisclosureGroup;
pub use layout::{LayoutMode, ResponsiveLayoutController};
pub use page::{
    ClickAction, EventOutcome, Family, FamilyMarkup, FamilySnapshot, ItemMarkup, ItemSnapshot,
    PageController, PageEvent, PageMarkup, PageRuntime, PageSnapshot, SkillsMarkup,
};
pub use scenario::{Checkpoint, ControlTop, Expectation, Scenario, ScenarioReport, Step};
pub use scheduler::{ContinuationQueue, ContinuationTicket, Trigger};
pub use simulated::{Block, ScrollWrite, SimulatedDocument};
