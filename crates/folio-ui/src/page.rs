//! Page controller and event shell
//!
//! [`PageController`] owns every piece of disclosure state on the page: the
//! skills, jobs and projects families, the skill cards, the compensator and
//! the layout controller. It is built once at page load from [`PageMarkup`]
//! and then driven by [`PageEvent`]s, one at a time, each running to
//! completion before the next. [`PageRuntime`] pairs a controller with the
//! document it drives.

use crate::compensator::{
    CollapseTarget, CorrectionOutcome, Strategy, ViewportAnchorCompensator,
};
use crate::config::FolioConfig;
use crate::disclosure::{DisclosureItem, DisclosureKind};
use crate::document::{class, Document, ElementId, ViewportSize};
use crate::group::DisclosureGroup;
use crate::layout::{LayoutMode, ResponsiveLayoutController};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// One collapsible entry in the markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMarkup {
    /// Element id of the entry
    pub id: ElementId,
    /// Element id of its close control, if it has one
    #[serde(default)]
    pub close: Option<ElementId>,
}

impl ItemMarkup {
    /// Entry without a close control
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            close: None,
        }
    }

    /// Entry with a close control
    pub fn with_close(id: impl Into<ElementId>, close: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            close: Some(close.into()),
        }
    }
}

/// A list family (jobs or projects) in the markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMarkup {
    /// Aggregate "expand all" control
    pub expand_all: ElementId,
    /// Entries in display order
    #[serde(default)]
    pub items: Vec<ItemMarkup>,
}

/// The skills family in the markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsMarkup {
    /// Section containing the grid; its top is the fold reference
    pub section: ElementId,
    /// The expandable grid
    pub grid: ElementId,
    /// "See more" toggle below the grid
    pub see_more: ElementId,
    /// Aggregate control for the family
    pub expand_all: ElementId,
    /// Flippable cards inside the grid
    pub cards: Vec<ElementId>,
}

impl Default for SkillsMarkup {
    fn default() -> Self {
        Self {
            section: "skills".into(),
            grid: "skills-grid".into(),
            see_more: "skillsSeeMore".into(),
            expand_all: "skillsExpandAll".into(),
            cards: Vec::new(),
        }
    }
}

/// Element ids the controller wires up at page load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMarkup {
    /// Top-level content container receiving the layout class
    pub content_grid: ElementId,
    /// Skills family
    pub skills: SkillsMarkup,
    /// Experience family
    pub jobs: FamilyMarkup,
    /// Projects family
    pub projects: FamilyMarkup,
}

impl Default for PageMarkup {
    fn default() -> Self {
        Self {
            content_grid: "grid".into(),
            skills: SkillsMarkup::default(),
            jobs: FamilyMarkup {
                expand_all: "experienceExpandAll".into(),
                items: Vec::new(),
            },
            projects: FamilyMarkup {
                expand_all: "projectsExpandAll".into(),
                items: Vec::new(),
            },
        }
    }
}

/// Widget family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// The skills region
    Skills,
    /// Experience entries
    Jobs,
    /// Project entries
    Projects,
}

impl Family {
    /// All families in page order
    pub const ALL: [Family; 3] = [Family::Skills, Family::Jobs, Family::Projects];

    fn index(self) -> usize {
        match self {
            Family::Skills => 0,
            Family::Jobs => 1,
            Family::Projects => 2,
        }
    }

    /// Family name
    pub fn name(&self) -> &'static str {
        match self {
            Family::Skills => "skills",
            Family::Jobs => "jobs",
            Family::Projects => "projects",
        }
    }
}

/// Events delivered to the page
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Primary-pointer activation on an element
    Click(ElementId),
    /// Window resized to this viewport
    Resize(ViewportSize),
    /// The browser is about to paint; layout is current
    AnimationFrame,
    /// Wall time passed; implies at least one frame
    Elapsed(Duration),
}

/// What a click did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClickAction {
    /// A single item was toggled
    ToggledItem {
        /// Family of the item
        family: Family,
        /// Item id
        id: ElementId,
        /// State after the click
        expanded: bool,
        /// Scroll compensation taken, for animated collapses
        strategy: Option<Strategy>,
    },
    /// A close control collapsed its item
    ClosedItem {
        /// Family of the item
        family: Family,
        /// Item id
        id: ElementId,
    },
    /// An aggregate control expanded or collapsed its family
    ToggledAll {
        /// Family toggled
        family: Family,
        /// Aggregate after the click
        all_expanded: bool,
        /// Scroll compensation taken, for animated collapses
        strategy: Option<Strategy>,
    },
    /// A skill card flipped
    FlippedCard {
        /// Card id
        id: ElementId,
        /// State after the click
        flipped: bool,
    },
    /// The click did not land on any wired control
    Ignored,
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    /// Click handled
    Click(ClickAction),
    /// Layout recomputed
    Layout(LayoutMode),
    /// Deferred corrections that ran
    Corrections(Vec<CorrectionOutcome>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberOp {
    Toggle,
    Close,
}

/// Flippable skill cards; independent of the skills region state
#[derive(Debug, Clone, Default)]
struct SkillCards {
    cards: Vec<ElementId>,
    flipped: BTreeSet<ElementId>,
}

impl SkillCards {
    fn contains(&self, id: &ElementId) -> bool {
        self.cards.contains(id)
    }

    fn flip(&mut self, id: &ElementId, doc: &mut dyn Document) -> bool {
        let flipped = if self.flipped.remove(id) {
            false
        } else {
            self.flipped.insert(id.clone());
            true
        };
        doc.set_class(id, class::FLIPPED, flipped);
        flipped
    }
}

/// Owns and drives all disclosure state on the page
#[derive(Debug)]
pub struct PageController {
    markup: PageMarkup,
    groups: [DisclosureGroup; 3],
    close_controls: HashMap<ElementId, (Family, usize)>,
    cards: SkillCards,
    compensator: ViewportAnchorCompensator,
    layout: ResponsiveLayoutController,
}

impl PageController {
    /// Wire up the page from its markup (the page-load signal)
    ///
    /// Missing optional elements are logged and left inert.
    pub fn attach(markup: PageMarkup, config: &FolioConfig, doc: &mut dyn Document) -> Self {
        let present = |id: &ElementId, doc: &dyn Document, what: &str| -> Option<ElementId> {
            if doc.contains(id) {
                Some(id.clone())
            } else {
                tracing::debug!("No {} '{}' in markup", what, id);
                None
            }
        };

        let skills_item =
            DisclosureItem::attach(markup.skills.grid.clone(), DisclosureKind::SkillsRegion, &*doc)
                .with_attribute_target(markup.skills.see_more.clone());
        let skills = DisclosureGroup::new(
            Family::Skills.name(),
            present(&markup.skills.expand_all, &*doc, "skills aggregate control"),
            vec![skills_item],
        );

        let mut close_controls = HashMap::new();
        let mut build_family = |family: Family, fm: &FamilyMarkup, kind: DisclosureKind| {
            let mut items = Vec::new();
            for entry in &fm.items {
                if !doc.contains(&entry.id) {
                    tracing::warn!("Skipping {} entry '{}': not in markup", family.name(), entry.id);
                    continue;
                }
                if let Some(close) = entry.close.as_ref().filter(|c| doc.contains(c)) {
                    close_controls.insert(close.clone(), (family, items.len()));
                }
                items.push(DisclosureItem::attach(entry.id.clone(), kind, &*doc));
            }
            DisclosureGroup::new(
                family.name(),
                present(&fm.expand_all, &*doc, "aggregate control"),
                items,
            )
        };
        let jobs = build_family(Family::Jobs, &markup.jobs, DisclosureKind::Job);
        let projects = build_family(Family::Projects, &markup.projects, DisclosureKind::Project);

        let cards = SkillCards {
            cards: markup
                .skills
                .cards
                .iter()
                .filter(|c| doc.contains(c))
                .cloned()
                .collect(),
            flipped: markup
                .skills
                .cards
                .iter()
                .filter(|c| doc.has_class(c, class::FLIPPED))
                .cloned()
                .collect(),
        };

        let layout = ResponsiveLayoutController::new(
            config.layout.clone(),
            present(&markup.content_grid, &*doc, "content grid"),
        );

        let controller = Self {
            markup,
            groups: [skills, jobs, projects],
            close_controls,
            cards,
            compensator: ViewportAnchorCompensator::new(config.compensation.clone()),
            layout,
        };

        for group in &controller.groups {
            for item in group.items() {
                item.sync_view(doc);
            }
            group.on_member_toggled(doc);
        }
        controller.layout.on_resize(doc.viewport(), doc);
        tracing::info!(
            "Page attached: {} jobs, {} projects, {} skill cards",
            controller.group(Family::Jobs).len(),
            controller.group(Family::Projects).len(),
            controller.cards.cards.len()
        );
        controller
    }

    /// Handle one event to completion
    pub fn handle(&mut self, event: PageEvent, doc: &mut dyn Document) -> EventOutcome {
        match event {
            PageEvent::Click(target) => EventOutcome::Click(self.on_click(&target, doc)),
            PageEvent::Resize(viewport) => EventOutcome::Layout(self.layout.on_resize(viewport, doc)),
            PageEvent::AnimationFrame => EventOutcome::Corrections(self.compensator.run_frame(doc)),
            PageEvent::Elapsed(elapsed) => {
                let mut outcomes = self.compensator.run_frame(doc);
                outcomes.extend(self.compensator.advance(elapsed, doc));
                EventOutcome::Corrections(outcomes)
            }
        }
    }

    /// Route a click the way it bubbles: target first, then its ancestors
    pub fn on_click(&mut self, target: &ElementId, doc: &mut dyn Document) -> ClickAction {
        let mut cursor = Some(target.clone());
        while let Some(id) = cursor {
            if let Some(action) = self.route_click(&id, doc) {
                return action;
            }
            cursor = doc.parent(&id);
        }
        ClickAction::Ignored
    }

    /// A family's group
    pub fn group(&self, family: Family) -> &DisclosureGroup {
        &self.groups[family.index()]
    }

    /// The markup this controller was attached to
    pub fn markup(&self) -> &PageMarkup {
        &self.markup
    }

    /// The scroll compensator
    pub fn compensator(&self) -> &ViewportAnchorCompensator {
        &self.compensator
    }

    /// The layout controller
    pub fn layout(&self) -> &ResponsiveLayoutController {
        &self.layout
    }

    /// Flipped skill cards
    pub fn flipped_cards(&self) -> impl Iterator<Item = &ElementId> {
        self.cards.flipped.iter()
    }

    fn route_click(&mut self, id: &ElementId, doc: &mut dyn Document) -> Option<ClickAction> {
        if id == &self.markup.skills.see_more && doc.contains(id) {
            return self.click_member(Family::Skills, 0, MemberOp::Toggle, id, doc);
        }
        if self.group(Family::Skills).aggregate_control() == Some(id) {
            return Some(self.click_aggregate(Family::Skills, id, doc));
        }
        if self.cards.contains(id) {
            let flipped = self.cards.flip(id, doc);
            return Some(ClickAction::FlippedCard {
                id: id.clone(),
                flipped,
            });
        }
        if let Some(&(family, index)) = self.close_controls.get(id) {
            return self.click_member(family, index, MemberOp::Close, id, doc);
        }
        for family in [Family::Jobs, Family::Projects] {
            if self.group(family).aggregate_control() == Some(id) {
                return Some(self.click_aggregate(family, id, doc));
            }
            if let Some(index) = self.group(family).position(id) {
                return self.click_member(family, index, MemberOp::Toggle, id, doc);
            }
        }
        None
    }

    fn click_member(
        &mut self,
        family: Family,
        index: usize,
        op: MemberOp,
        control: &ElementId,
        doc: &mut dyn Document,
    ) -> Option<ClickAction> {
        let item = self.group(family).item(index)?;
        let id = item.id().clone();
        let was_expanded = item.is_expanded();
        let animated = item.is_animated();
        let expanded = match op {
            MemberOp::Toggle => !was_expanded,
            MemberOp::Close => false,
        };

        let compensated = was_expanded && !expanded && animated;
        let collapse_target = if compensated {
            self.collapse_target(family, control)
        } else {
            None
        };
        if expanded && animated {
            if let Some(target) = self.collapse_target(family, control) {
                self.compensator.on_expand(&target.region);
            }
        }

        let group = &mut self.groups[family.index()];
        let strategy = match collapse_target {
            Some(target) => Some(self.compensator.collapse(doc, &target, |doc| {
                group.set_member(index, false, doc);
            })),
            None => {
                group.set_member(index, expanded, doc);
                None
            }
        };

        // Inert items ignore the mutation; report what the item is now
        let expanded = self.group(family).item(index)?.is_expanded();
        Some(match op {
            MemberOp::Close => ClickAction::ClosedItem { family, id },
            MemberOp::Toggle => ClickAction::ToggledItem {
                family,
                id,
                expanded,
                strategy,
            },
        })
    }

    fn click_aggregate(
        &mut self,
        family: Family,
        control: &ElementId,
        doc: &mut dyn Document,
    ) -> ClickAction {
        let group = self.group(family);
        let collapsing = group.aggregate_expanded();
        let has_animated = group.items().iter().any(DisclosureItem::is_animated);
        let target = if has_animated {
            self.collapse_target(family, control)
        } else {
            None
        };

        let group = &mut self.groups[family.index()];
        let (all_expanded, strategy) = match (collapsing, target) {
            (true, Some(target)) => {
                let strategy = self.compensator.collapse(doc, &target, |doc| {
                    group.collapse_all(doc);
                });
                (group.aggregate_expanded(), Some(strategy))
            }
            (true, None) => (group.collapse_all(doc), None),
            (false, target) => {
                if let Some(target) = target {
                    self.compensator.on_expand(&target.region);
                }
                (group.expand_all(doc), None)
            }
        };

        ClickAction::ToggledAll {
            family,
            all_expanded,
            strategy,
        }
    }

    /// Elements measured when an animated member of `family` collapses
    fn collapse_target(&self, family: Family, control: &ElementId) -> Option<CollapseTarget> {
        match family {
            Family::Skills => {
                let skills = &self.markup.skills;
                Some(CollapseTarget {
                    region: skills.section.clone(),
                    anchor: skills.see_more.clone(),
                    control: control.clone(),
                })
            }
            Family::Jobs | Family::Projects => None,
        }
    }
}

/// Per-item state in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSnapshot {
    /// Item id
    pub id: ElementId,
    /// Whether it is expanded
    pub expanded: bool,
}

/// Per-family state in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilySnapshot {
    /// Family
    pub family: Family,
    /// Derived aggregate
    pub all_expanded: bool,
    /// Members in order
    pub items: Vec<ItemSnapshot>,
}

/// Observable page state at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    /// Virtual time in milliseconds
    pub clock_ms: u64,
    /// Document scroll offset
    pub scroll_offset: f64,
    /// Viewport dimensions
    pub viewport: ViewportSize,
    /// Layout mode for the viewport
    pub layout: LayoutMode,
    /// Families in page order
    pub families: Vec<FamilySnapshot>,
    /// Flipped skill cards
    pub flipped_cards: Vec<ElementId>,
    /// Corrections still waiting to run
    pub pending_corrections: usize,
}

impl PageSnapshot {
    /// Snapshot of one family
    pub fn family(&self, family: Family) -> Option<&FamilySnapshot> {
        self.families.iter().find(|f| f.family == family)
    }

    /// Expanded state of an item in any family
    pub fn is_expanded(&self, id: &ElementId) -> Option<bool> {
        self.families
            .iter()
            .flat_map(|f| f.items.iter())
            .find(|item| &item.id == id)
            .map(|item| item.expanded)
    }
}

/// A controller bound to the document it drives
#[derive(Debug)]
pub struct PageRuntime<D> {
    document: D,
    controller: PageController,
}

impl<D: Document> PageRuntime<D> {
    /// Load the page: attach the controller to the document
    pub fn load(mut document: D, markup: PageMarkup, config: &FolioConfig) -> Self {
        let controller = PageController::attach(markup, config, &mut document);
        Self {
            document,
            controller,
        }
    }

    /// Dispatch one event
    pub fn dispatch(&mut self, event: PageEvent) -> EventOutcome {
        self.controller.handle(event, &mut self.document)
    }

    /// The document
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access for harnesses that act as the user (scroll, resize)
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// The controller
    pub fn controller(&self) -> &PageController {
        &self.controller
    }

    /// Capture the observable state
    pub fn snapshot(&self) -> PageSnapshot {
        let families = Family::ALL
            .iter()
            .map(|&family| {
                let group = self.controller.group(family);
                FamilySnapshot {
                    family,
                    all_expanded: group.aggregate_expanded(),
                    items: group
                        .items()
                        .iter()
                        .map(|item| ItemSnapshot {
                            id: item.id().clone(),
                            expanded: item.is_expanded(),
                        })
                        .collect(),
                }
            })
            .collect();
        let viewport = self.document.viewport();

        PageSnapshot {
            clock_ms: self.controller.compensator.now().as_millis() as u64,
            scroll_offset: self.document.scroll_offset(),
            viewport,
            layout: LayoutMode::compute(viewport, self.controller.layout.config()),
            families,
            flipped_cards: self.controller.flipped_cards().cloned().collect(),
            pending_corrections: self.controller.compensator.pending_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::{Block, SimulatedDocument};

    fn markup() -> PageMarkup {
        let mut markup = PageMarkup::default();
        markup.skills.cards = vec!["skill-rust".into(), "skill-go".into()];
        markup.jobs.items = vec![
            ItemMarkup::with_close("job-a", "job-a-close"),
            ItemMarkup::with_close("job-b", "job-b-close"),
            ItemMarkup::with_close("job-c", "job-c-close"),
        ];
        markup.projects.items = vec![ItemMarkup::new("proj-a"), ItemMarkup::new("proj-b")];
        markup
    }

    fn document(viewport: ViewportSize) -> SimulatedDocument {
        SimulatedDocument::new(
            vec![
                Block::new("grid", 0.0),
                Block::new("header", 400.0),
                Block::new("skills", 100.0).with_child("skillsExpandAll"),
                Block::new("skills-grid", 300.0)
                    .growing(class::SKILLS_EXPANDED, 600.0)
                    .with_child("skill-rust")
                    .with_child("skill-go"),
                Block::new("skillsSeeMore", 40.0),
                Block::new("experienceExpandAll", 30.0),
                Block::new("job-a", 80.0)
                    .growing(class::EXPANDED, 200.0)
                    .with_child("job-a-close"),
                Block::new("job-b", 80.0)
                    .growing(class::EXPANDED, 200.0)
                    .with_child("job-b-close"),
                Block::new("job-c", 80.0)
                    .growing(class::EXPANDED, 200.0)
                    .with_child("job-c-close"),
                Block::new("projectsExpandAll", 30.0),
                Block::new("proj-a", 80.0).growing(class::EXPANDED, 200.0),
                Block::new("proj-b", 80.0).growing(class::EXPANDED, 200.0),
                Block::new("footer", 3000.0),
            ],
            viewport,
        )
    }

    fn runtime(viewport: ViewportSize) -> PageRuntime<SimulatedDocument> {
        PageRuntime::load(document(viewport), markup(), &FolioConfig::default())
    }

    fn click(rt: &mut PageRuntime<SimulatedDocument>, id: &str) -> ClickAction {
        match rt.dispatch(PageEvent::Click(id.into())) {
            EventOutcome::Click(action) => action,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_attach_syncs_initial_state() {
        let rt = runtime(ViewportSize::new(1920.0, 1000.0));
        let doc = rt.document();
        assert_eq!(doc.expanded_attr(&"skillsSeeMore".into()), Some(false));
        assert_eq!(doc.expanded_attr(&"job-a".into()), Some(false));
        assert!(!doc.has_class(&"experienceExpandAll".into(), class::ALL_EXPANDED));
        assert_eq!(rt.controller().group(Family::Jobs).len(), 3);
    }

    #[test]
    fn test_expand_all_then_close_one() {
        let mut rt = runtime(ViewportSize::new(1920.0, 1000.0));
        let action = click(&mut rt, "experienceExpandAll");
        assert_eq!(
            action,
            ClickAction::ToggledAll {
                family: Family::Jobs,
                all_expanded: true,
                strategy: None
            }
        );

        let action = click(&mut rt, "job-b-close");
        assert_eq!(
            action,
            ClickAction::ClosedItem {
                family: Family::Jobs,
                id: "job-b".into()
            }
        );
        let snap = rt.snapshot();
        assert!(!snap.family(Family::Jobs).unwrap().all_expanded);
        assert_eq!(snap.is_expanded(&"job-a".into()), Some(true));
        assert_eq!(snap.is_expanded(&"job-b".into()), Some(false));
        assert_eq!(snap.is_expanded(&"job-c".into()), Some(true));
        assert!(!rt
            .document()
            .has_class(&"experienceExpandAll".into(), class::ALL_EXPANDED));
    }

    #[test]
    fn test_close_on_collapsed_item_stays_collapsed() {
        let mut rt = runtime(ViewportSize::new(1920.0, 1000.0));
        click(&mut rt, "job-a-close");
        assert_eq!(rt.snapshot().is_expanded(&"job-a".into()), Some(false));
    }

    #[test]
    fn test_individual_toggles_drive_aggregate() {
        let mut rt = runtime(ViewportSize::new(1920.0, 1000.0));
        click(&mut rt, "proj-a");
        assert!(!rt.snapshot().family(Family::Projects).unwrap().all_expanded);
        click(&mut rt, "proj-b");
        assert!(rt.snapshot().family(Family::Projects).unwrap().all_expanded);
        assert!(rt
            .document()
            .has_class(&"projectsExpandAll".into(), class::ALL_EXPANDED));
    }

    #[test]
    fn test_skills_see_more_and_aggregate_stay_in_sync() {
        let mut rt = runtime(ViewportSize::new(1920.0, 1000.0));
        click(&mut rt, "skillsSeeMore");
        assert!(rt
            .document()
            .has_class(&"skillsExpandAll".into(), class::ALL_EXPANDED));
        assert_eq!(rt.document().expanded_attr(&"skillsSeeMore".into()), Some(true));

        let action = click(&mut rt, "skillsExpandAll");
        assert_eq!(
            action,
            ClickAction::ToggledAll {
                family: Family::Skills,
                all_expanded: false,
                strategy: Some(Strategy::StaticAnchor)
            }
        );
        assert!(!rt
            .document()
            .has_class(&"skills-grid".into(), class::SKILLS_EXPANDED));
    }

    #[test]
    fn test_card_flip_does_not_touch_region() {
        let mut rt = runtime(ViewportSize::new(1920.0, 1000.0));
        assert_eq!(
            click(&mut rt, "skill-go"),
            ClickAction::FlippedCard {
                id: "skill-go".into(),
                flipped: true
            }
        );
        assert!(!rt.snapshot().family(Family::Skills).unwrap().all_expanded);
        assert_eq!(rt.snapshot().flipped_cards, vec![ElementId::new("skill-go")]);
        click(&mut rt, "skill-go");
        assert!(rt.snapshot().flipped_cards.is_empty());
    }

    #[test]
    fn test_clicks_bubble_to_parent() {
        let doc = document(ViewportSize::new(1920.0, 1000.0));
        let mut markup = markup();
        markup.jobs.items[0].close = None;
        let mut rt = PageRuntime::load(doc, markup, &FolioConfig::default());

        // Without a wired close control, the click bubbles to the job itself
        let action = click(&mut rt, "job-a-close");
        assert!(matches!(
            action,
            ClickAction::ToggledItem { expanded: true, .. }
        ));
    }

    #[test]
    fn test_unknown_click_is_ignored() {
        let mut rt = runtime(ViewportSize::new(1920.0, 1000.0));
        assert_eq!(click(&mut rt, "footer"), ClickAction::Ignored);
        assert_eq!(click(&mut rt, "nowhere"), ClickAction::Ignored);
    }

    #[test]
    fn test_missing_markup_degrades_to_no_op() {
        let doc = SimulatedDocument::new(
            vec![Block::new("header", 400.0)],
            ViewportSize::new(1920.0, 1000.0),
        );
        let mut rt = PageRuntime::load(doc, markup(), &FolioConfig::default());
        assert_eq!(click(&mut rt, "skillsSeeMore"), ClickAction::Ignored);
        assert_eq!(click(&mut rt, "experienceExpandAll"), ClickAction::Ignored);

        let snap = rt.snapshot();
        assert!(!snap.family(Family::Skills).unwrap().all_expanded);
        assert!(snap.family(Family::Jobs).unwrap().items.is_empty());
    }

    #[test]
    fn test_resize_event_updates_layout() {
        let mut rt = runtime(ViewportSize::new(1920.0, 800.0));
        rt.document_mut().resize(ViewportSize::new(1920.0, 650.0));
        let outcome = rt.dispatch(PageEvent::Resize(ViewportSize::new(1920.0, 650.0)));
        assert_eq!(
            outcome,
            EventOutcome::Layout(LayoutMode {
                contact_docked: true
            })
        );
        assert!(rt.document().has_class(&"grid".into(), class::CONTACT_BOTTOM));
        assert!(rt.snapshot().layout.contact_docked);
    }
}
