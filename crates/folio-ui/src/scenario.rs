//! Scripted replays over a simulated document
//!
//! A scenario describes a page as flow blocks plus the markup ids to wire,
//! then a list of steps: user actions (click, resize, scroll), the passage of
//! time (frames, waits) and expectations checked against a snapshot.
//!
//! ```yaml
//! name: collapse skills on desktop
//! viewport: { width: 1920, height: 1000 }
//! scroll: 0
//! blocks:
//!   - { id: header, height: 400 }
//!   - { id: skills, height: 100 }
//!   - { id: skills-grid, height: 300, expanded_height: 600, grow_class: skills-expanded }
//!   - { id: skillsSeeMore, height: 40 }
//!   - { id: footer, height: 4000 }
//! steps:
//!   - { action: click, target: skillsSeeMore }
//!   - { action: scroll, offset: 1200 }
//!   - { action: click, target: skillsSeeMore }
//!   - { action: frame }
//!   - { action: expect, scroll_offset: 900 }
//! ```

use crate::config::FolioConfig;
use crate::document::{Document, ElementId, ViewportSize};
use crate::error::{FolioError, FolioResult};
use crate::page::{Family, PageEvent, PageMarkup, PageRuntime, PageSnapshot};
use crate::simulated::{Block, SimulatedDocument};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Offsets closer than this compare equal
const TOLERANCE: f64 = 0.5;

/// Expected viewport position of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlTop {
    /// Element to measure
    pub id: ElementId,
    /// Expected distance from the viewport top
    pub top: f64,
}

/// Assertions checked against a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expectation {
    /// Name shown in the report
    pub label: Option<String>,
    /// Document scroll offset
    pub scroll_offset: Option<f64>,
    /// Layout mode
    pub contact_docked: Option<bool>,
    /// Item expanded states
    pub expanded: BTreeMap<ElementId, bool>,
    /// Family aggregates
    pub all_expanded: BTreeMap<Family, bool>,
    /// Viewport position of an element
    pub control_top: Option<ControlTop>,
    /// Number of corrections still waiting
    pub pending_corrections: Option<usize>,
}

impl Expectation {
    /// Check the snapshot; one error per failed assertion
    pub fn check(&self, snapshot: &PageSnapshot, doc: &dyn Document) -> Vec<FolioError> {
        let mut failures = Vec::new();

        if let Some(expected) = self.scroll_offset {
            if (snapshot.scroll_offset - expected).abs() > TOLERANCE {
                failures.push(FolioError::validation(
                    "scroll_offset",
                    format!("expected {}, got {}", expected, snapshot.scroll_offset),
                ));
            }
        }

        if let Some(expected) = self.contact_docked {
            if snapshot.layout.contact_docked != expected {
                failures.push(FolioError::validation(
                    "contact_docked",
                    format!("expected {}, got {}", expected, snapshot.layout.contact_docked),
                ));
            }
        }

        for (id, &expected) in &self.expanded {
            match snapshot.is_expanded(id) {
                Some(actual) if actual == expected => {}
                Some(actual) => failures.push(FolioError::validation(
                    format!("expanded.{id}"),
                    format!("expected {expected}, got {actual}"),
                )),
                None => failures.push(FolioError::validation(
                    format!("expanded.{id}"),
                    "no such item",
                )),
            }
        }

        for (family, &expected) in &self.all_expanded {
            let actual = snapshot
                .family(*family)
                .map(|f| f.all_expanded)
                .unwrap_or(false);
            if actual != expected {
                failures.push(FolioError::validation(
                    format!("all_expanded.{}", family.name()),
                    format!("expected {expected}, got {actual}"),
                ));
            }
        }

        if let Some(control) = &self.control_top {
            match doc.bounding_rect(&control.id) {
                Some(rect) if (rect.top - control.top).abs() <= TOLERANCE => {}
                Some(rect) => failures.push(FolioError::validation(
                    format!("control_top.{}", control.id),
                    format!("expected {}, got {}", control.top, rect.top),
                )),
                None => failures.push(FolioError::validation(
                    format!("control_top.{}", control.id),
                    "no such element",
                )),
            }
        }

        if let Some(expected) = self.pending_corrections {
            if snapshot.pending_corrections != expected {
                failures.push(FolioError::validation(
                    "pending_corrections",
                    format!("expected {}, got {}", expected, snapshot.pending_corrections),
                ));
            }
        }

        failures
    }
}

/// One scripted step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Click an element
    Click {
        /// Element clicked
        target: ElementId,
    },
    /// Resize the window
    Resize {
        /// New width
        width: f64,
        /// New height
        height: f64,
    },
    /// The user scrolls
    Scroll {
        /// New offset
        offset: f64,
    },
    /// One animation frame
    Frame,
    /// Let time pass
    Wait {
        /// Milliseconds
        ms: u64,
    },
    /// Check the current state
    Expect(Expectation),
}

/// A page plus a script to replay against it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name
    pub name: String,
    /// Initial viewport
    pub viewport: ViewportSize,
    /// Initial scroll offset
    #[serde(default)]
    pub scroll: f64,
    /// Document flow
    pub blocks: Vec<Block>,
    /// Markup ids to wire
    #[serde(default)]
    pub markup: PageMarkup,
    /// Script
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// State captured at an expectation or at the end of a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checkpoint {
    /// Index of the step, or the step count for the final checkpoint
    pub step: usize,
    /// Expectation label
    pub label: Option<String>,
    /// Captured state
    pub snapshot: PageSnapshot,
}

/// Outcome of a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// Captured states in order
    pub checkpoints: Vec<Checkpoint>,
    /// Failed assertions
    pub failures: Vec<String>,
}

impl ScenarioReport {
    /// Whether every expectation held
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// The last captured state
    pub fn final_snapshot(&self) -> Option<&PageSnapshot> {
        self.checkpoints.last().map(|c| &c.snapshot)
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scenario: {}", self.name)?;
        for checkpoint in &self.checkpoints {
            let snap = &checkpoint.snapshot;
            writeln!(
                f,
                "[{}] {} t={}ms scroll={} docked={} pending={}",
                checkpoint.step,
                checkpoint.label.as_deref().unwrap_or("-"),
                snap.clock_ms,
                snap.scroll_offset,
                snap.layout.contact_docked,
                snap.pending_corrections
            )?;
            for family in &snap.families {
                let items: Vec<String> = family
                    .items
                    .iter()
                    .map(|item| format!("{}{}", if item.expanded { "+" } else { "-" }, item.id))
                    .collect();
                writeln!(
                    f,
                    "    {:<8} all_expanded={:<5} {}",
                    family.family.name(),
                    family.all_expanded,
                    items.join(" ")
                )?;
            }
        }
        if self.failures.is_empty() {
            write!(f, "ok")
        } else {
            for failure in &self.failures {
                writeln!(f, "FAIL {failure}")?;
            }
            write!(f, "{} failure(s)", self.failures.len())
        }
    }
}

impl Scenario {
    /// Parse a YAML scenario
    pub fn from_yaml_str(raw: &str) -> FolioResult<Self> {
        let scenario: Self = serde_yaml::from_str(raw)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Read a scenario file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_path(path: &Path) -> FolioResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| FolioError::io(path, e))?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let scenario: Self = if is_json {
            serde_json::from_str(&raw)?
        } else {
            serde_yaml::from_str(&raw)?
        };
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reject scenarios the simulator cannot lay out
    pub fn validate(&self) -> FolioResult<()> {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(FolioError::scenario(format!(
                "'{}': viewport must be positive, got {}x{}",
                self.name, self.viewport.width, self.viewport.height
            )));
        }

        let mut seen = HashSet::new();
        for id in self
            .blocks
            .iter()
            .flat_map(|b| std::iter::once(&b.id).chain(b.children.iter()))
        {
            if !seen.insert(id) {
                return Err(FolioError::scenario(format!(
                    "'{}': duplicate element id '{}'",
                    self.name, id
                )));
            }
        }

        for block in &self.blocks {
            if block.height < 0.0 || block.expanded_height.is_some_and(|h| h < 0.0) {
                return Err(FolioError::scenario(format!(
                    "'{}': block '{}' has a negative height",
                    self.name, block.id
                )));
            }
        }
        Ok(())
    }

    /// Build the document and load the page
    pub fn load(&self, config: &FolioConfig) -> PageRuntime<SimulatedDocument> {
        let mut document = SimulatedDocument::new(self.blocks.clone(), self.viewport);
        document.user_scroll(self.scroll);
        PageRuntime::load(document, self.markup.clone(), config)
    }

    /// Replay every step as fast as possible
    pub fn run(&self, config: &FolioConfig) -> FolioResult<ScenarioReport> {
        self.validate()?;
        let mut runtime = self.load(config);
        let mut report = self.empty_report();
        for (index, step) in self.steps.iter().enumerate() {
            apply_step(&mut runtime, index, step, &mut report);
        }
        self.finish(&runtime, &mut report);
        Ok(report)
    }

    /// Replay with waits taken in real time, scaled by `pace`
    ///
    /// `pace` must be finite and non-negative; zero replays without sleeping.
    pub async fn run_paced(&self, config: &FolioConfig, pace: f64) -> FolioResult<ScenarioReport> {
        if !pace.is_finite() || pace < 0.0 {
            return Err(FolioError::scenario(format!(
                "'{}': pace must be a finite non-negative factor, got {}",
                self.name, pace
            )));
        }
        self.validate()?;
        let mut runtime = self.load(config);
        let mut report = self.empty_report();
        for (index, step) in self.steps.iter().enumerate() {
            if let Step::Wait { ms } = step {
                let scaled = Duration::from_millis(*ms).as_secs_f64() * pace;
                let real = Duration::try_from_secs_f64(scaled).map_err(|e| {
                    FolioError::scenario(format!(
                        "'{}': step {} waits {}ms at pace {}: {}",
                        self.name, index, ms, pace, e
                    ))
                })?;
                tokio::time::sleep(real).await;
            }
            apply_step(&mut runtime, index, step, &mut report);
        }
        self.finish(&runtime, &mut report);
        Ok(report)
    }

    fn empty_report(&self) -> ScenarioReport {
        ScenarioReport {
            name: self.name.clone(),
            checkpoints: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn finish(&self, runtime: &PageRuntime<SimulatedDocument>, report: &mut ScenarioReport) {
        report.checkpoints.push(Checkpoint {
            step: self.steps.len(),
            label: Some("final".to_string()),
            snapshot: runtime.snapshot(),
        });
        if report.is_success() {
            tracing::info!("Scenario '{}' passed", self.name);
        } else {
            tracing::warn!(
                "Scenario '{}' failed {} expectation(s)",
                self.name,
                report.failures.len()
            );
        }
    }
}

fn apply_step(
    runtime: &mut PageRuntime<SimulatedDocument>,
    index: usize,
    step: &Step,
    report: &mut ScenarioReport,
) {
    match step {
        Step::Click { target } => {
            let outcome = runtime.dispatch(PageEvent::Click(target.clone()));
            tracing::debug!("Step {}: click '{}' -> {:?}", index, target, outcome);
        }
        Step::Resize { width, height } => {
            let viewport = ViewportSize::new(*width, *height);
            runtime.document_mut().resize(viewport);
            let outcome = runtime.dispatch(PageEvent::Resize(viewport));
            tracing::debug!("Step {}: resize {}x{} -> {:?}", index, width, height, outcome);
        }
        Step::Scroll { offset } => {
            runtime.document_mut().user_scroll(*offset);
            tracing::debug!("Step {}: user scroll to {}", index, offset);
        }
        Step::Frame => {
            let outcome = runtime.dispatch(PageEvent::AnimationFrame);
            tracing::debug!("Step {}: frame -> {:?}", index, outcome);
        }
        Step::Wait { ms } => {
            let outcome = runtime.dispatch(PageEvent::Elapsed(Duration::from_millis(*ms)));
            tracing::debug!("Step {}: wait {}ms -> {:?}", index, ms, outcome);
        }
        Step::Expect(expectation) => {
            let snapshot = runtime.snapshot();
            let failures = expectation.check(&snapshot, runtime.document());
            report.failures.extend(failures.into_iter().map(|e| match &expectation.label {
                Some(label) => format!("step {index} ({label}): {e}"),
                None => format!("step {index}: {e}"),
            }));
            report.checkpoints.push(Checkpoint {
                step: index,
                label: expectation.label.clone(),
                snapshot,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP: &str = r#"
name: desktop skills collapse
viewport: { width: 1920, height: 1000 }
blocks:
  - { id: header, height: 400 }
  - { id: skills, height: 100 }
  - { id: skills-grid, height: 300, expanded_height: 600, grow_class: skills-expanded, classes: [skills-expanded] }
  - { id: skillsSeeMore, height: 40 }
  - { id: footer, height: 4000 }
steps:
  - { action: scroll, offset: 1200 }
  - { action: click, target: skillsSeeMore }
  - { action: expect, label: before frame, scroll_offset: 1200, pending_corrections: 1 }
  - { action: frame }
  - action: expect
    label: after frame
    scroll_offset: 900
    expanded: { skills-grid: false }
    all_expanded: { skills: false }
"#;

    #[test]
    fn test_parse_and_run_yaml() {
        let scenario = Scenario::from_yaml_str(DESKTOP).unwrap();
        assert_eq!(scenario.steps.len(), 5);
        assert_eq!(scenario.steps[3], Step::Frame);

        let report = scenario.run(&FolioConfig::default()).unwrap();
        assert!(report.is_success(), "{report}");
        assert_eq!(report.checkpoints.len(), 3);
        assert_eq!(report.final_snapshot().unwrap().scroll_offset, 900.0);
    }

    #[test]
    fn test_failed_expectation_is_reported() {
        let mut scenario = Scenario::from_yaml_str(DESKTOP).unwrap();
        scenario.steps.push(Step::Expect(Expectation {
            label: Some("wrong".to_string()),
            scroll_offset: Some(10.0),
            ..Default::default()
        }));

        let report = scenario.run(&FolioConfig::default()).unwrap();
        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].contains("step 5 (wrong)"));
        assert!(report.to_string().ends_with("1 failure(s)"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let raw = r#"
name: dup
viewport: { width: 800, height: 600 }
blocks:
  - { id: a, height: 10, children: [b] }
  - { id: b, height: 10 }
"#;
        let err = Scenario::from_yaml_str(raw).unwrap_err();
        assert!(matches!(err, FolioError::Scenario { .. }));
    }

    #[test]
    fn test_json_scenario_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(
            &path,
            r#"{
                "name": "resize",
                "viewport": { "width": 1920, "height": 800 },
                "blocks": [ { "id": "grid", "height": 100 } ],
                "steps": [
                    { "action": "resize", "width": 1920, "height": 650 },
                    { "action": "expect", "contact_docked": true }
                ]
            }"#,
        )
        .unwrap();

        let scenario = Scenario::from_path(&path).unwrap();
        let report = scenario.run(&FolioConfig::default()).unwrap();
        assert!(report.is_success(), "{report}");
    }

    #[test]
    fn test_paced_replay_rejects_bad_factor() {
        let scenario = Scenario::from_yaml_str(DESKTOP).unwrap();
        let config = FolioConfig::default();
        for pace in [f64::INFINITY, f64::NAN, -1.0] {
            let err = tokio_test::block_on(scenario.run_paced(&config, pace)).unwrap_err();
            assert!(matches!(err, FolioError::Scenario { .. }), "pace {pace}");
        }
    }

    #[test]
    fn test_paced_replay_rejects_overflowing_wait() {
        let mut scenario = Scenario::from_yaml_str(DESKTOP).unwrap();
        scenario.steps.insert(0, Step::Wait { ms: u64::MAX });
        let err = tokio_test::block_on(scenario.run_paced(&FolioConfig::default(), f64::MAX))
            .unwrap_err();
        assert!(matches!(err, FolioError::Scenario { .. }));
    }

    #[test]
    fn test_paced_replay_matches_fast_replay() {
        let scenario = Scenario::from_yaml_str(DESKTOP).unwrap();
        let config = FolioConfig::default();
        let fast = scenario.run(&config).unwrap();
        let paced = tokio_test::block_on(scenario.run_paced(&config, 0.0)).unwrap();
        assert_eq!(fast, paced);
    }
}
