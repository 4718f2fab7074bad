//! User-facing commands.
//!
//! A command gathers its selection (prompting when nothing is selected),
//! validates it, plans through the layout engine, and writes the result back
//! inside one host scope. Errors never escape: [`Command::execute`] folds
//! them into an [`Outcome`].

use glam::dvec2;

use crate::errors::{HostError, LayoutError};
use crate::host::{ElementId, Host, LeaderEndCondition, Transaction};
use crate::layout::adapter::{apply, prepare};
use crate::layout::align::{AlignKind, align};
use crate::layout::arrange::{ArrangeMode, ArrangeReport, Arrangement, arrange};
use crate::log::{debug, info, warn};
use crate::settings::LayoutSettings;

const ALIGN_PROMPT: &str = "Pick elements to be aligned";
const DISTRIBUTE_PROMPT: &str = "Select tags to distribute";
const ARRANGE_PROMPT: &str = "Select tags to arrange";
const TARGETS_PROMPT: &str = "Select elements to tag";
const TEMPLATE_PROMPT: &str = "Select a tag to use as template";
const POINT_PROMPT: &str = "Click to specify vertical position for tags";

const ARRANGE_SCOPE: &str = "Arrange Tags";
const CREATE_TAGS_SCOPE: &str = "Create Tags";

/// How a command ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Cancelled,
    Failed(String),
}

impl Outcome {
    pub fn from_result<T>(result: Result<T, LayoutError>) -> Self {
        match result {
            Ok(_) => Outcome::Succeeded,
            Err(LayoutError::Cancelled) => Outcome::Cancelled,
            Err(err) => Outcome::Failed(err.to_string()),
        }
    }
}

/// Everything a user can invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Align(AlignKind),
    Arrange(ArrangeMode),
    AutoTag,
}

impl Command {
    /// Scope name the command commits under
    pub fn label(&self) -> &'static str {
        match self {
            Command::Align(kind) => kind.label(),
            Command::Arrange(_) => ARRANGE_SCOPE,
            Command::AutoTag => CREATE_TAGS_SCOPE,
        }
    }

    pub fn execute<H: Host + ?Sized>(&self, host: &mut H, settings: &LayoutSettings) -> Outcome {
        let result = settings.validate().and_then(|()| match *self {
            Command::Align(kind) => align_selection(host, kind, settings).map(drop),
            Command::Arrange(mode) => arrange_selection(host, mode, settings).map(drop),
            Command::AutoTag => auto_tag(host).map(drop),
        });
        let outcome = Outcome::from_result(result);
        match &outcome {
            Outcome::Succeeded => {
                info!(command = self.label(), "command succeeded");
            }
            Outcome::Cancelled => {
                debug!(command = self.label(), "command cancelled");
            }
            Outcome::Failed(message) => {
                warn!(command = self.label(), %message, "command failed");
            }
        }
        outcome
    }
}

/// The current selection, or a fresh pick when nothing is selected. An
/// empty pick counts as a cancel.
fn selection_or_pick<H: Host + ?Sized>(
    host: &mut H,
    prompt: &str,
) -> Result<Vec<ElementId>, LayoutError> {
    let selected = host.selection();
    if !selected.is_empty() {
        return Ok(selected);
    }
    let picked = host.pick_elements(prompt)?;
    if picked.is_empty() {
        return Err(LayoutError::Cancelled);
    }
    Ok(picked)
}

/// Align or distribute the selection. Returns how many elements moved.
///
/// Distribution only considers anchored tags; anything else selected is
/// left where it is and does not count towards the minimum.
pub fn align_selection<H: Host + ?Sized>(
    host: &mut H,
    kind: AlignKind,
    settings: &LayoutSettings,
) -> Result<usize, LayoutError> {
    let original = host.selection();
    let prompt = if kind.is_distribute() { DISTRIBUTE_PROMPT } else { ALIGN_PROMPT };
    let mut ids = selection_or_pick(host, prompt)?;
    if kind.is_distribute() {
        ids = anchored_tags(host, ids)?;
    }

    let min = kind.min_elements();
    if ids.len() < min {
        let message = if kind.is_distribute() {
            format!("Please select at least {min} tags to distribute.")
        } else {
            format!("Please select at least {min} elements to align.")
        };
        return Err(LayoutError::validation(message));
    }

    let elements = prepare(host, &ids)?;
    let placements = align(&elements, kind, settings);

    let mut tx = Transaction::start(host, kind.label())?;
    apply(&mut *tx, &placements)?;
    tx.commit()?;

    host.set_selection(&original);
    Ok(placements.len())
}

fn anchored_tags<H: Host + ?Sized>(
    host: &H,
    ids: Vec<ElementId>,
) -> Result<Vec<ElementId>, HostError> {
    let mut tags = Vec::with_capacity(ids.len());
    for id in ids {
        if host.kind(id)?.is_anchored_tag() {
            tags.push(id);
        }
    }
    Ok(tags)
}

/// Arrange the selected tags into side columns
pub fn arrange_selection<H: Host + ?Sized>(
    host: &mut H,
    mode: ArrangeMode,
    settings: &LayoutSettings,
) -> Result<ArrangeReport, LayoutError> {
    let original = host.selection();
    let ids = selection_or_pick(host, ARRANGE_PROMPT)?;
    let Arrangement { placements, report } = arrange(host, &ids, mode, settings)?;

    let mut tx = Transaction::start(host, ARRANGE_SCOPE)?;
    apply(&mut *tx, &placements)?;
    tx.commit()?;

    host.set_selection(&original);
    Ok(report)
}

/// What a batch auto-tag did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoTagReport {
    /// `(tagged element, new tag)`
    pub created: Vec<(ElementId, ElementId)>,
    /// Elements that were not tagged, with the reason
    pub skipped: Vec<(ElementId, String)>,
}

/// Tag every picked element with a copy of a template tag, all heads on the
/// picked point's horizontal.
///
/// Elements that fail are skipped; the rest of the batch still commits.
pub fn auto_tag<H: Host + ?Sized>(host: &mut H) -> Result<AutoTagReport, LayoutError> {
    let targets = host.pick_elements(TARGETS_PROMPT)?;
    if targets.is_empty() {
        return Err(LayoutError::Cancelled);
    }
    let template = host.pick_tag(TEMPLATE_PROMPT)?;
    if !host.kind(template)?.is_anchored_tag() {
        return Err(LayoutError::validation("Selected element is not a valid tag."));
    }
    let point = host.pick_point(POINT_PROMPT)?;
    let condition = if host.has_leader(template)? {
        Some(host.leader_end_condition(template)?)
    } else {
        None
    };

    let mut report = AutoTagReport::default();
    let mut tx = Transaction::start(host, CREATE_TAGS_SCOPE)?;
    for &target in &targets {
        match tag_one(&mut *tx, template, target, point.y, condition) {
            Ok(Some(tag)) => report.created.push((target, tag)),
            Ok(None) => {
                debug!(%target, "no bounding box, skipped");
                report.skipped.push((target, "no bounding box in the active view".to_string()));
            }
            Err(err) => {
                warn!(%target, error = %err, "could not tag element");
                report.skipped.push((target, err.to_string()));
            }
        }
    }
    tx.commit()?;
    debug!(created = report.created.len(), skipped = report.skipped.len(), "auto-tag done");
    Ok(report)
}

/// Tag one element in its own nested scope, so a failure halfway leaves
/// nothing behind
fn tag_one<H: Host + ?Sized>(
    host: &mut H,
    template: ElementId,
    target: ElementId,
    y: f64,
    condition: Option<LeaderEndCondition>,
) -> Result<Option<ElementId>, HostError> {
    let Some(bounds) = host.bounding_box(target)? else {
        return Ok(None);
    };
    let mut tx = Transaction::start(host, format!("Tag {target}"))?;
    let tag = tx.create_tag(template, target, dvec2(bounds.center().x, y))?;
    if let Some(condition) = condition {
        tx.set_leader_end_condition(tag, condition)?;
    }
    tx.commit()?;
    Ok(Some(tag))
}
