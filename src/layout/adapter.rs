//! Geometry adapter: host elements in, uniform records out, placements back.
//!
//! Measurement runs inside a host scope that is always rolled back. Leaders
//! are stripped there so the boxes the engine sorts and aligns on are the
//! labels' own extents, not label-plus-stale-leader.

use glam::DVec2;

use crate::errors::{HostError, LayoutError};
use crate::host::{ElementId, Host, LeaderEndCondition, Transaction};
use crate::log::debug;
use crate::settings::ElbowRise;
use crate::types::BBox;

use super::kinds::{AnnotationKind, Capabilities, Other};
use super::leader::elbow_above_anchor;

const PREPARE_SCOPE: &str = "Prepare tags";

/// One selected annotation, normalized
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationElement {
    pub id: ElementId,
    pub kind: AnnotationKind,
    pub head: DVec2,
    /// Leaderless extent
    pub bounds: BBox,
    pub had_leader: bool,
    pub anchor: Option<DVec2>,
    /// `leader_end − head`, kept for kinds that cannot re-snap their leader
    pub displacement: Option<DVec2>,
}

/// Point of an element's box that an alignment moves onto its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    UpLeft,
    UpRight,
    TopCenter,
}

impl AnnotationElement {
    pub fn up_left(&self) -> DVec2 { self.bounds.up_left() }

    pub fn up_right(&self) -> DVec2 { self.bounds.up_right() }

    pub fn center(&self) -> DVec2 { self.bounds.center() }

    pub fn top(&self) -> f64 { self.bounds.top() }

    /// Anchor of an anchored tag. Other kinds have none, even when their
    /// leader end resolves.
    pub fn tag_anchor(&self) -> Option<DVec2> {
        self.anchor.filter(|_| self.kind.is_anchored_tag())
    }

    /// X used to order elements by where they point: the tag anchor if there
    /// is one, the box centre otherwise
    pub fn reference_x(&self) -> f64 {
        self.tag_anchor().map_or_else(|| self.center().x, |a| a.x)
    }

    pub fn handle(&self, handle: Handle) -> DVec2 {
        match handle {
            Handle::UpLeft => self.bounds.up_left(),
            Handle::UpRight => self.bounds.up_right(),
            Handle::TopCenter => self.bounds.top_center(),
        }
    }

    /// Translate the element so `handle` lands on `target`, re-deriving the
    /// leader for the new head
    pub fn move_to(&self, target: DVec2, handle: Handle, rise: &ElbowRise) -> Placement {
        self.placed(self.head + (target - self.handle(handle)), rise)
    }

    /// Put an anchored tag's head on `target`. Anything else is moved so
    /// `handle` lands there.
    pub fn place_head(&self, target: DVec2, handle: Handle, rise: &ElbowRise) -> Placement {
        if self.tag_anchor().is_some() {
            self.placed(target, rise)
        } else {
            self.move_to(target, handle, rise)
        }
    }

    fn placed(&self, head: DVec2, rise: &ElbowRise) -> Placement {
        let leader = match (self.anchor, self.displacement) {
            (Some(anchor), _) if self.had_leader && self.kind.can_set_elbow() => {
                LeaderUpdate::Snap { end: anchor, elbow: elbow_above_anchor(anchor, head.x, rise) }
            }
            (_, Some(offset)) => LeaderUpdate::Restore { end: head + offset },
            _ => LeaderUpdate::Keep,
        };
        Placement { id: self.id, head, leader }
    }
}

/// What happens to an element's leader when it is written back
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeaderUpdate {
    /// Leave the leader alone
    Keep,
    /// Free end on the anchor, elbow placed explicitly
    Snap { end: DVec2, elbow: DVec2 },
    /// Re-attach a stripped leader at a fixed offset from the new head
    Restore { end: DVec2 },
    /// Host-attached end, elbow placed explicitly
    Attach { elbow: DVec2 },
}

/// New position of one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub id: ElementId,
    pub head: DVec2,
    pub leader: LeaderUpdate,
}

/// Normalize `ids` into records, preserving order.
///
/// Leaders are stripped inside a scope that is rolled back before
/// returning, whatever the outcome.
pub fn prepare<H: Host + ?Sized>(
    host: &mut H,
    ids: &[ElementId],
) -> Result<Vec<AnnotationElement>, LayoutError> {
    let mut tx = Transaction::start(host, PREPARE_SCOPE)?;
    let mut elements = Vec::with_capacity(ids.len());
    for &id in ids {
        elements.push(measure(&mut *tx, id)?);
    }
    tx.rollback();
    debug!(count = elements.len(), "prepared annotation elements");
    Ok(elements)
}

fn measure<H: Host + ?Sized>(host: &mut H, id: ElementId) -> Result<AnnotationElement, HostError> {
    let host_kind = host.kind(id)?;
    let anchor = if host_kind.can_set_leader_end() { host.resolve_anchor(id)? } else { None };

    let head = host.head_position(id)?;
    let had_leader = host_kind.supports_leader() && host.has_leader(id)?;
    let mut displacement = None;
    if had_leader {
        if host_kind.keeps_leader_offset() {
            displacement = host.leader_end(id)?.map(|end| end - head);
        }
        host.remove_leader(id)?;
    }

    let kind = if host_kind.is_anchored_tag() && anchor.is_none() {
        debug!(%id, "anchor unresolved, moving rigidly");
        Other.into()
    } else {
        host_kind
    };
    let bounds = host.bounding_box(id)?.ok_or_else(|| {
        HostError::failure(format!("{} {id} has no bounding box in the active view", kind.name()))
    })?;

    Ok(AnnotationElement { id, kind, head, bounds, had_leader, anchor, displacement })
}

/// Write placements back through the host. The caller owns the scope.
pub fn apply<H: Host + ?Sized>(host: &mut H, placements: &[Placement]) -> Result<(), HostError> {
    for placement in placements {
        let id = placement.id;
        match placement.leader {
            LeaderUpdate::Keep => host.set_head_position(id, placement.head)?,
            LeaderUpdate::Snap { end, elbow } => {
                host.set_leader_end_condition(id, LeaderEndCondition::Free)?;
                host.set_leader_end(id, end)?;
                host.set_leader_elbow(id, elbow)?;
                host.set_head_position(id, placement.head)?;
            }
            LeaderUpdate::Restore { end } => {
                host.set_head_position(id, placement.head)?;
                host.set_leader_end(id, end)?;
            }
            LeaderUpdate::Attach { elbow } => {
                host.set_leader_end_condition(id, LeaderEndCondition::Attached)?;
                host.set_head_position(id, placement.head)?;
                host.set_leader_elbow(id, elbow)?;
            }
        }
    }
    Ok(())
}
