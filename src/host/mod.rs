//! The host document seam.
//!
//! Everything the engine knows about the document model comes through
//! [`Host`]: element classification, anchor and extent queries, leader and
//! head mutation, interactive picks, and the scoped mutation boundary that
//! [`Transaction`] wraps.

pub mod memory;
mod transaction;

use std::fmt;

use glam::{DAffine2, DVec2};

use crate::errors::HostError;
use crate::layout::AnnotationKind;
use crate::types::BBox;

pub use transaction::Transaction;

/// Opaque host identifier for an element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a leader's far end behaves when the tagged element moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LeaderEndCondition {
    /// The leader end is placed explicitly and stays where it is put
    #[default]
    Free,
    /// The host keeps the leader end glued to the tagged element
    Attached,
}

/// The active view's crop region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRegion {
    /// Extent in view-local coordinates
    pub bounds: BBox,
    /// View-local → model transform
    pub transform: DAffine2,
}

impl CropRegion {
    /// An axis-aligned crop whose local space is model space
    pub fn axis_aligned(bounds: BBox) -> Self {
        Self { bounds, transform: DAffine2::IDENTITY }
    }

    pub fn to_local(&self, model: DVec2) -> DVec2 {
        self.transform.inverse().transform_point2(model)
    }

    pub fn to_model(&self, local: DVec2) -> DVec2 {
        self.transform.transform_point2(local)
    }
}

/// Host collaborator consumed by the layout engine.
///
/// Mutating methods are only valid inside a scope opened with
/// [`begin_scope`](Host::begin_scope). Scopes nest; rolling back a scope
/// restores the state at its `begin_scope`.
pub trait Host {
    // ---- selection and picking ----

    /// Currently selected elements, in selection order
    fn selection(&self) -> Vec<ElementId>;

    fn set_selection(&mut self, ids: &[ElementId]);

    /// Ask the user to pick elements. `HostError::Cancelled` on abort.
    fn pick_elements(&mut self, prompt: &str) -> Result<Vec<ElementId>, HostError>;

    /// Ask the user to pick a single tag
    fn pick_tag(&mut self, prompt: &str) -> Result<ElementId, HostError>;

    /// Ask the user to pick a point in the view
    fn pick_point(&mut self, prompt: &str) -> Result<DVec2, HostError>;

    // ---- queries ----

    fn kind(&self, id: ElementId) -> Result<AnnotationKind, HostError>;

    /// Location point of the tagged geometry, or its bounding-box centroid.
    /// `None` when the reference is broken or the element tags nothing.
    fn resolve_anchor(&self, id: ElementId) -> Result<Option<DVec2>, HostError>;

    /// View-projected extent of an element, leader included if it has one
    fn bounding_box(&self, id: ElementId) -> Result<Option<BBox>, HostError>;

    /// `None` when the active view has no active crop
    fn crop_region(&self) -> Option<CropRegion>;

    fn head_position(&self, id: ElementId) -> Result<DVec2, HostError>;

    fn has_leader(&self, id: ElementId) -> Result<bool, HostError>;

    fn leader_end(&self, id: ElementId) -> Result<Option<DVec2>, HostError>;

    fn leader_end_condition(&self, id: ElementId) -> Result<LeaderEndCondition, HostError>;

    // ---- mutation ----

    fn set_head_position(&mut self, id: ElementId, head: DVec2) -> Result<(), HostError>;

    /// Set the leader end, attaching a leader if the element had none
    fn set_leader_end(&mut self, id: ElementId, end: DVec2) -> Result<(), HostError>;

    fn set_leader_elbow(&mut self, id: ElementId, elbow: DVec2) -> Result<(), HostError>;

    fn set_leader_end_condition(
        &mut self,
        id: ElementId,
        condition: LeaderEndCondition,
    ) -> Result<(), HostError>;

    fn remove_leader(&mut self, id: ElementId) -> Result<(), HostError>;

    /// Create a tag of `template`'s type on `target`, with its head at `head`
    fn create_tag(
        &mut self,
        template: ElementId,
        target: ElementId,
        head: DVec2,
    ) -> Result<ElementId, HostError>;

    // ---- mutation scopes ----

    fn begin_scope(&mut self, name: &str) -> Result<(), HostError>;

    /// Discard every mutation since the matching `begin_scope`
    fn rollback_scope(&mut self);

    fn commit_scope(&mut self) -> Result<(), HostError>;
}
