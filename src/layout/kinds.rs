//! Annotation kinds and what each one lets the engine do with its leader.
//!
//! Each kind is its own unit type implementing [`Capabilities`]; the engine
//! dispatches on [`AnnotationKind`] and never inspects host types.

use enum_dispatch::enum_dispatch;

/// Leader capabilities of an annotation kind
#[enum_dispatch]
pub trait Capabilities {
    /// Human-readable kind name for logs and messages
    fn name(&self) -> &'static str;

    /// Whether the kind can carry a leader at all
    fn supports_leader(&self) -> bool;

    /// Whether the leader end can be placed by the engine
    fn can_set_leader_end(&self) -> bool;

    /// Whether the leader bend point can be placed by the engine
    fn can_set_elbow(&self) -> bool;

    /// Kinds whose leader end can be placed but not bent keep the leader's
    /// offset from the head when the leader is stripped, so it can be put
    /// back relative to the moved head.
    fn keeps_leader_offset(&self) -> bool {
        self.supports_leader() && self.can_set_leader_end() && !self.can_set_elbow()
    }
}

/// A tag pointing at model geometry through a bendable leader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnchoredTag;

/// Free-standing text whose leaders can only be removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FreeNote;

/// Room/area style tag with a straight leader and no elbow control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpatialAreaTag;

/// Anything else; moved rigidly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Other;

impl Capabilities for AnchoredTag {
    fn name(&self) -> &'static str { "anchored tag" }
    fn supports_leader(&self) -> bool { true }
    fn can_set_leader_end(&self) -> bool { true }
    fn can_set_elbow(&self) -> bool { true }
}

impl Capabilities for FreeNote {
    fn name(&self) -> &'static str { "free note" }
    fn supports_leader(&self) -> bool { true }
    fn can_set_leader_end(&self) -> bool { false }
    fn can_set_elbow(&self) -> bool { false }
}

impl Capabilities for SpatialAreaTag {
    fn name(&self) -> &'static str { "spatial area tag" }
    fn supports_leader(&self) -> bool { true }
    fn can_set_leader_end(&self) -> bool { true }
    fn can_set_elbow(&self) -> bool { false }
}

impl Capabilities for Other {
    fn name(&self) -> &'static str { "element" }
    fn supports_leader(&self) -> bool { false }
    fn can_set_leader_end(&self) -> bool { false }
    fn can_set_elbow(&self) -> bool { false }
}

/// The kind of an annotation element
#[enum_dispatch(Capabilities)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    AnchoredTag,
    FreeNote,
    SpatialAreaTag,
    Other,
}

impl AnnotationKind {
    pub fn is_anchored_tag(&self) -> bool {
        matches!(self, AnnotationKind::AnchoredTag(_))
    }
}
