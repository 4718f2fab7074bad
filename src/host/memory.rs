//! In-memory reference host.
//!
//! A small document model good enough to drive every operation end to end:
//! tags are boxes whose head sits at a fixed offset from the upper-left
//! corner (none unless given one), leaders are an end
//! point plus optional elbow, and a leader inflates the reported bounding box
//! the way a drawn leader does in a real document. Scopes snapshot the whole
//! state, so rollback is exact.

use std::collections::{BTreeMap, HashSet, VecDeque};

use glam::{DVec2, dvec2};

use crate::errors::HostError;
use crate::layout::{AnnotationKind, Capabilities};
use crate::types::BBox;

use super::{CropRegion, ElementId, Host, LeaderEndCondition};

/// A leader as stored by the memory host
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemoryLeader {
    pub end: DVec2,
    pub elbow: Option<DVec2>,
    pub condition: LeaderEndCondition,
}

/// An annotation element
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryAnnotation {
    pub kind: AnnotationKind,
    pub head: DVec2,
    /// Head position relative to the label box's upper-left corner
    pub head_offset: DVec2,
    /// Label width and height
    pub size: DVec2,
    pub leader: Option<MemoryLeader>,
    /// The model element this annotation refers to
    pub target: Option<ElementId>,
}

impl MemoryAnnotation {
    pub fn new(kind: impl Into<AnnotationKind>, head: DVec2, size: DVec2) -> Self {
        Self {
            kind: kind.into(),
            head,
            head_offset: DVec2::ZERO,
            size,
            leader: None,
            target: None,
        }
    }

    pub fn with_head_offset(mut self, offset: DVec2) -> Self {
        self.head_offset = offset;
        self
    }

    pub fn tagging(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_leader(mut self, end: DVec2, elbow: Option<DVec2>) -> Self {
        self.leader = Some(MemoryLeader { end, elbow, condition: LeaderEndCondition::Free });
        self
    }

    /// Label extent, leader excluded
    pub fn label_box(&self) -> BBox {
        let up_left = self.head - self.head_offset;
        BBox::from_corners(
            dvec2(up_left.x, up_left.y - self.size.y),
            dvec2(up_left.x + self.size.x, up_left.y),
        )
    }
}

/// Tagged model geometry
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MemoryGeometry {
    pub location: Option<DVec2>,
    pub extent: Option<BBox>,
}

/// Scripted answer to the next interactive pick
#[derive(Clone, Debug, PartialEq)]
pub enum Pick {
    Elements(Vec<ElementId>),
    Tag(ElementId),
    Point(DVec2),
    Cancel,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Document {
    annotations: BTreeMap<ElementId, MemoryAnnotation>,
    geometry: BTreeMap<ElementId, MemoryGeometry>,
    next_id: u64,
}

/// In-memory [`Host`]
#[derive(Clone, Debug, Default)]
pub struct MemoryHost {
    doc: Document,
    scopes: Vec<(String, Document)>,
    committed: Vec<String>,
    selection: Vec<ElementId>,
    picks: VecDeque<Pick>,
    crop: Option<CropRegion>,
    failing_writes: HashSet<ElementId>,
    failing_tags: HashSet<ElementId>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> ElementId {
        self.doc.next_id += 1;
        ElementId(self.doc.next_id)
    }

    /// Add tagged geometry with a location point
    pub fn add_point(&mut self, location: DVec2) -> ElementId {
        let id = self.allocate();
        self.doc.geometry.insert(id, MemoryGeometry { location: Some(location), extent: None });
        id
    }

    /// Add tagged geometry known only by its extent
    pub fn add_extent(&mut self, extent: BBox) -> ElementId {
        let id = self.allocate();
        self.doc.geometry.insert(id, MemoryGeometry { location: None, extent: Some(extent) });
        id
    }

    pub fn add_annotation(&mut self, annotation: MemoryAnnotation) -> ElementId {
        let id = self.allocate();
        self.doc.annotations.insert(id, annotation);
        id
    }

    /// Remove tagged geometry, leaving any tag pointing at it broken
    pub fn delete_geometry(&mut self, id: ElementId) {
        self.doc.geometry.remove(&id);
    }

    pub fn annotation(&self, id: ElementId) -> Option<&MemoryAnnotation> {
        self.doc.annotations.get(&id)
    }

    pub fn annotations(&self) -> impl Iterator<Item = (ElementId, &MemoryAnnotation)> {
        self.doc.annotations.iter().map(|(id, a)| (*id, a))
    }

    pub fn select(&mut self, ids: &[ElementId]) {
        self.selection = ids.to_vec();
    }

    pub fn set_crop(&mut self, crop: Option<CropRegion>) {
        self.crop = crop;
    }

    pub fn queue_pick(&mut self, pick: Pick) {
        self.picks.push_back(pick);
    }

    /// Make every later mutation of `id` fail
    pub fn fail_writes_to(&mut self, id: ElementId) {
        self.failing_writes.insert(id);
    }

    /// Make `create_tag` fail for `target`
    pub fn fail_tagging(&mut self, target: ElementId) {
        self.failing_tags.insert(target);
    }

    /// Names of the scopes committed at the outermost level, oldest first
    pub fn committed_scopes(&self) -> &[String] {
        &self.committed
    }

    /// True while any scope is open
    pub fn in_scope(&self) -> bool {
        !self.scopes.is_empty()
    }

    /// Structural equality of the document with another host's
    pub fn same_document(&self, other: &MemoryHost) -> bool {
        self.doc == other.doc
    }

    fn anchor_of(&self, target: Option<ElementId>) -> Option<DVec2> {
        let geometry = self.doc.geometry.get(&target?)?;
        geometry.location.or_else(|| geometry.extent.map(|e| e.center()))
    }

    fn get(&self, id: ElementId) -> Result<&MemoryAnnotation, HostError> {
        self.doc.annotations.get(&id).ok_or(HostError::UnknownElement { id })
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut MemoryAnnotation, HostError> {
        if self.scopes.is_empty() {
            return Err(HostError::NoScope);
        }
        if self.failing_writes.contains(&id) {
            return Err(HostError::failure(format!("write to {id} rejected")));
        }
        self.doc.annotations.get_mut(&id).ok_or(HostError::UnknownElement { id })
    }

    fn next_pick(&mut self) -> Result<Pick, HostError> {
        match self.picks.pop_front() {
            Some(Pick::Cancel) | None => Err(HostError::Cancelled),
            Some(pick) => Ok(pick),
        }
    }
}

impl Host for MemoryHost {
    fn selection(&self) -> Vec<ElementId> {
        self.selection.clone()
    }

    fn set_selection(&mut self, ids: &[ElementId]) {
        self.selection = ids.to_vec();
    }

    fn pick_elements(&mut self, _prompt: &str) -> Result<Vec<ElementId>, HostError> {
        match self.next_pick()? {
            Pick::Elements(ids) => Ok(ids),
            other => Err(HostError::failure(format!("expected an element pick, got {other:?}"))),
        }
    }

    fn pick_tag(&mut self, _prompt: &str) -> Result<ElementId, HostError> {
        match self.next_pick()? {
            Pick::Tag(id) => Ok(id),
            other => Err(HostError::failure(format!("expected a tag pick, got {other:?}"))),
        }
    }

    fn pick_point(&mut self, _prompt: &str) -> Result<DVec2, HostError> {
        match self.next_pick()? {
            Pick::Point(p) => Ok(p),
            other => Err(HostError::failure(format!("expected a point pick, got {other:?}"))),
        }
    }

    fn kind(&self, id: ElementId) -> Result<AnnotationKind, HostError> {
        if let Some(annotation) = self.doc.annotations.get(&id) {
            return Ok(annotation.kind);
        }
        if self.doc.geometry.contains_key(&id) {
            return Ok(crate::layout::Other.into());
        }
        Err(HostError::UnknownElement { id })
    }

    fn resolve_anchor(&self, id: ElementId) -> Result<Option<DVec2>, HostError> {
        Ok(self.anchor_of(self.get(id)?.target))
    }

    fn bounding_box(&self, id: ElementId) -> Result<Option<BBox>, HostError> {
        if let Some(geometry) = self.doc.geometry.get(&id) {
            return Ok(geometry
                .extent
                .or_else(|| geometry.location.map(|p| BBox::from_corners(p, p))));
        }
        let annotation = self.get(id)?;
        let mut bb = annotation.label_box();
        if let Some(leader) = &annotation.leader {
            bb.expand_point(leader.end);
            if let Some(elbow) = leader.elbow {
                bb.expand_point(elbow);
            }
        }
        Ok(Some(bb))
    }

    fn crop_region(&self) -> Option<CropRegion> {
        self.crop
    }

    fn head_position(&self, id: ElementId) -> Result<DVec2, HostError> {
        Ok(self.get(id)?.head)
    }

    fn has_leader(&self, id: ElementId) -> Result<bool, HostError> {
        Ok(self.get(id)?.leader.is_some())
    }

    fn leader_end(&self, id: ElementId) -> Result<Option<DVec2>, HostError> {
        Ok(self.get(id)?.leader.map(|l| l.end))
    }

    fn leader_end_condition(&self, id: ElementId) -> Result<LeaderEndCondition, HostError> {
        Ok(self.get(id)?.leader.map(|l| l.condition).unwrap_or_default())
    }

    fn set_head_position(&mut self, id: ElementId, head: DVec2) -> Result<(), HostError> {
        self.get_mut(id)?.head = head;
        Ok(())
    }

    fn set_leader_end(&mut self, id: ElementId, end: DVec2) -> Result<(), HostError> {
        let annotation = self.get_mut(id)?;
        if !annotation.kind.supports_leader() {
            return Err(HostError::Unsupported { id, operation: "leaders" });
        }
        match &mut annotation.leader {
            Some(leader) => leader.end = end,
            None => {
                annotation.leader =
                    Some(MemoryLeader { end, elbow: None, condition: LeaderEndCondition::Free });
            }
        }
        Ok(())
    }

    fn set_leader_elbow(&mut self, id: ElementId, elbow: DVec2) -> Result<(), HostError> {
        let annotation = self.get_mut(id)?;
        if !annotation.kind.can_set_elbow() {
            return Err(HostError::Unsupported { id, operation: "leader elbows" });
        }
        let leader = annotation.leader.as_mut().ok_or(HostError::NoLeader { id })?;
        leader.elbow = Some(elbow);
        Ok(())
    }

    fn set_leader_end_condition(
        &mut self,
        id: ElementId,
        condition: LeaderEndCondition,
    ) -> Result<(), HostError> {
        let anchor = self.anchor_of(self.get(id)?.target);
        let annotation = self.get_mut(id)?;
        match (condition, &mut annotation.leader) {
            (LeaderEndCondition::Free, Some(leader)) => leader.condition = condition,
            (LeaderEndCondition::Free, None) => return Err(HostError::NoLeader { id }),
            (LeaderEndCondition::Attached, leader) => {
                let end = anchor.ok_or_else(|| {
                    HostError::failure(format!("{id} has no geometry to attach to"))
                })?;
                let elbow = leader.as_ref().and_then(|l| l.elbow);
                *leader = Some(MemoryLeader { end, elbow, condition });
            }
        }
        Ok(())
    }

    fn remove_leader(&mut self, id: ElementId) -> Result<(), HostError> {
        self.get_mut(id)?.leader = None;
        Ok(())
    }

    fn create_tag(
        &mut self,
        template: ElementId,
        target: ElementId,
        head: DVec2,
    ) -> Result<ElementId, HostError> {
        if self.scopes.is_empty() {
            return Err(HostError::NoScope);
        }
        if self.failing_tags.contains(&target) {
            return Err(HostError::failure(format!("{target} cannot be tagged")));
        }
        let template = self.get(template)?.clone();
        let anchor = self
            .anchor_of(Some(target))
            .ok_or_else(|| HostError::failure(format!("{target} has no taggable geometry")))?;
        let mut tag = MemoryAnnotation::new(template.kind, head, template.size)
            .with_head_offset(template.head_offset)
            .tagging(target);
        if template.leader.is_some() {
            tag = tag.with_leader(anchor, None);
        }
        Ok(self.add_annotation(tag))
    }

    fn begin_scope(&mut self, name: &str) -> Result<(), HostError> {
        self.scopes.push((name.to_string(), self.doc.clone()));
        Ok(())
    }

    fn rollback_scope(&mut self) {
        if let Some((_, snapshot)) = self.scopes.pop() {
            self.doc = snapshot;
        }
    }

    fn commit_scope(&mut self) -> Result<(), HostError> {
        let (name, _) = self.scopes.pop().ok_or(HostError::NoScope)?;
        if self.scopes.is_empty() {
            self.committed.push(name);
        }
        Ok(())
    }
}
