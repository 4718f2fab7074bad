//! Two-column arrangement.
//!
//! Tags are split into a left and a right column by which half of the view
//! their anchor sits in, dropped into evenly spaced slots near the view
//! edge, then untangled by swapping the positions of tags whose leaders
//! cross. All planning happens in the crop region's local space; placements
//! are mapped back to model space on the way out.

use glam::{DVec2, dvec2};

use crate::errors::LayoutError;
use crate::host::{CropRegion, ElementId, Host};
use crate::log::debug;
use crate::settings::{ArrangeSettings, ElbowPolicy, LayoutSettings, SlotInset};
use crate::types::{BBox, round_to};

use super::adapter::{self, AnnotationElement, LeaderUpdate, Placement};
use super::defaults::MISSING_ANCHOR_NUDGE;
use super::leader::{LeaderSegment, elbow_for};

/// De-crossing sweeps per column
const DECROSS_PASSES: usize = 2;

/// Which column a tag goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Which columns an arrangement may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrangeMode {
    /// Each tag goes to the side opposite its anchor
    #[default]
    BothSides,
    LeftOnly,
    RightOnly,
}

impl ArrangeMode {
    fn side_for(self, anchor: DVec2, view: &BBox) -> Side {
        match self {
            ArrangeMode::LeftOnly => Side::Left,
            ArrangeMode::RightOnly => Side::Right,
            ArrangeMode::BothSides if anchor.x < view.center().x => Side::Right,
            ArrangeMode::BothSides => Side::Left,
        }
    }
}

/// A tag being arranged, in view-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct TagLeader {
    pub id: ElementId,
    pub side: Side,
    /// Anchor the leader ends on
    pub leader_end: DVec2,
    /// `head − center`, constant while the tag moves
    pub head_offset: DVec2,
    pub width: f64,
    pub height: f64,
    /// False when the anchor is a stand-in; such tags move but keep their leader
    pub anchored: bool,
    tag_center: DVec2,
    elbow: DVec2,
    base_line: LeaderSegment,
    end_line: LeaderSegment,
    policy: ElbowPolicy,
    tolerance: f64,
}

impl TagLeader {
    pub fn new(
        id: ElementId,
        side: Side,
        leader_end: DVec2,
        extent: BBox,
        head: DVec2,
        settings: &ArrangeSettings,
    ) -> Self {
        let center = extent.center();
        let mut tag = Self {
            id,
            side,
            leader_end,
            head_offset: head - center,
            width: extent.width(),
            height: extent.height(),
            anchored: true,
            tag_center: center,
            elbow: center,
            base_line: LeaderSegment::Placeholder,
            end_line: LeaderSegment::Placeholder,
            policy: settings.elbow_policy,
            tolerance: settings.short_curve_tolerance.raw(),
        };
        tag.set_tag_center(center);
        tag
    }

    pub fn tag_center(&self) -> DVec2 {
        self.tag_center
    }

    /// Move the tag, recomputing the elbow and both leader segments
    pub fn set_tag_center(&mut self, center: DVec2) {
        self.tag_center = center;
        self.elbow = elbow_for(self.policy, self.leader_end, center);
        self.end_line = LeaderSegment::bound(self.leader_end, self.elbow, self.tolerance);
        self.base_line = LeaderSegment::bound(self.elbow, center, self.tolerance);
    }

    pub fn elbow(&self) -> DVec2 {
        self.elbow
    }

    /// Elbow → tag centre
    pub fn base_line(&self) -> LeaderSegment {
        self.base_line
    }

    /// Leader end → elbow
    pub fn end_line(&self) -> LeaderSegment {
        self.end_line
    }

    /// True if any segment of this leader touches any segment of `other`'s
    pub fn crosses(&self, other: &TagLeader) -> bool {
        let ours = [self.base_line, self.end_line];
        let theirs = [other.base_line, other.end_line];
        ours.iter().any(|a| theirs.iter().any(|b| a.intersects(b)))
    }

    /// Final head, pushed `side_offset` tag widths away from the view centre
    pub fn head(&self, side_offset: f64) -> DVec2 {
        let push = self.width.abs() * side_offset;
        let push = match self.side {
            Side::Left => -push,
            Side::Right => push,
        };
        self.head_offset + self.tag_center + dvec2(push, 0.0)
    }
}

/// Candidate tag centres for one column, bottom to top
pub fn slots(
    view: &BBox,
    side: Side,
    count: usize,
    first_width: f64,
    settings: &ArrangeSettings,
) -> Vec<DVec2> {
    if count == 0 {
        return Vec::new();
    }
    let inset = match settings.slot_inset {
        SlotInset::TagWidths(n) => first_width.abs() * n,
        SlotInset::ViewMargin(f) => view.width() * f,
    };
    let x = match side {
        Side::Left => view.min.x + inset,
        Side::Right => view.max.x - inset,
    };
    let pitch = settings.slot_pitch.raw();
    let start_y = (view.max.y + view.min.y - (count - 1) as f64 * pitch) / 2.0;
    (0..count).map(|i| dvec2(x, start_y + i as f64 * pitch)).collect()
}

/// Give each tag the nearest free slot, tags farthest from the column's
/// outer edge choosing first
pub fn place_in_slots(column: &mut [TagLeader], mut slots: Vec<DVec2>, view: &BBox) {
    column.sort_by(|a, b| {
        let da = edge_distance(a, view);
        let db = edge_distance(b, view);
        db.total_cmp(&da)
    });
    for tag in column.iter_mut() {
        let center = tag.tag_center();
        let nearest = slots
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, slot)| {
                let d = slot.distance(center);
                match best {
                    Some((_, b)) if b <= d => best,
                    _ => Some((i, d)),
                }
            });
        if let Some((i, _)) = nearest {
            tag.set_tag_center(slots.remove(i));
        }
    }
}

fn edge_distance(tag: &TagLeader, view: &BBox) -> f64 {
    match tag.side {
        Side::Left => tag.tag_center().x - view.min.x,
        Side::Right => view.max.x - tag.tag_center().x,
    }
}

/// One sweep over every pair `i < j`, swapping the centres of tags whose
/// leaders cross. Returns the number of swaps.
pub fn decross_pass(column: &mut [TagLeader]) -> usize {
    let mut swaps = 0;
    for i in 0..column.len() {
        for j in i + 1..column.len() {
            if column[i].crosses(&column[j]) {
                let a = column[i].tag_center();
                let b = column[j].tag_center();
                column[i].set_tag_center(b);
                column[j].set_tag_center(a);
                swaps += 1;
            }
        }
    }
    swaps
}

/// Pairs of tags in `column` whose leaders cross
pub fn count_crossings(column: &[TagLeader]) -> usize {
    let mut count = 0;
    for (i, a) in column.iter().enumerate() {
        count += column[i + 1..].iter().filter(|b| a.crosses(b)).count();
    }
    count
}

/// Slot, place and untangle one column
pub fn arrange_column(
    column: &mut [TagLeader],
    side: Side,
    view: &BBox,
    settings: &ArrangeSettings,
) -> usize {
    let Some(first) = column.first() else { return 0 };
    let slots = slots(view, side, column.len(), first.width, settings);
    place_in_slots(column, slots, view);
    (0..DECROSS_PASSES).map(|_| decross_pass(column)).sum()
}

/// What an arrangement did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrangeReport {
    pub left: Vec<ElementId>,
    pub right: Vec<ElementId>,
    /// Selected elements that are not tags
    pub skipped: Vec<ElementId>,
    pub swaps: usize,
    /// Crossings the two passes could not resolve
    pub remaining_crossings: usize,
}

/// Planned arrangement, ready to apply
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    pub placements: Vec<Placement>,
    pub report: ArrangeReport,
}

/// The active crop region, if it encloses any area
pub fn usable_crop<H: Host + ?Sized>(host: &H) -> Result<CropRegion, LayoutError> {
    host.crop_region()
        .filter(|crop| !crop.bounds.is_degenerate())
        .ok_or_else(|| LayoutError::validation("Please set a crop box to the view"))
}

/// Plan an arrangement of the tags among `ids`.
///
/// Reads the host (and measures inside a rolled-back scope) but writes
/// nothing; the caller applies [`Arrangement::placements`].
pub fn arrange<H: Host + ?Sized>(
    host: &mut H,
    ids: &[ElementId],
    mode: ArrangeMode,
    settings: &LayoutSettings,
) -> Result<Arrangement, LayoutError> {
    let crop = usable_crop(host)?;
    let mut report = ArrangeReport::default();

    let mut tags = Vec::with_capacity(ids.len());
    for &id in ids {
        if host.kind(id)?.is_anchored_tag() {
            tags.push(id);
        } else {
            debug!(%id, "not a tag, skipped");
            report.skipped.push(id);
        }
    }
    if tags.is_empty() {
        return Err(LayoutError::validation("Please select at least one tag."));
    }

    let elements = adapter::prepare(host, &tags)?;
    let view = crop.bounds;
    let (mut left, mut right): (Vec<_>, Vec<_>) = elements
        .iter()
        .map(|e| to_local(e, &crop, mode, &settings.arrange))
        .partition(|t| t.side == Side::Left);

    report.swaps += arrange_column(&mut left, Side::Left, &view, &settings.arrange);
    report.swaps += arrange_column(&mut right, Side::Right, &view, &settings.arrange);
    report.remaining_crossings = count_crossings(&left) + count_crossings(&right);
    report.left = left.iter().map(|t| t.id).collect();
    report.right = right.iter().map(|t| t.id).collect();
    debug!(
        left = report.left.len(),
        right = report.right.len(),
        swaps = report.swaps,
        remaining = report.remaining_crossings,
        "arrangement planned"
    );

    let placements = left
        .iter()
        .chain(&right)
        .map(|t| to_placement(t, &crop, settings.arrange.side_offset))
        .collect();
    Ok(Arrangement { placements, report })
}

fn to_local(
    element: &AnnotationElement,
    crop: &CropRegion,
    mode: ArrangeMode,
    settings: &ArrangeSettings,
) -> TagLeader {
    let view = &crop.bounds;
    let local = crop.transform.inverse();
    let (leader_end, anchored) = match element.anchor {
        Some(anchor) => (round_to(crop.to_local(anchor), settings.anchor_precision), true),
        None => (view.center() + dvec2(MISSING_ANCHOR_NUDGE, 0.0), false),
    };
    let side = mode.side_for(leader_end, view);
    let extent = element.bounds.transformed(&local);
    let head = crop.to_local(element.head);
    let mut tag = TagLeader::new(element.id, side, leader_end, extent, head, settings);
    tag.anchored = anchored;
    tag
}

fn to_placement(tag: &TagLeader, crop: &CropRegion, side_offset: f64) -> Placement {
    let head = crop.to_model(tag.head(side_offset));
    let leader = if tag.anchored {
        LeaderUpdate::Attach { elbow: crop.to_model(tag.elbow()) }
    } else {
        LeaderUpdate::Keep
    };
    Placement { id: tag.id, head, leader }
}
