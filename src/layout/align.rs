//! Align and distribute.
//!
//! Every function here is pure: prepared records in, placements out. Left and
//! Center put each anchored tag's head on the target point; everything else
//! is a rigid translation bringing one [`Handle`] of the element there.

use glam::{DVec2, dvec2};

use crate::log::debug;
use crate::settings::LayoutSettings;

use super::adapter::{AnnotationElement, Handle, LeaderUpdate, Placement};
use super::defaults::CENTER_TIE_EPSILON;

/// The eight align and distribute operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignKind {
    Left,
    Right,
    Top,
    Bottom,
    Center,
    Middle,
    DistributeVertical,
    DistributeHorizontal,
}

impl AlignKind {
    pub const ALL: [AlignKind; 8] = [
        AlignKind::Left,
        AlignKind::Right,
        AlignKind::Top,
        AlignKind::Bottom,
        AlignKind::Center,
        AlignKind::Middle,
        AlignKind::DistributeVertical,
        AlignKind::DistributeHorizontal,
    ];

    /// Name of the host scope the operation commits under
    pub fn label(self) -> &'static str {
        match self {
            AlignKind::Left => "Align Left",
            AlignKind::Right => "Align Right",
            AlignKind::Top => "Align Up",
            AlignKind::Bottom => "Align Down",
            AlignKind::Center => "Align Center",
            AlignKind::Middle => "Align Middle",
            AlignKind::DistributeVertical => "Distribute Vertically",
            AlignKind::DistributeHorizontal => "Distribute Horizontally",
        }
    }

    pub fn is_distribute(self) -> bool {
        matches!(self, AlignKind::DistributeVertical | AlignKind::DistributeHorizontal)
    }

    /// Smallest selection the command accepts
    pub fn min_elements(self) -> usize {
        if self.is_distribute() { 3 } else { 2 }
    }
}

/// Plan `kind` over `elements`. Fewer than two elements plan nothing.
pub fn align(
    elements: &[AnnotationElement],
    kind: AlignKind,
    settings: &LayoutSettings,
) -> Vec<Placement> {
    if elements.len() < 2 {
        return Vec::new();
    }
    debug!(?kind, count = elements.len(), "planning alignment");
    let pitch = settings.pitch.raw();
    match kind {
        AlignKind::Left => align_column(elements, Column::Left, pitch, settings),
        AlignKind::Right => align_column(elements, Column::Right, pitch, settings),
        AlignKind::Top => {
            let y = max_top(elements);
            align_rows(elements, y, Handle::UpRight, settings)
        }
        AlignKind::Bottom => {
            let y = min_top(elements);
            align_rows(elements, y, Handle::TopCenter, settings)
        }
        AlignKind::Middle => {
            let y = (max_top(elements) + min_top(elements)) / 2.0;
            align_rows(elements, y, Handle::TopCenter, settings)
        }
        AlignKind::Center => align_center(elements, pitch, settings),
        AlignKind::DistributeVertical => distribute(elements, Axis::Y),
        AlignKind::DistributeHorizontal => distribute(elements, Axis::X),
    }
}

fn max_top(elements: &[AnnotationElement]) -> f64 {
    elements.iter().map(|e| e.top()).fold(f64::NEG_INFINITY, f64::max)
}

fn min_top(elements: &[AnnotationElement]) -> f64 {
    elements.iter().map(|e| e.top()).fold(f64::INFINITY, f64::min)
}

/// First element minimizing `key`
fn first_min_by<'a>(
    elements: &'a [AnnotationElement],
    key: impl Fn(&AnnotationElement) -> f64,
) -> Option<&'a AnnotationElement> {
    let mut best: Option<(&AnnotationElement, f64)> = None;
    for e in elements {
        let k = key(e);
        if best.is_none_or(|(_, b)| k < b) {
            best = Some((e, k));
        }
    }
    best.map(|(e, _)| e)
}

/// Stable sort, largest `distance` first
fn farthest_first<'a>(
    mut items: Vec<&'a AnnotationElement>,
    distance: impl Fn(&AnnotationElement) -> f64,
) -> Vec<&'a AnnotationElement> {
    items.sort_by(|a, b| distance(*b).total_cmp(&distance(*a)));
    items
}

/// Stack `items` downwards from `cursor`, one pitch apart, each placed at
/// `x` by `place`. Returns the cursor below the last element.
fn stack(
    items: &[&AnnotationElement],
    x: f64,
    cursor: f64,
    pitch: f64,
    place: impl Fn(&AnnotationElement, DVec2) -> Placement,
    out: &mut Vec<Placement>,
) -> f64 {
    items.iter().fold(cursor, |y, e| {
        out.push(place(*e, dvec2(x, y)));
        y - pitch
    })
}

#[derive(Clone, Copy)]
enum Column {
    Left,
    Right,
}

fn align_column(
    elements: &[AnnotationElement],
    column: Column,
    pitch: f64,
    settings: &LayoutSettings,
) -> Vec<Placement> {
    let line_x = match column {
        Column::Left => first_min_by(elements, |e| e.up_right().x).map(|e| e.up_left().x),
        Column::Right => first_min_by(elements, |e| -e.up_right().x).map(|e| e.up_right().x),
    };
    let Some(line_x) = line_x else { return Vec::new() };

    // untagged elements share key 0 and keep selection order
    let sorted = farthest_first(elements.iter().collect(), |e| {
        e.tag_anchor().map_or(0.0, |a| (a.x - line_x).abs())
    });
    let start = sorted.first().map_or(0.0, |e| e.top());
    let rise = &settings.elbow_rise;
    let mut out = Vec::with_capacity(elements.len());
    match column {
        Column::Left => {
            let place = |e: &AnnotationElement, at: DVec2| e.place_head(at, Handle::UpLeft, rise);
            stack(&sorted, line_x, start, pitch, place, &mut out);
        }
        Column::Right => {
            let place = |e: &AnnotationElement, at: DVec2| e.move_to(at, Handle::UpRight, rise);
            stack(&sorted, line_x, start, pitch, place, &mut out);
        }
    }
    out
}

fn align_rows(
    elements: &[AnnotationElement],
    y: f64,
    handle: Handle,
    settings: &LayoutSettings,
) -> Vec<Placement> {
    elements
        .iter()
        .map(|e| {
            let target = dvec2(e.handle(handle).x, y);
            e.move_to(target, handle, &settings.elbow_rise)
        })
        .collect()
}

/// Centre bands: the farther side group on top, then the nearer one, then
/// the element sitting on the centre line, all stacked on one cursor.
fn align_center(
    elements: &[AnnotationElement],
    pitch: f64,
    settings: &LayoutSettings,
) -> Vec<Placement> {
    let (Some(leftmost), Some(rightmost)) = (
        first_min_by(elements, |e| e.up_right().x),
        first_min_by(elements, |e| -e.up_right().x),
    ) else {
        return Vec::new();
    };
    let center_x = (leftmost.center().x + rightmost.center().x) / 2.0;
    let distance = |e: &AnnotationElement| (e.reference_x() - center_x).abs();

    let center = first_min_by(elements, distance)
        .filter(|e| distance(*e) <= settings.center_threshold.raw());

    let mut left = Vec::new();
    let mut right = Vec::new();
    for e in elements {
        if center.is_some_and(|c| std::ptr::eq(c, e)) {
            continue;
        }
        if e.reference_x() > center_x + CENTER_TIE_EPSILON {
            right.push(e);
        } else {
            left.push(e);
        }
    }
    let left = farthest_first(left, distance);
    let right = farthest_first(right, distance);

    let nearest = |group: &[&AnnotationElement]| {
        group.iter().map(|e| distance(*e)).fold(f64::INFINITY, f64::min)
    };
    let (top, middle) = if nearest(&left) > nearest(&right) {
        (left, right)
    } else {
        (right, left)
    };

    let rise = &settings.elbow_rise;
    let place = |e: &AnnotationElement, at: DVec2| e.place_head(at, Handle::TopCenter, rise);
    let mut out = Vec::with_capacity(elements.len());
    let cursor = max_top(elements);
    let cursor = stack(&top, center_x, cursor, pitch, place, &mut out);
    let cursor = stack(&middle, center_x, cursor, pitch, place, &mut out);
    if let Some(c) = center {
        stack(&[c], center_x, cursor, pitch, place, &mut out);
    }
    out
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn of(self, p: DVec2) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }

    fn with(self, p: DVec2, value: f64) -> DVec2 {
        match self {
            Axis::X => dvec2(value, p.y),
            Axis::Y => dvec2(p.x, value),
        }
    }
}

/// Even spacing of heads along `axis`. The outermost two stay put, leaders
/// are left as they are.
fn distribute(elements: &[AnnotationElement], axis: Axis) -> Vec<Placement> {
    let mut sorted: Vec<&AnnotationElement> = elements.iter().collect();
    sorted.sort_by(|a, b| axis.of(a.head).total_cmp(&axis.of(b.head)));

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    let start = axis.of(first.head);
    let step = (axis.of(last.head) - start) / (sorted.len() - 1) as f64;

    sorted[1..sorted.len() - 1]
        .iter()
        .enumerate()
        .map(|(i, e)| Placement {
            id: e.id,
            head: axis.with(e.head, start + step * (i + 1) as f64),
            leader: LeaderUpdate::Keep,
        })
        .collect()
}
