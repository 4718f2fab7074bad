//! Leader geometry: elbow placement, leader segments, crossing tests.

use glam::{DVec2, dvec2};

use crate::settings::{ElbowPolicy, ElbowRise};

/// Elbow directly above the anchor, for a tag whose head ended up at `head_x`.
///
/// The rise grows with how far the tag travelled sideways from its anchor,
/// within the `rise` bounds, so long leaders get a visible bend and short
/// ones stay compact.
pub fn elbow_above_anchor(anchor: DVec2, head_x: f64, rise: &ElbowRise) -> DVec2 {
    dvec2(anchor.x, anchor.y + rise.rise(head_x - anchor.x))
}

/// Elbow for a tag centred at `center` pointing at `anchor`.
///
/// The elbow sits on the tag's horizontal so the run into the tag is flat;
/// the run from the anchor to the elbow is a ±45° diagonal whose direction
/// follows the quadrant the anchor lies in.
pub fn diagonal_elbow(anchor: DVec2, center: DVec2) -> DVec2 {
    let ab = anchor - center;
    let product = ab.x * ab.y;
    let sign = if product == 0.0 || !product.is_finite() {
        1.0
    } else {
        product.signum()
    };
    let dx = ab.x - ab.y * (sign * std::f64::consts::FRAC_PI_4).tan();
    dvec2(center.x + dx, center.y)
}

/// Alternate bend: a right-angle corner when the anchor sits more than
/// `degrees` above or below the tag's horizontal, a midpoint bend otherwise.
pub fn angle_threshold_elbow(anchor: DVec2, center: DVec2, degrees: f64) -> DVec2 {
    let d = anchor - center;
    let angle = d.y.abs().atan2(d.x.abs()).to_degrees();
    if angle > degrees {
        dvec2(anchor.x, center.y)
    } else {
        (anchor + center) * 0.5
    }
}

pub fn elbow_for(policy: ElbowPolicy, anchor: DVec2, center: DVec2) -> DVec2 {
    match policy {
        ElbowPolicy::Diagonal => diagonal_elbow(anchor, center),
        ElbowPolicy::AngleThreshold { degrees } => angle_threshold_elbow(anchor, center, degrees),
    }
}

/// One straight run of a leader
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeaderSegment {
    Bound { start: DVec2, end: DVec2 },
    /// Stand-in for a run that collapsed below the tolerance. It has a unit
    /// direction and never crosses anything.
    Placeholder,
}

impl LeaderSegment {
    /// Segment from `start` to `end`, or the placeholder if they are closer
    /// than `tolerance`
    pub fn bound(start: DVec2, end: DVec2, tolerance: f64) -> Self {
        if start.distance(end) > tolerance {
            LeaderSegment::Bound { start, end }
        } else {
            LeaderSegment::Placeholder
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, LeaderSegment::Placeholder)
    }

    pub fn intersects(&self, other: &LeaderSegment) -> bool {
        match (*self, *other) {
            (
                LeaderSegment::Bound { start: a1, end: a2 },
                LeaderSegment::Bound { start: b1, end: b2 },
            ) => segments_intersect(a1, a2, b1, b2),
            _ => false,
        }
    }
}

const COLLINEAR_EPS: f64 = 1e-9;

fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

fn on_segment(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.x >= a.x.min(b.x) - COLLINEAR_EPS
        && p.x <= a.x.max(b.x) + COLLINEAR_EPS
        && p.y >= a.y.min(b.y) - COLLINEAR_EPS
        && p.y <= a.y.max(b.y) + COLLINEAR_EPS
}

/// Closed-segment intersection: proper crossings and touching both count
pub fn segments_intersect(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> bool {
    let o1 = orientation(a1, a2, b1);
    let o2 = orientation(a1, a2, b2);
    let o3 = orientation(b1, b2, a1);
    let o4 = orientation(b1, b2, a2);

    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        return true;
    }

    (o1.abs() < COLLINEAR_EPS && on_segment(a1, a2, b1))
        || (o2.abs() < COLLINEAR_EPS && on_segment(a1, a2, b2))
        || (o3.abs() < COLLINEAR_EPS && on_segment(b1, b2, a1))
        || (o4.abs() < COLLINEAR_EPS && on_segment(b1, b2, a2))
}
