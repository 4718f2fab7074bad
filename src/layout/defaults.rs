//! Default distances and factors (model units)

use crate::types::Length;

/// Vertical step between stacked tags in align operations
pub const ALIGN_PITCH: Length = Length::units(2.0);
/// Max anchor distance from the centre line for a tag to count as "the" centre tag
pub const CENTER_THRESHOLD: Length = Length::units(0.5);
/// Anchors this close to the centre line join the left group
pub const CENTER_TIE_EPSILON: f64 = 1e-6;

/// Elbow height above the anchor = clamp(factor × horizontal travel, min, max)
pub const ELBOW_RISE_FACTOR: f64 = 0.05;
pub const ELBOW_RISE_MIN: Length = Length::units(2.0);
pub const ELBOW_RISE_MAX: Length = Length::units(10.0);

/// Vertical step between arrangement slots
pub const SLOT_PITCH: Length = Length::units(0.3);
/// Slot inset from the view edge, in tag widths
pub const SLOT_INSET_TAG_WIDTHS: f64 = 2.0;
/// Slot inset from the view edge as a fraction of the view width
pub const SLOT_INSET_MARGIN: f64 = 0.05;
/// Extra push of the head away from the column, in tag widths
pub const SIDE_OFFSET_TAG_WIDTHS: f64 = 1.5;

/// Segments shorter than this are replaced by the placeholder segment
pub const SHORT_CURVE_TOLERANCE: Length = Length::units(0.002_56);
/// Decimals kept on view-local anchors
pub const ANCHOR_PRECISION: i32 = 4;
/// Nudge applied to the view centre when a tag's anchor is unknown
pub const MISSING_ANCHOR_NUDGE: f64 = 0.001;

/// Bend angle (degrees above horizontal) beyond which the angle-threshold
/// elbow policy uses a right-angle corner
pub const RIGHT_ANGLE_THRESHOLD_DEG: f64 = 20.0;
