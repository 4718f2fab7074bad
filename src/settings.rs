//! Layout configuration.
//!
//! `Default` reproduces the built-in constants in [`layout::defaults`]; hosts
//! that work in other units override the distances. Settings are validated
//! once per command, before any host access.
//!
//! [`layout::defaults`]: crate::layout::defaults

use crate::errors::LayoutError;
use crate::layout::defaults;
use crate::types::Length;

/// Where the arrangement engine bends a leader
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ElbowPolicy {
    /// 45° diagonal from the anchor, then horizontal into the tag
    #[default]
    Diagonal,
    /// Right-angle corner above `degrees`, straight midpoint bend below it
    AngleThreshold { degrees: f64 },
}

impl ElbowPolicy {
    /// Angle-threshold bend at the built-in threshold
    pub fn angle_threshold() -> Self {
        ElbowPolicy::AngleThreshold { degrees: defaults::RIGHT_ANGLE_THRESHOLD_DEG }
    }
}

/// How far arrangement slots sit inside the view edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotInset {
    /// Multiple of the column's first tag width
    TagWidths(f64),
    /// Fraction of the view width
    ViewMargin(f64),
}

impl SlotInset {
    /// View-margin inset at the built-in fraction
    pub fn view_margin() -> Self {
        SlotInset::ViewMargin(defaults::SLOT_INSET_MARGIN)
    }
}

impl Default for SlotInset {
    fn default() -> Self {
        SlotInset::TagWidths(defaults::SLOT_INSET_TAG_WIDTHS)
    }
}

/// Elbow height above an anchor as a function of how far the tag travelled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElbowRise {
    pub factor: f64,
    pub min: Length,
    pub max: Length,
}

impl Default for ElbowRise {
    fn default() -> Self {
        Self {
            factor: defaults::ELBOW_RISE_FACTOR,
            min: defaults::ELBOW_RISE_MIN,
            max: defaults::ELBOW_RISE_MAX,
        }
    }
}

impl ElbowRise {
    /// Rise for a horizontal travel distance
    pub fn rise(&self, travel: f64) -> f64 {
        Length(travel.abs() * self.factor)
            .clamp_between(self.min, self.max)
            .raw()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrangeSettings {
    pub slot_pitch: Length,
    pub slot_inset: SlotInset,
    /// Head push away from the column, in tag widths
    pub side_offset: f64,
    pub elbow_policy: ElbowPolicy,
    pub short_curve_tolerance: Length,
    pub anchor_precision: i32,
}

impl Default for ArrangeSettings {
    fn default() -> Self {
        Self {
            slot_pitch: defaults::SLOT_PITCH,
            slot_inset: SlotInset::default(),
            side_offset: defaults::SIDE_OFFSET_TAG_WIDTHS,
            elbow_policy: ElbowPolicy::default(),
            short_curve_tolerance: defaults::SHORT_CURVE_TOLERANCE,
            anchor_precision: defaults::ANCHOR_PRECISION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    /// Vertical (or horizontal) step between stacked tags
    pub pitch: Length,
    pub center_threshold: Length,
    pub elbow_rise: ElbowRise,
    pub arrange: ArrangeSettings,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            pitch: defaults::ALIGN_PITCH,
            center_threshold: defaults::CENTER_THRESHOLD,
            elbow_rise: ElbowRise::default(),
            arrange: ArrangeSettings::default(),
        }
    }
}

fn check(name: &'static str, value: f64) -> Result<(), LayoutError> {
    Length::try_non_negative(value)
        .map(|_| ())
        .map_err(|source| LayoutError::InvalidSetting { name, source })
}

impl LayoutSettings {
    /// Reject NaN, infinite and negative values
    pub fn validate(&self) -> Result<(), LayoutError> {
        check("pitch", self.pitch.raw())?;
        check("center_threshold", self.center_threshold.raw())?;
        check("elbow_rise.factor", self.elbow_rise.factor)?;
        check("elbow_rise.min", self.elbow_rise.min.raw())?;
        check("elbow_rise.max", self.elbow_rise.max.raw())?;
        if self.elbow_rise.min > self.elbow_rise.max {
            return Err(LayoutError::validation("elbow rise minimum exceeds its maximum"));
        }

        let arrange = &self.arrange;
        check("arrange.slot_pitch", arrange.slot_pitch.raw())?;
        check("arrange.side_offset", arrange.side_offset)?;
        check("arrange.short_curve_tolerance", arrange.short_curve_tolerance.raw())?;
        match arrange.slot_inset {
            SlotInset::TagWidths(n) => check("arrange.slot_inset", n)?,
            SlotInset::ViewMargin(f) => {
                check("arrange.slot_inset", f)?;
                if f >= 0.5 {
                    return Err(LayoutError::validation(
                        "view margin must leave room for both columns (< 0.5)",
                    ));
                }
            }
        }
        if let ElbowPolicy::AngleThreshold { degrees } = arrange.elbow_policy {
            check("arrange.elbow_policy", degrees)?;
            if degrees > 90.0 {
                return Err(LayoutError::validation("elbow angle threshold must be at most 90°"));
            }
        }
        Ok(())
    }
}
