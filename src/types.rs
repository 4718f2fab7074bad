//! Strongly-typed primitives for tagalign.
//!
//! Coordinates are plain `glam::DVec2` (model units, Y-up). Configurable
//! distances go through [`Length`] so bad input is rejected once, at the
//! settings boundary, instead of leaking NaN into layout math.

use std::fmt;

use glam::{DAffine2, DVec2, dvec2};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is negative when non-negative required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Distance in model units
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Length(pub f64);

impl Length {
    /// Create a Length (const-friendly, unchecked).
    /// Use `try_new` for user-provided values.
    #[inline]
    pub(crate) const fn units(val: f64) -> Length {
        Length(val)
    }

    /// Create a Length with validation (rejects NaN/infinite)
    #[inline]
    pub fn try_new(val: f64) -> Result<Length, NumericError> {
        if val.is_nan() {
            Err(NumericError::NaN)
        } else if val.is_infinite() {
            Err(NumericError::Infinite)
        } else {
            Ok(Length(val))
        }
    }

    /// Create a non-negative Length with validation
    #[inline]
    pub fn try_non_negative(val: f64) -> Result<Length, NumericError> {
        let len = Self::try_new(val)?;
        if len.0 < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(len)
        }
    }

    #[inline]
    pub fn min(self, other: Length) -> Length {
        Length(self.0.min(other.0))
    }

    #[inline]
    pub fn max(self, other: Length) -> Length {
        Length(self.0.max(other.0))
    }

    /// Clamp into `[lo, hi]`. `lo` wins if the bounds are inverted.
    #[inline]
    pub fn clamp_between(self, lo: Length, hi: Length) -> Length {
        self.min(hi).max(lo)
    }

    /// Get the raw value
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

/// Axis-aligned bounding box (Y-up: `max.y` is the top edge)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl Default for BBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BBox {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BBox {
            min: DVec2::splat(f64::MAX),
            max: DVec2::splat(f64::MIN),
        }
    }

    /// Box spanning two corners, in any order
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        BBox { min: a.min(b), max: a.max(b) }
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// True when the box encloses no area (empty, a line, or a point)
    pub fn is_degenerate(&self) -> bool {
        self.is_empty() || self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn expand_point(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn width(&self) -> f64 { self.max.x - self.min.x }

    pub fn height(&self) -> f64 { self.max.y - self.min.y }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn top(&self) -> f64 { self.max.y }

    pub fn up_left(&self) -> DVec2 { dvec2(self.min.x, self.max.y) }

    pub fn up_right(&self) -> DVec2 { self.max }

    /// Midpoint of the top edge
    pub fn top_center(&self) -> DVec2 { dvec2(self.center().x, self.max.y) }

    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            dvec2(self.max.x, self.min.y),
            self.max,
            dvec2(self.min.x, self.max.y),
        ]
    }

    /// Axis-aligned hull of this box's corners after `transform`
    pub fn transformed(&self, transform: &DAffine2) -> BBox {
        let mut out = BBox::new();
        for corner in self.corners() {
            out.expand_point(transform.transform_point2(corner));
        }
        out
    }
}

/// Round both components to `places` decimals
pub fn round_to(p: DVec2, places: i32) -> DVec2 {
    let factor = 10f64.powi(places);
    (p * factor).round() / factor
}
