//! Shared brush geometry: size, aspect, fades, spikes and scale.
//!
//! Every generator composes a [`MaskBase`] and derives its own coefficients
//! from it.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::applicator::MaskApplicator;

/// Effective sizes below this (in pixels) are supersampled 2×2.
const SUPERSAMPLE_THRESHOLD: f64 = 10.0;
/// Effective sizes below this (in pixels) are supersampled 6×6.
const SUPERSAMPLE_6X6_THRESHOLD: f64 = 1.0;

/// Largest diameter accepted from a mask description, in pixels.
pub const MAX_DIAMETER: f64 = 65_536.0;

/// Construction parameters shared by all generators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskParams {
    /// Brush diameter in pixels.
    pub diameter: f64,
    /// Height / width aspect ratio, in `(0, 1]`.
    pub ratio: f64,
    /// Horizontal fade fraction, in `[0, 1]`.
    pub horizontal_fade: f64,
    /// Vertical fade fraction, in `[0, 1]`.
    pub vertical_fade: f64,
    /// Number of spikes; 2 is a plain ellipse.
    pub spikes: u32,
    /// Whether the outline gets an antialiasing band.
    pub antialias_edges: bool,
}

impl MaskParams {
    /// Round brush of the given diameter with no fade.
    #[must_use]
    pub const fn new(diameter: f64) -> Self {
        Self {
            diameter,
            ratio: 1.0,
            horizontal_fade: 0.0,
            vertical_fade: 0.0,
            spikes: 2,
            antialias_edges: false,
        }
    }

    /// Set the aspect ratio.
    #[must_use]
    pub const fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Set the horizontal and vertical fade fractions.
    #[must_use]
    pub const fn with_fades(mut self, horizontal: f64, vertical: f64) -> Self {
        self.horizontal_fade = horizontal;
        self.vertical_fade = vertical;
        self
    }

    /// Set the spike count.
    #[must_use]
    pub const fn with_spikes(mut self, spikes: u32) -> Self {
        self.spikes = spikes;
        self
    }

    /// Enable or disable edge antialiasing.
    #[must_use]
    pub const fn with_antialias_edges(mut self, antialias_edges: bool) -> Self {
        self.antialias_edges = antialias_edges;
        self
    }
}

impl Default for MaskParams {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Sum of squares, the distance metric shared by the circle generators.
#[inline]
pub(crate) fn square_norm(a: f64, b: f64) -> f64 {
    a * a + b * b
}

#[inline]
fn has_extent(size: f64) -> bool {
    size.is_finite() && size > 0.0
}

/// Geometry state common to every generator.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskBase {
    params: MaskParams,
    softness: f64,
    scale_x: f64,
    scale_y: f64,
    spikes_angle: f64,
    cs: f64,
    ss: f64,
    empty: bool,
    force_scalar: bool,
}

impl MaskBase {
    /// Create the shared state at unit scale and softness.
    ///
    /// Spike counts below 2 are raised to 2.
    #[must_use]
    pub fn new(params: MaskParams) -> Self {
        let params = MaskParams {
            spikes: params.spikes.max(2),
            ..params
        };
        let spikes = f64::from(params.spikes);
        let empty = !(params.diameter.is_finite() && params.ratio.is_finite())
            || params.diameter <= 0.0
            || params.ratio <= 0.0;

        Self {
            params,
            softness: 1.0,
            scale_x: 1.0,
            scale_y: 1.0,
            spikes_angle: PI / spikes,
            cs: (-2.0 * PI / spikes).cos(),
            ss: (-2.0 * PI / spikes).sin(),
            empty,
            force_scalar: false,
        }
    }

    /// The construction parameters.
    #[must_use]
    pub const fn params(&self) -> &MaskParams {
        &self.params
    }

    /// Brush diameter.
    #[must_use]
    pub const fn diameter(&self) -> f64 {
        self.params.diameter
    }

    /// Aspect ratio.
    #[must_use]
    pub const fn ratio(&self) -> f64 {
        self.params.ratio
    }

    /// Horizontal fade fraction.
    #[must_use]
    pub const fn horizontal_fade(&self) -> f64 {
        self.params.horizontal_fade
    }

    /// Vertical fade fraction.
    #[must_use]
    pub const fn vertical_fade(&self) -> f64 {
        self.params.vertical_fade
    }

    /// Spike count (at least 2).
    #[must_use]
    pub const fn spikes(&self) -> u32 {
        self.params.spikes
    }

    /// Whether edge antialiasing is enabled.
    #[must_use]
    pub const fn antialias_edges(&self) -> bool {
        self.params.antialias_edges
    }

    /// Current softness.
    #[must_use]
    pub const fn softness(&self) -> f64 {
        self.softness
    }

    /// Current horizontal scale.
    #[must_use]
    pub const fn scale_x(&self) -> f64 {
        self.scale_x
    }

    /// Current vertical scale.
    #[must_use]
    pub const fn scale_y(&self) -> f64 {
        self.scale_y
    }

    /// Unscaled width of the mask.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.params.diameter
    }

    /// Unscaled height of the mask. Spiked masks are built from a square
    /// source.
    #[must_use]
    pub fn height(&self) -> f64 {
        if self.params.spikes == 2 {
            self.params.diameter * self.params.ratio
        } else {
            self.params.diameter
        }
    }

    /// Scaled source width, ignoring spikes.
    #[must_use]
    pub fn effective_src_width(&self) -> f64 {
        self.params.diameter * self.scale_x
    }

    /// Scaled source height, ignoring spikes.
    #[must_use]
    pub fn effective_src_height(&self) -> f64 {
        self.params.diameter * self.params.ratio * self.scale_y
    }

    /// Whether the mask has no area, either by construction or because the
    /// current scale collapses it. Empty masks never mask anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.empty
            || !has_extent(self.effective_src_width())
            || !has_extent(self.effective_src_height())
    }

    /// Whether dabs need 2×2 supersampling.
    #[must_use]
    pub fn should_supersample(&self) -> bool {
        self.effective_src_width() < SUPERSAMPLE_THRESHOLD
            || self.effective_src_height() < SUPERSAMPLE_THRESHOLD
    }

    /// Whether dabs need 6×6 supersampling.
    #[must_use]
    pub fn should_supersample_6x6(&self) -> bool {
        self.effective_src_width() < SUPERSAMPLE_6X6_THRESHOLD
            || self.effective_src_height() < SUPERSAMPLE_6X6_THRESHOLD
    }

    /// Whether the lane-batched applicator can be used.
    #[must_use]
    pub fn should_vectorize(&self) -> bool {
        !self.should_supersample() && self.params.spikes == 2
    }

    /// The applicator matching the current state.
    #[must_use]
    pub fn applicator(&self) -> MaskApplicator {
        if !self.force_scalar && self.should_vectorize() {
            MaskApplicator::Vectorized
        } else {
            MaskApplicator::Scalar
        }
    }

    pub(crate) fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
    }

    pub(crate) fn set_softness(&mut self, softness: f64) {
        self.softness = softness;
    }

    pub(crate) fn set_force_scalar(&mut self) {
        self.force_scalar = true;
    }

    /// Fold `(x, y)` into the first spike sector.
    ///
    /// Expects `y >= 0`. Plain ellipses are returned unchanged.
    #[inline]
    #[must_use]
    pub fn fix_rotation(&self, x: f64, y: f64) -> (f64, f64) {
        if self.params.spikes <= 2 {
            return (x, y);
        }

        let (mut xr, mut yr) = (x, y);
        let mut angle = yr.atan2(xr);
        while angle > self.spikes_angle {
            let (sx, sy) = (xr, yr);
            xr = self.cs * sx - self.ss * sy;
            yr = self.ss * sx + self.cs * sy;
            angle -= 2.0 * self.spikes_angle;
        }
        (xr, yr)
    }
}
