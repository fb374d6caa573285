//! Circle mask with a closed-form gaussian (erf) falloff.

use std::f64::consts::SQRT_2;

use libm::erf;

use crate::applicator::LANES;
use crate::fade::AntialiasingFadeMaker;
use crate::geometry::{square_norm, MaskBase, MaskParams};

/// Keeps `fade` off 0 and 1, where the falloff formula is undefined.
const FADE_EPSILON: f64 = 1e-6;

// Calibration of the erf curve against the curve-driven falloff.
const CENTER_SPREAD: f64 = 2.5;
const CENTER_OFFSET: f64 = 10000.0;
const FADE_SCALE: f64 = 6761.0;
const DISTANCE_SCALE: f64 = 12500.0;

/// Constants fixed by the fade fractions at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Profile {
    fade: f64,
    center: f64,
    alphafactor: f64,
}

impl Profile {
    fn new(horizontal_fade: f64, vertical_fade: f64) -> Self {
        let fade = 1.0 - (horizontal_fade + vertical_fade) / 2.0;
        let fade = if fade <= 0.0 || fade.is_nan() {
            FADE_EPSILON
        } else if fade >= 1.0 {
            1.0 - FADE_EPSILON
        } else {
            fade
        };

        let center = (CENTER_SPREAD * (FADE_SCALE * fade - CENTER_OFFSET)) / (SQRT_2 * FADE_SCALE * fade);
        let alphafactor = 255.0 / (2.0 * erf(center));
        Self {
            fade,
            center,
            alphafactor,
        }
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn value(&self, dist: f64, distfactor: f64) -> u8 {
        let d = dist * distfactor;
        let covered = self.alphafactor * (erf(d + self.center) - erf(d - self.center));
        u8::MAX - covered.clamp(0.0, 255.0) as u8
    }
}

/// Coefficients derived from the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    ycoef: f64,
    distfactor: f64,
    fade: AntialiasingFadeMaker,
}

impl Coefficients {
    fn derive(base: &MaskBase, profile: &Profile) -> Self {
        let ycoef = base.scale_x() / (base.scale_y() * base.ratio());
        let width = base.effective_src_width();
        let distfactor = SQRT_2 * DISTANCE_SCALE / (FADE_SCALE * profile.fade * width / 2.0);
        let fade = AntialiasingFadeMaker::for_radius(base.antialias_edges(), 0.5 * width, |d| {
            profile.value(d, distfactor)
        });
        Self {
            ycoef,
            distfactor,
            fade,
        }
    }
}

/// Circle mask with a gaussian falloff; distances are in pixels.
#[derive(Debug, Clone)]
pub struct GaussCircleMaskGenerator {
    base: MaskBase,
    profile: Profile,
    coefficients: Coefficients,
}

impl GaussCircleMaskGenerator {
    /// Create a generator at unit scale.
    #[must_use]
    pub fn new(params: MaskParams) -> Self {
        let base = MaskBase::new(params);
        let profile = Profile::new(base.horizontal_fade(), base.vertical_fade());
        let coefficients = Coefficients::derive(&base, &profile);

        tracing::debug!(
            "Gauss circle mask: diameter {} ratio {} spikes {} fade {}",
            base.diameter(),
            base.ratio(),
            base.spikes(),
            profile.fade
        );

        Self {
            base,
            profile,
            coefficients,
        }
    }

    /// Shared geometry.
    #[must_use]
    pub const fn base(&self) -> &MaskBase {
        &self.base
    }

    /// The floored fade parameter.
    #[must_use]
    pub const fn fade(&self) -> f64 {
        self.profile.fade
    }

    /// Mask value at brush-local `(x, y)`.
    #[inline]
    #[must_use]
    pub fn value_at(&self, x: f64, y: f64) -> u8 {
        if self.base.is_empty() {
            return u8::MAX;
        }
        let (xr, yr) = self.base.fix_rotation(x, y.abs());
        let dist = square_norm(xr, yr * self.coefficients.ycoef).sqrt();
        self.value_from_distance(dist)
    }

    #[inline]
    fn value_from_distance(&self, dist: f64) -> u8 {
        if let Some(value) = self.coefficients.fade.need_fade(dist) {
            return value;
        }
        self.profile.value(dist, self.coefficients.distfactor)
    }

    pub(crate) fn value_lanes(&self, xr: &[f64; LANES], yr: &[f64; LANES], out: &mut [u8; LANES]) {
        let ycoef = self.coefficients.ycoef;
        let mut dist = [0.0; LANES];
        for ((d, &x), &y) in dist.iter_mut().zip(xr).zip(yr) {
            *d = square_norm(x, y * ycoef).sqrt();
        }
        for (o, &d) in out.iter_mut().zip(&dist) {
            *o = self.value_from_distance(d);
        }
    }

    /// Rescale the mask.
    pub fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.base.set_scale(scale_x, scale_y);
        self.coefficients = Coefficients::derive(&self.base, &self.profile);
        tracing::trace!("Gauss circle mask rescaled to {scale_x}x{scale_y}");
    }

    /// Record `softness`. The gaussian profile is fixed by the fades, so
    /// the output does not change.
    pub fn set_softness(&mut self, softness: f64) {
        self.base.set_softness(softness);
        self.coefficients = Coefficients::derive(&self.base, &self.profile);
    }

    pub(crate) fn set_force_scalar(&mut self) {
        self.base.set_force_scalar();
    }
}
