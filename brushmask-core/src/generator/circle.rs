//! Circle mask with a linear fade band controlled by the fade fractions.

use crate::applicator::LANES;
use crate::geometry::{square_norm, MaskBase, MaskParams};

/// Softness values below this are treated as this.
const MIN_SOFTNESS: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    xcoef: f64,
    ycoef: f64,
    transformed_fade_x: f64,
    transformed_fade_y: f64,
}

impl Coefficients {
    fn derive(base: &MaskBase) -> Self {
        let width = base.effective_src_width();
        let height = base.effective_src_height();
        let xfadecoef = fade_coefficient(base.horizontal_fade(), width);
        let yfadecoef = fade_coefficient(base.vertical_fade(), height);
        let softness_coeff = 1.0 / base.softness().max(MIN_SOFTNESS);

        Self {
            xcoef: 2.0 / width,
            ycoef: 2.0 / height,
            transformed_fade_x: xfadecoef * softness_coeff,
            transformed_fade_y: yfadecoef * softness_coeff,
        }
    }
}

fn fade_coefficient(fade: f64, size: f64) -> f64 {
    if fade.abs() < f64::EPSILON {
        1.0
    } else {
        2.0 / (fade * size)
    }
}

/// The default circle mask.
///
/// Inside the inner ellipse (scaled by the fade fractions) the mask paints
/// fully; between it and the outline the value rises to 255.
#[derive(Debug, Clone)]
pub struct CircleMaskGenerator {
    base: MaskBase,
    coefficients: Coefficients,
}

impl CircleMaskGenerator {
    /// Create a generator at unit scale.
    #[must_use]
    pub fn new(params: MaskParams) -> Self {
        let base = MaskBase::new(params);
        let coefficients = Coefficients::derive(&base);

        tracing::debug!(
            "Circle mask: diameter {} ratio {} spikes {}",
            base.diameter(),
            base.ratio(),
            base.spikes()
        );

        Self { base, coefficients }
    }

    /// Shared geometry.
    #[must_use]
    pub const fn base(&self) -> &MaskBase {
        &self.base
    }

    /// Mask value at brush-local `(x, y)`.
    #[inline]
    #[must_use]
    pub fn value_at(&self, x: f64, y: f64) -> u8 {
        if self.base.is_empty() {
            return u8::MAX;
        }
        let (xr, yr) = self.base.fix_rotation(x, y.abs());
        self.value_unfolded(xr, yr)
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn value_unfolded(&self, xr: f64, yr: f64) -> u8 {
        let c = &self.coefficients;
        let n = square_norm(xr * c.xcoef, yr * c.ycoef);
        if n > 1.0 {
            return u8::MAX;
        }

        // One extra pixel keeps the outline antialiased.
        let (xf, yf) = if self.base.antialias_edges() {
            (xr.abs() + 1.0, yr.abs() + 1.0)
        } else {
            (xr, yr)
        };

        let nf = square_norm(xf * c.transformed_fade_x, yf * c.transformed_fade_y);
        if nf < 1.0 {
            return 0;
        }
        if nf <= n {
            return u8::MAX;
        }
        (255.0 * n * (nf - 1.0) / (nf - n)).clamp(0.0, 255.0) as u8
    }

    pub(crate) fn value_lanes(&self, xr: &[f64; LANES], yr: &[f64; LANES], out: &mut [u8; LANES]) {
        for ((o, &x), &y) in out.iter_mut().zip(xr).zip(yr) {
            *o = self.value_unfolded(x, y);
        }
    }

    /// Rescale the mask.
    pub fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.base.set_scale(scale_x, scale_y);
        self.coefficients = Coefficients::derive(&self.base);
        tracing::trace!("Circle mask rescaled to {scale_x}x{scale_y}");
    }

    /// Scale the inner ellipse; lower softness shrinks the fully painted core.
    pub fn set_softness(&mut self, softness: f64) {
        self.base.set_softness(softness);
        self.coefficients = Coefficients::derive(&self.base);
    }

    pub(crate) fn set_force_scalar(&mut self) {
        self.base.set_force_scalar();
    }
}
