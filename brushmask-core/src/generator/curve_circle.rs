//! Circle mask with a curve-driven falloff sampled into a transfer table.

use crate::applicator::LANES;
use crate::codec::{CurveCodec, PointListCodec};
use crate::curve::{CubicCurve, CurvePoint};
use crate::fade::AntialiasingFadeMaker;
use crate::geometry::{square_norm, MaskBase, MaskParams};
use crate::softness::transform_curve_for_softness;

/// Transfer-table samples per pixel of the largest brush dimension.
pub const OVERSAMPLING: f64 = 4.0;

/// Upper bound on the transfer-table resolution.
pub const MAX_CURVE_RESOLUTION: usize = 1 << 18;

/// Coefficients derived from the scale and the current transfer table.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    xcoef: f64,
    ycoef: f64,
    fade: AntialiasingFadeMaker,
}

impl Coefficients {
    fn derive(base: &MaskBase, resolution: usize, table: &[f64]) -> Self {
        let xcoef = 2.0 / base.effective_src_width();
        let ycoef = 2.0 / base.effective_src_height();
        let fade = AntialiasingFadeMaker::for_square_norm(base.antialias_edges(), xcoef, ycoef, |d| {
            table_value(table, resolution, d)
        });
        Self { xcoef, ycoef, fade }
    }
}

/// Interpolate the transfer table at squared distance `dist`.
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn table_value(table: &[f64], resolution: usize, dist: f64) -> u8 {
    if table.len() < 2 {
        return u8::MAX;
    }
    let distance = dist * resolution as f64;
    // Float to int casts saturate, so negative or NaN distances land on 0.
    let index = (distance as usize).min(table.len() - 2);
    let frac = distance - index as f64;

    let alpha = (1.0 - frac) * table[index] + frac * table[index + 1];
    ((1.0 - alpha) * 255.0).clamp(0.0, 255.0) as u8
}

/// Circle mask whose falloff follows a [`CubicCurve`].
///
/// The curve is indexed by squared normalized distance: `x = 0` at the
/// center, `x = 1` on the outline. Curve values are paint amounts, so the
/// default `(0, 1) → (1, 0)` ramp paints fully at the center.
#[derive(Debug, Clone)]
pub struct CurveCircleMaskGenerator {
    base: MaskBase,
    curve_points: Vec<CurvePoint>,
    curve_string: String,
    curve_resolution: usize,
    curve_data: Vec<f64>,
    dirty: bool,
    coefficients: Coefficients,
}

impl CurveCircleMaskGenerator {
    /// Create a generator, encoding the curve with [`PointListCodec`].
    #[must_use]
    pub fn new(params: MaskParams, curve: &CubicCurve) -> Self {
        Self::with_codec(params, curve, &PointListCodec)
    }

    /// Create a generator, encoding the curve with `codec`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn with_codec(params: MaskParams, curve: &CubicCurve, codec: &dyn CurveCodec) -> Self {
        let base = MaskBase::new(params);

        // Sized for the unscaled brush; rescaling keeps the table.
        let largest = base.width().max(base.height());
        let scaled = (largest * OVERSAMPLING).round();
        let curve_resolution = if scaled.is_finite() && scaled >= 1.0 {
            (scaled as usize).min(MAX_CURVE_RESOLUTION)
        } else {
            1
        };
        let curve_data = curve.float_transfer(curve_resolution + 2);
        let coefficients = Coefficients::derive(&base, curve_resolution, &curve_data);

        tracing::debug!(
            "Curve circle mask: diameter {} ratio {} spikes {} resolution {}",
            base.diameter(),
            base.ratio(),
            base.spikes(),
            curve_resolution
        );

        Self {
            base,
            curve_points: curve.points().to_vec(),
            curve_string: codec.encode(curve),
            curve_resolution,
            curve_data,
            dirty: false,
            coefficients,
        }
    }

    /// Shared geometry.
    #[must_use]
    pub const fn base(&self) -> &MaskBase {
        &self.base
    }

    /// The encoded curve this generator was built from.
    #[must_use]
    pub fn curve_string(&self) -> &str {
        &self.curve_string
    }

    /// Transfer table resolution; the table holds `resolution + 2` samples.
    #[must_use]
    pub const fn curve_resolution(&self) -> usize {
        self.curve_resolution
    }

    /// The current transfer table.
    #[must_use]
    pub fn curve_data(&self) -> &[f64] {
        &self.curve_data
    }

    /// Mask value at brush-local `(x, y)`.
    #[inline]
    #[must_use]
    pub fn value_at(&self, x: f64, y: f64) -> u8 {
        if self.base.is_empty() {
            return u8::MAX;
        }
        let (xr, yr) = self.base.fix_rotation(x, y.abs());
        let dist = square_norm(xr * self.coefficients.xcoef, yr * self.coefficients.ycoef);
        self.value_from_distance(dist)
    }

    #[inline]
    fn value_from_distance(&self, dist: f64) -> u8 {
        if let Some(value) = self.coefficients.fade.need_fade(dist) {
            return value;
        }
        table_value(&self.curve_data, self.curve_resolution, dist)
    }

    pub(crate) fn value_lanes(&self, xr: &[f64; LANES], yr: &[f64; LANES], out: &mut [u8; LANES]) {
        let Coefficients { xcoef, ycoef, .. } = self.coefficients;
        let mut dist = [0.0; LANES];
        for ((d, &x), &y) in dist.iter_mut().zip(xr).zip(yr) {
            *d = square_norm(x * xcoef, y * ycoef);
        }
        for (o, &d) in out.iter_mut().zip(&dist) {
            *o = self.value_from_distance(d);
        }
    }

    /// Rescale the mask. The transfer table is kept.
    pub fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.base.set_scale(scale_x, scale_y);
        self.coefficients = Coefficients::derive(&self.base, self.curve_resolution, &self.curve_data);
        tracing::trace!("Curve circle mask rescaled to {scale_x}x{scale_y}");
    }

    /// Rebuild the transfer table for `softness`.
    ///
    /// Unit softness on a table that already matches the curve is skipped.
    #[allow(clippy::float_cmp)]
    pub fn set_softness(&mut self, softness: f64) {
        if !self.dirty && softness == 1.0 {
            return;
        }

        self.base.set_softness(softness);
        self.curve_data =
            transform_curve_for_softness(softness, &self.curve_points, self.curve_resolution + 2);
        self.coefficients = Coefficients::derive(&self.base, self.curve_resolution, &self.curve_data);
        self.dirty = softness != 1.0;
    }

    pub(crate) fn set_force_scalar(&mut self) {
        self.base.set_force_scalar();
    }
}
