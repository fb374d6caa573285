//! Mask generators and the tagged variant that dispatches between them.

mod circle;
mod curve_circle;
mod gauss_circle;

pub use circle::CircleMaskGenerator;
pub use curve_circle::{CurveCircleMaskGenerator, MAX_CURVE_RESOLUTION, OVERSAMPLING};
pub use gauss_circle::GaussCircleMaskGenerator;

use serde::{Deserialize, Serialize};

use crate::applicator::{AlphaDab, DabRect, MaskApplicator, MaskProcessingData, LANES};
use crate::geometry::MaskBase;

/// Falloff family of a generator, as written in the `id` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskId {
    /// Linear fade band ([`CircleMaskGenerator`]).
    #[default]
    Default,
    /// Curve-driven falloff ([`CurveCircleMaskGenerator`]).
    Soft,
    /// Gaussian falloff ([`GaussCircleMaskGenerator`]).
    Gauss,
}

impl MaskId {
    /// The identifier used in XML fragments.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Soft => "soft",
            Self::Gauss => "gauss",
        }
    }

    /// Parse an XML identifier.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::Default),
            "soft" => Some(Self::Soft),
            "gauss" => Some(Self::Gauss),
            _ => None,
        }
    }
}

impl std::fmt::Display for MaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outline shape, as written in the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskShape {
    /// Elliptical outline.
    #[default]
    Circle,
    /// Rectangular outline. Recognised in descriptions, not generated.
    #[serde(rename = "rect")]
    Rectangle,
}

impl MaskShape {
    /// The identifier used in XML fragments.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Rectangle => "rect",
        }
    }
}

/// Any mask generator.
///
/// Evaluation takes `&self`, so one generator can be shared read-only
/// between threads; hand out clones to workers that need to rescale.
#[derive(Debug, Clone)]
pub enum MaskGenerator {
    /// Linear fade band circle.
    Circle(CircleMaskGenerator),
    /// Curve-driven circle.
    CurveCircle(CurveCircleMaskGenerator),
    /// Gaussian circle.
    GaussCircle(GaussCircleMaskGenerator),
}

impl MaskGenerator {
    /// The falloff family.
    #[must_use]
    pub const fn id(&self) -> MaskId {
        match self {
            Self::Circle(_) => MaskId::Default,
            Self::CurveCircle(_) => MaskId::Soft,
            Self::GaussCircle(_) => MaskId::Gauss,
        }
    }

    /// The outline shape.
    #[must_use]
    pub const fn shape(&self) -> MaskShape {
        MaskShape::Circle
    }

    /// Shared geometry.
    #[must_use]
    pub const fn base(&self) -> &MaskBase {
        match self {
            Self::Circle(g) => g.base(),
            Self::CurveCircle(g) => g.base(),
            Self::GaussCircle(g) => g.base(),
        }
    }

    /// The encoded softness curve, for curve-driven generators.
    #[must_use]
    pub fn curve_string(&self) -> Option<&str> {
        match self {
            Self::CurveCircle(g) => Some(g.curve_string()),
            Self::Circle(_) | Self::GaussCircle(_) => None,
        }
    }

    /// Mask value at brush-local `(x, y)`: 0 paints fully, 255 not at all.
    #[inline]
    #[must_use]
    pub fn value_at(&self, x: f64, y: f64) -> u8 {
        match self {
            Self::Circle(g) => g.value_at(x, y),
            Self::CurveCircle(g) => g.value_at(x, y),
            Self::GaussCircle(g) => g.value_at(x, y),
        }
    }

    /// Evaluate a batch of already rotated coordinates of a plain ellipse.
    pub(crate) fn value_lanes(&self, xr: &[f64; LANES], yr: &[f64; LANES], out: &mut [u8; LANES]) {
        match self {
            Self::Circle(g) => g.value_lanes(xr, yr, out),
            Self::CurveCircle(g) => g.value_lanes(xr, yr, out),
            Self::GaussCircle(g) => g.value_lanes(xr, yr, out),
        }
    }

    /// Rescale the mask, re-deriving every cached coefficient.
    pub fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        match self {
            Self::Circle(g) => g.set_scale(scale_x, scale_y),
            Self::CurveCircle(g) => g.set_scale(scale_x, scale_y),
            Self::GaussCircle(g) => g.set_scale(scale_x, scale_y),
        }
    }

    /// Apply a softness factor.
    pub fn set_softness(&mut self, softness: f64) {
        match self {
            Self::Circle(g) => g.set_softness(softness),
            Self::CurveCircle(g) => g.set_softness(softness),
            Self::GaussCircle(g) => g.set_softness(softness),
        }
    }

    /// Whether the lane-batched applicator can be used.
    #[must_use]
    pub fn should_vectorize(&self) -> bool {
        self.base().should_vectorize()
    }

    /// The bulk evaluation strategy for the current state.
    #[must_use]
    pub fn applicator(&self) -> MaskApplicator {
        self.base().applicator()
    }

    /// Always use the scalar applicator from now on.
    pub fn set_scalar_applicator(&mut self) {
        match self {
            Self::Circle(g) => g.set_force_scalar(),
            Self::CurveCircle(g) => g.set_force_scalar(),
            Self::GaussCircle(g) => g.set_force_scalar(),
        }
    }

    /// Fill `rect` of `dab` with paint coverage.
    pub fn process(&self, data: &MaskProcessingData, rect: DabRect, dab: &mut AlphaDab) {
        self.applicator().process(self, data, rect, dab);
    }

    /// Render a whole dab of `width` × `height` pixels.
    #[must_use]
    pub fn render_dab(&self, data: &MaskProcessingData, width: u32, height: u32) -> AlphaDab {
        let mut dab = AlphaDab::new(width, height);
        self.process(data, dab.bounds(), &mut dab);
        dab
    }
}

impl From<CircleMaskGenerator> for MaskGenerator {
    fn from(generator: CircleMaskGenerator) -> Self {
        Self::Circle(generator)
    }
}

impl From<CurveCircleMaskGenerator> for MaskGenerator {
    fn from(generator: CurveCircleMaskGenerator) -> Self {
        Self::CurveCircle(generator)
    }
}

impl From<GaussCircleMaskGenerator> for MaskGenerator {
    fn from(generator: GaussCircleMaskGenerator) -> Self {
        Self::GaussCircle(generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CubicCurve;
    use crate::geometry::MaskParams;

    fn all_kinds(params: MaskParams) -> Vec<MaskGenerator> {
        vec![
            CircleMaskGenerator::new(params).into(),
            CurveCircleMaskGenerator::new(params, &CubicCurve::linear_falloff()).into(),
            GaussCircleMaskGenerator::new(params).into(),
        ]
    }

    #[test]
    fn test_ids() {
        let ids: Vec<_> = all_kinds(MaskParams::new(20.0)).iter().map(MaskGenerator::id).collect();
        assert_eq!(ids, vec![MaskId::Default, MaskId::Soft, MaskId::Gauss]);
        assert_eq!(MaskId::from_name("gauss"), Some(MaskId::Gauss));
        assert_eq!(MaskId::from_name("pixel"), None);
    }

    #[test]
    fn test_empty_generators_never_mask() {
        for mask in all_kinds(MaskParams::new(0.0)) {
            assert_eq!(mask.value_at(0.0, 0.0), 255, "{}", mask.id());
            assert_eq!(mask.value_at(3.0, -2.0), 255, "{}", mask.id());
        }
        for mask in all_kinds(MaskParams::new(12.0).with_ratio(0.0)) {
            assert_eq!(mask.value_at(0.0, 0.0), 255, "{}", mask.id());
        }
    }

    #[test]
    fn test_should_vectorize_depends_on_spikes() {
        for spikes in [2, 3, 4, 8] {
            for mask in all_kinds(MaskParams::new(50.0).with_spikes(spikes)) {
                assert_eq!(mask.should_vectorize(), spikes == 2, "{} spikes {spikes}", mask.id());
            }
        }
    }

    #[test]
    fn test_applicator_selection() {
        let mut mask: MaskGenerator = GaussCircleMaskGenerator::new(MaskParams::new(50.0)).into();
        assert_eq!(mask.applicator(), MaskApplicator::Vectorized);

        mask.set_scale(0.1, 0.1);
        assert!(!mask.should_vectorize());
        assert_eq!(mask.applicator(), MaskApplicator::Scalar);

        mask.set_scale(1.0, 1.0);
        mask.set_scalar_applicator();
        assert!(mask.should_vectorize());
        assert_eq!(mask.applicator(), MaskApplicator::Scalar);

        // Clones keep the preference but own their state.
        let clone = mask.clone();
        assert_eq!(clone.applicator(), MaskApplicator::Scalar);
    }

    #[test]
    fn test_spiked_mask_is_symmetric_per_spike() {
        let mask: MaskGenerator =
            CircleMaskGenerator::new(MaskParams::new(60.0).with_fades(0.5, 0.5).with_spikes(4))
                .into();
        let r = 14.0;
        let a = mask.value_at(r, 0.0);
        let b = mask.value_at(0.0, r);
        let c = mask.value_at(-r, 0.0);
        assert!(a.abs_diff(b) <= 1 && a.abs_diff(c) <= 1, "{a} {b} {c}");
    }
}
