//! JSON mask descriptions.
//!
//! A [`MaskDocument`] carries the construction parameters of a generator.
//! Scale and softness are per-dab state and are not part of it.

use serde::{Deserialize, Serialize};

use crate::codec::{CurveCodec, PointListCodec};
use crate::curve::CubicCurve;
use crate::error::{MaskError, MaskResult};
use crate::generator::{
    CircleMaskGenerator, CurveCircleMaskGenerator, GaussCircleMaskGenerator, MaskGenerator,
    MaskId, MaskShape,
};
use crate::geometry::{MaskParams, MAX_DIAMETER};

/// Serializable description of a mask generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskDocument {
    /// Falloff family.
    pub id: MaskId,
    /// Outline shape.
    pub shape: MaskShape,
    /// Brush diameter in pixels.
    pub diameter: f64,
    /// Height / width aspect ratio.
    pub ratio: f64,
    /// Horizontal fade fraction.
    pub horizontal_fade: f64,
    /// Vertical fade fraction.
    pub vertical_fade: f64,
    /// Spike count.
    pub spikes: u32,
    /// Edge antialiasing.
    pub antialias_edges: bool,
    /// Encoded falloff curve for [`MaskId::Soft`]; the linear falloff when
    /// absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub softness_curve: Option<String>,
}

impl Default for MaskDocument {
    fn default() -> Self {
        Self::from_params(MaskId::Default, MaskParams::default())
    }
}

impl MaskDocument {
    /// Describe a generator of family `id` with `params`.
    #[must_use]
    pub const fn from_params(id: MaskId, params: MaskParams) -> Self {
        Self {
            id,
            shape: MaskShape::Circle,
            diameter: params.diameter,
            ratio: params.ratio,
            horizontal_fade: params.horizontal_fade,
            vertical_fade: params.vertical_fade,
            spikes: params.spikes,
            antialias_edges: params.antialias_edges,
            softness_curve: None,
        }
    }

    /// Set the encoded falloff curve.
    #[must_use]
    pub fn with_softness_curve(mut self, curve: impl Into<String>) -> Self {
        self.softness_curve = Some(curve.into());
        self
    }

    /// The geometry parameters.
    #[must_use]
    pub const fn params(&self) -> MaskParams {
        MaskParams {
            diameter: self.diameter,
            ratio: self.ratio,
            horizontal_fade: self.horizontal_fade,
            vertical_fade: self.vertical_fade,
            spikes: self.spikes,
            antialias_edges: self.antialias_edges,
        }
    }

    /// Build the generator, decoding curves with [`PointListCodec`].
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not a circle, the diameter is out of
    /// range, or the curve is malformed.
    pub fn into_generator(self) -> MaskResult<MaskGenerator> {
        self.into_generator_with_codec(&PointListCodec)
    }

    /// Build the generator, decoding curves with `codec`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not a circle, the diameter is not
    /// finite or exceeds [`MAX_DIAMETER`], or the curve is malformed.
    pub fn into_generator_with_codec(self, codec: &dyn CurveCodec) -> MaskResult<MaskGenerator> {
        if self.shape != MaskShape::Circle {
            return Err(MaskError::UnsupportedShape(self.shape.as_str().to_string()));
        }
        if !self.diameter.is_finite() || self.diameter > MAX_DIAMETER {
            return Err(MaskError::InvalidAttribute {
                name: "diameter".to_string(),
                value: self.diameter.to_string(),
            });
        }

        let params = self.params();
        let generator = match self.id {
            MaskId::Default => CircleMaskGenerator::new(params).into(),
            MaskId::Soft => {
                let curve = match self.softness_curve.as_deref().map(str::trim) {
                    Some(encoded) if !encoded.is_empty() => codec.decode(encoded)?,
                    _ => CubicCurve::default(),
                };
                CurveCircleMaskGenerator::with_codec(params, &curve, codec).into()
            }
            MaskId::Gauss => GaussCircleMaskGenerator::new(params).into(),
        };
        Ok(generator)
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> MaskResult<String> {
        serde_json::to_string_pretty(self).map_err(MaskError::Serialization)
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> MaskResult<Self> {
        serde_json::from_str(json).map_err(MaskError::Serialization)
    }
}

impl From<&MaskGenerator> for MaskDocument {
    fn from(generator: &MaskGenerator) -> Self {
        let document = Self::from_params(generator.id(), *generator.base().params());
        match generator.curve_string() {
            Some(curve) => document.with_softness_curve(curve),
            None => document,
        }
    }
}
