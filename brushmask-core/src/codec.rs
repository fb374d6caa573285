//! Curve ⇄ string codecs.
//!
//! Generators keep the encoded form of their curve so it can be written back
//! into XML fragments and JSON documents unchanged.

use std::fmt::Write;

use crate::curve::{CubicCurve, CurvePoint};
use crate::error::{MaskError, MaskResult};

/// Marker written after the coordinates of a corner point.
const CORNER_MARKER: &str = "is_corner";

/// Encodes and decodes [`CubicCurve`]s as strings.
pub trait CurveCodec {
    /// Encode a curve.
    fn encode(&self, curve: &CubicCurve) -> String;

    /// Decode a curve.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::InvalidCurve`] if the string is malformed.
    fn decode(&self, encoded: &str) -> MaskResult<CubicCurve>;
}

/// `x,y;x,y,is_corner;` point lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointListCodec;

impl CurveCodec for PointListCodec {
    fn encode(&self, curve: &CubicCurve) -> String {
        let mut out = String::new();
        for point in curve.points() {
            // Writing to a String cannot fail.
            let _ = write!(out, "{},{}", point.x, point.y);
            if point.corner {
                out.push(',');
                out.push_str(CORNER_MARKER);
            }
            out.push(';');
        }
        out
    }

    fn decode(&self, encoded: &str) -> MaskResult<CubicCurve> {
        let mut points = Vec::new();
        for entry in encoded.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let fields: Vec<&str> = entry.split(',').map(str::trim).collect();
            let corner = match fields.as_slice() {
                [_, _] => false,
                [_, _, marker] if *marker == CORNER_MARKER => true,
                _ => {
                    return Err(MaskError::InvalidCurve(format!(
                        "malformed point '{entry}'"
                    )))
                }
            };
            let x = parse_coordinate(fields[0], entry)?;
            let y = parse_coordinate(fields[1], entry)?;
            points.push(CurvePoint::new(x, y).with_corner(corner));
        }
        CubicCurve::new(points)
    }
}

fn parse_coordinate(field: &str, entry: &str) -> MaskResult<f64> {
    field
        .parse::<f64>()
        .map_err(|e| MaskError::InvalidCurve(format!("bad coordinate in '{entry}': {e}")))
}
