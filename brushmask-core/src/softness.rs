//! Softness remapping of curve control points.

use crate::curve::{CubicCurve, CurvePoint};

/// Remap a curve's control points by `softness` and resample it.
///
/// A two-point ramp gets a smooth midpoint whose value is scaled by
/// `softness`; longer curves have every interior value scaled. Scaled values
/// are clamped to `[0, 1]`. The input points are not modified.
#[must_use]
pub fn transform_curve_for_softness(softness: f64, points: &[CurvePoint], size: usize) -> Vec<f64> {
    let mut transformed = points.to_vec();

    if let [first, last] = points {
        let mid_y = (first.y + last.y) * 0.5;
        let mid = CurvePoint::new((first.x + last.x) * 0.5, scale_value(mid_y, softness));
        transformed.insert(1, mid);
    } else if let [_, interior @ .., _] = transformed.as_mut_slice() {
        for point in interior {
            point.y = scale_value(point.y, softness);
        }
    }

    CubicCurve::from_finite_points(transformed).float_transfer(size)
}

/// `f64::max` discards NaN, so a NaN product maps to 0.
fn scale_value(y: f64, softness: f64) -> f64 {
    (y * softness).max(0.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Vec<CurvePoint> {
        vec![CurvePoint::new(0.0, 1.0), CurvePoint::new(1.0, 0.0)]
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_unit_softness_keeps_linear_ramp() {
        let table = transform_curve_for_softness(1.0, &ramp(), 11);
        for (i, v) in table.iter().enumerate() {
            let expected = 1.0 - i as f64 / 10.0;
            assert!((v - expected).abs() < 1e-9, "sample {i}: {v} vs {expected}");
        }
    }

    #[test]
    fn test_zero_softness_pulls_midpoint_down() {
        let table = transform_curve_for_softness(0.0, &ramp(), 3);
        assert!((table[0] - 1.0).abs() < 1e-12);
        assert!(table[1].abs() < 1e-12);
        assert!(table[2].abs() < 1e-12);
    }

    #[test]
    fn test_interior_points_are_scaled_and_clamped() {
        let points = vec![
            CurvePoint::new(0.0, 1.0),
            CurvePoint::new(0.5, 0.6),
            CurvePoint::new(1.0, 0.0),
        ];
        let table = transform_curve_for_softness(3.0, &points, 3);
        assert!((table[1] - 1.0).abs() < 1e-12);
        // Endpoints are untouched.
        assert!((table[0] - 1.0).abs() < 1e-12);
        assert!(table[2].abs() < 1e-12);
        // Source points stay as they were.
        assert!((points[1].y - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nan_softness_stays_finite() {
        let table = transform_curve_for_softness(f64::NAN, &ramp(), 16);
        assert!(table.iter().all(|v| v.is_finite()));
    }
}
