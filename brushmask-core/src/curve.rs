//! Control-point curves and their resampled transfer tables.
//!
//! A [`CubicCurve`] is split at corner points into runs; each run is a
//! natural cubic spline through its points. Transfer tables sample the curve
//! at evenly spaced positions over `[0, 1]`.

use serde::{Deserialize, Serialize};

use crate::error::{MaskError, MaskResult};

/// Points closer than this along x are treated as the same position.
const POSITION_EPSILON: f64 = 1e-9;

/// A control point of a [`CubicCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Position along the curve, in `[0, 1]`.
    pub x: f64,
    /// Value at this position, in `[0, 1]`.
    pub y: f64,
    /// Corner points break spline smoothing.
    #[serde(default)]
    pub corner: bool,
}

impl CurvePoint {
    /// Create a smooth (non-corner) point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            corner: false,
        }
    }

    /// Create a corner point.
    #[must_use]
    pub const fn corner(x: f64, y: f64) -> Self {
        Self { x, y, corner: true }
    }

    /// Set whether this point is a corner.
    #[must_use]
    pub const fn with_corner(mut self, corner: bool) -> Self {
        self.corner = corner;
        self
    }
}

/// Natural cubic spline over one run of points.
#[derive(Debug, Clone, PartialEq)]
struct NaturalSpline {
    begin: f64,
    end: f64,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
    h: Vec<f64>,
}

impl NaturalSpline {
    fn new(points: &[CurvePoint]) -> Self {
        let begin = points.first().map_or(0.0, |p| p.x);
        let end = points.last().map_or(0.0, |p| p.x);
        let a: Vec<f64> = points.iter().map(|p| p.y).collect();

        let intervals = points.len().saturating_sub(1);
        if intervals == 0 {
            return Self {
                begin,
                end,
                a,
                b: Vec::new(),
                c: vec![0.0],
                d: Vec::new(),
                h: Vec::new(),
            };
        }

        let h: Vec<f64> = points.windows(2).map(|w| w[1].x - w[0].x).collect();

        // Second derivatives, zero at both ends.
        let mut c = vec![0.0; intervals + 1];
        if intervals > 1 {
            let inner = intervals - 1;
            let diag: Vec<f64> = (0..inner).map(|i| 2.0 * (h[i] + h[i + 1])).collect();
            let rhs: Vec<f64> = (0..inner)
                .map(|i| 6.0 * ((a[i + 2] - a[i + 1]) / h[i + 1] - (a[i + 1] - a[i]) / h[i]))
                .collect();
            let off: Vec<f64> = (1..inner).map(|i| h[i]).collect();
            let solved = solve_tridiagonal(&off, &diag, &off, &rhs);
            c[1..=inner].copy_from_slice(&solved);
        }

        let d: Vec<f64> = (0..intervals).map(|i| (c[i + 1] - c[i]) / h[i]).collect();
        let b: Vec<f64> = (0..intervals)
            .map(|i| {
                -0.5 * (c[i] * h[i]) - (1.0 / 6.0) * (d[i] * h[i] * h[i]) + (a[i + 1] - a[i]) / h[i]
            })
            .collect();

        Self {
            begin,
            end,
            a,
            b,
            c,
            d,
            h,
        }
    }

    fn contains(&self, x: f64) -> bool {
        x >= self.begin && x <= self.end
    }

    fn value(&self, x: f64) -> f64 {
        if self.h.is_empty() {
            return self.a.first().copied().unwrap_or(0.0);
        }
        let (i, x0) = self.find_region(x);
        let t = x - x0;
        self.a[i] + self.b[i] * t + 0.5 * self.c[i] * t * t + (1.0 / 6.0) * self.d[i] * t * t * t
    }

    /// Interval index and its start position. Positions past the end map
    /// onto the last interval.
    fn find_region(&self, x: f64) -> (usize, f64) {
        let mut x0 = self.begin;
        for (i, &h) in self.h.iter().enumerate() {
            if x >= x0 && x < x0 + h {
                return (i, x0);
            }
            x0 += h;
        }
        let last = self.h.len() - 1;
        if x < self.begin {
            return (0, self.begin);
        }
        (last, x0 - self.h[last])
    }
}

/// Solve a tridiagonal system with the Thomas algorithm.
///
/// `sub` and `sup` hold `diag.len() - 1` entries each.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    if n > 1 {
        c_prime[0] = sup[0] / diag[0];
    }
    d_prime[0] = rhs[0] / diag[0];

    for i in 1..n {
        let m = diag[i] - sub[i - 1] * c_prime[i - 1];
        if i < n - 1 {
            c_prime[i] = sup[i] / m;
        }
        d_prime[i] = (rhs[i] - sub[i - 1] * d_prime[i - 1]) / m;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }
    x
}

/// An ordered set of control points evaluated as piecewise natural cubic
/// splines.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicCurve {
    points: Vec<CurvePoint>,
    runs: Vec<NaturalSpline>,
}

impl CubicCurve {
    /// Build a curve from control points.
    ///
    /// Points are sorted by position. Points sharing a position with their
    /// predecessor replace it.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::InvalidCurve`] if fewer than two points are given
    /// or any coordinate is not finite.
    pub fn new(points: Vec<CurvePoint>) -> MaskResult<Self> {
        if points.len() < 2 {
            return Err(MaskError::InvalidCurve(format!(
                "a curve needs at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some(p) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(MaskError::InvalidCurve(format!(
                "non-finite control point ({}, {})",
                p.x, p.y
            )));
        }

        Ok(Self::from_finite_points(points))
    }

    /// Sort and collapse already validated points.
    pub(crate) fn from_finite_points(points: Vec<CurvePoint>) -> Self {
        let mut sorted = points;
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

        let mut collapsed: Vec<CurvePoint> = Vec::with_capacity(sorted.len());
        for point in sorted {
            match collapsed.last_mut() {
                Some(last) if (point.x - last.x).abs() < POSITION_EPSILON => *last = point,
                _ => collapsed.push(point),
            }
        }

        let runs = Self::build_runs(&collapsed);
        Self {
            points: collapsed,
            runs,
        }
    }

    /// The linear falloff curve `(0, 1) → (1, 0)`.
    #[must_use]
    pub fn linear_falloff() -> Self {
        let points = vec![CurvePoint::new(0.0, 1.0), CurvePoint::new(1.0, 0.0)];
        let runs = Self::build_runs(&points);
        Self { points, runs }
    }

    fn build_runs(points: &[CurvePoint]) -> Vec<NaturalSpline> {
        let mut runs = Vec::new();
        let mut start = 0;
        for i in 1..points.len().saturating_sub(1) {
            if points[i].corner {
                runs.push(NaturalSpline::new(&points[start..=i]));
                start = i;
            }
        }
        runs.push(NaturalSpline::new(&points[start..]));
        runs
    }

    /// The control points, sorted by position.
    #[must_use]
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Evaluate the curve at `x`.
    ///
    /// `x` is clamped to the span of the control points and the result is
    /// clamped to `[0, 1]`.
    #[must_use]
    pub fn value(&self, x: f64) -> f64 {
        let begin = self.points.first().map_or(0.0, |p| p.x);
        let end = self.points.last().map_or(0.0, |p| p.x);
        let x = x.clamp(begin, end);

        let run = self
            .runs
            .iter()
            .find(|run| run.contains(x))
            .or_else(|| self.runs.last());
        run.map_or(0.0, |run| run.value(x)).clamp(0.0, 1.0)
    }

    /// Sample the curve at `size` evenly spaced positions over `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn float_transfer(&self, size: usize) -> Vec<f64> {
        match size {
            0 => Vec::new(),
            1 => vec![self.value(0.0)],
            _ => {
                let step = 1.0 / (size - 1) as f64;
                (0..size).map(|i| self.value(i as f64 * step)).collect()
            }
        }
    }
}

impl Default for CubicCurve {
    fn default() -> Self {
        Self::linear_falloff()
    }
}
