//! Antialiasing band at the mask outline.
//!
//! Samples past the radius are fully unmasked. With antialiasing enabled, a
//! band just inside the radius ramps linearly from the generator's own value
//! at the band start up to 255, hiding stair-stepping at the edge.

/// Derived fade-band parameters for one generator state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AntialiasingFadeMaker {
    radius: f64,
    fade_start: f64,
    fade_start_value: f64,
    fade_coeff: f64,
    enabled: bool,
}

impl AntialiasingFadeMaker {
    /// Band for generators measuring squared normalized distance, where the
    /// outline sits at 1.
    ///
    /// `base` is the generator's unfaded value function.
    #[must_use]
    pub fn for_square_norm(
        enabled: bool,
        xcoeff: f64,
        ycoeff: f64,
        base: impl Fn(f64) -> u8,
    ) -> Self {
        let xf = ((1.0 / xcoeff - 1.0) * xcoeff).max(0.0);
        let yf = ((1.0 / ycoeff - 1.0) * ycoeff).max(0.0);
        let start = 0.5 * (xf + yf);
        Self::with_band(enabled, 1.0, start * start, base)
    }

    /// Band for generators measuring distance in pixels; the band is the
    /// last pixel inside `radius`.
    #[must_use]
    pub fn for_radius(enabled: bool, radius: f64, base: impl Fn(f64) -> u8) -> Self {
        Self::with_band(enabled, radius, (radius - 1.0).max(0.0), base)
    }

    fn with_band(enabled: bool, radius: f64, fade_start: f64, base: impl Fn(f64) -> u8) -> Self {
        let fade_start_value = f64::from(base(fade_start));
        let width = radius - fade_start;
        let fade_coeff = if width > 0.0 {
            (255.0 - fade_start_value).max(0.0) / width
        } else {
            0.0
        };

        Self {
            radius,
            fade_start,
            fade_start_value,
            fade_coeff,
            enabled,
        }
    }

    /// The outline radius in the generator's distance units.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Where the antialiasing band starts.
    #[must_use]
    pub const fn fade_start(&self) -> f64 {
        self.fade_start
    }

    /// The value overriding the generator's own at `dist`, if any.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn need_fade(&self, dist: f64) -> Option<u8> {
        if dist > self.radius {
            return Some(u8::MAX);
        }
        if !self.enabled {
            return None;
        }
        if dist > self.fade_start {
            let value = self.fade_start_value + (dist - self.fade_start) * self.fade_coeff;
            return Some(value.clamp(0.0, 255.0) as u8);
        }
        None
    }
}
