//! Bulk evaluation of a generator over a dab.
//!
//! Two strategies fill the same [`AlphaDab`]:
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────┐
//! │ Vectorized                   │ Scalar                       │
//! ├──────────────────────────────┼──────────────────────────────┤
//! │ plain ellipses, no           │ any shape                    │
//! │ supersampling                │ 2×2 / 6×6 supersampling      │
//! │ row terms shared, lanes of 8 │ one value_at per sample      │
//! └──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! The strategy is a plain value; the generator is borrowed for the duration
//! of [`MaskApplicator::process`] only.

use crate::generator::MaskGenerator;

/// Pixels evaluated per batch by the vectorized applicator.
pub const LANES: usize = 8;

/// Placement of a dab: mask center in dab pixel coordinates and rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskProcessingData {
    /// Mask center, x.
    pub center_x: f64,
    /// Mask center, y.
    pub center_y: f64,
    cosa: f64,
    sina: f64,
}

impl MaskProcessingData {
    /// Center at `(center_x, center_y)`, rotated by `angle` radians.
    #[must_use]
    pub fn new(center_x: f64, center_y: f64, angle: f64) -> Self {
        Self {
            center_x,
            center_y,
            cosa: angle.cos(),
            sina: angle.sin(),
        }
    }

    /// Centered in a `width` × `height` dab.
    #[must_use]
    pub fn centered(width: u32, height: u32, angle: f64) -> Self {
        Self::new(
            (f64::from(width) - 1.0) / 2.0,
            (f64::from(height) - 1.0) / 2.0,
            angle,
        )
    }

    /// Cosine of the rotation.
    #[must_use]
    pub const fn cos(&self) -> f64 {
        self.cosa
    }

    /// Sine of the rotation.
    #[must_use]
    pub const fn sin(&self) -> f64 {
        self.sina
    }
}

/// A rectangle of dab pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DabRect {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl DabRect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersection with `[0, width) × [0, height)`.
    #[must_use]
    pub fn clipped_to(self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }
}

/// An 8-bit coverage buffer for one dab; 255 is full paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaDab {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl AlphaDab {
    /// A fully transparent dab.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The whole dab as a rectangle.
    #[must_use]
    pub const fn bounds(&self) -> DabRect {
        DabRect::new(0, 0, self.width, self.height)
    }

    /// Row-major coverage bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the dab, returning its bytes.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Coverage at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y as usize * self.width as usize + x as usize).copied()
    }

    fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let width = self.width as usize;
        let start = y as usize * width;
        &mut self.data[start..start + width]
    }
}

/// Bulk evaluation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskApplicator {
    /// Row-shared coefficients, [`LANES`] pixels per batch.
    Vectorized,
    /// One evaluation per sample, with supersampling for tiny brushes.
    Scalar,
}

impl MaskApplicator {
    /// Fill `rect` (clipped to the dab) with coverage from `generator`.
    ///
    /// The vectorized strategy falls back to scalar evaluation when the
    /// generator cannot be vectorized.
    pub fn process(
        self,
        generator: &MaskGenerator,
        data: &MaskProcessingData,
        rect: DabRect,
        dab: &mut AlphaDab,
    ) {
        let rect = rect.clipped_to(dab.width(), dab.height());
        if rect.is_empty() {
            return;
        }

        match self {
            Self::Vectorized if generator.should_vectorize() => {
                process_vectorized(generator, data, rect, dab);
            }
            Self::Vectorized | Self::Scalar => process_scalar(generator, data, rect, dab),
        }
    }
}

fn supersample_factor(generator: &MaskGenerator) -> u32 {
    let base = generator.base();
    if base.should_supersample_6x6() {
        6
    } else if base.should_supersample() {
        2
    } else {
        1
    }
}

fn process_scalar(
    generator: &MaskGenerator,
    data: &MaskProcessingData,
    rect: DabRect,
    dab: &mut AlphaDab,
) {
    let supersample = supersample_factor(generator);
    let invss = 1.0 / f64::from(supersample);
    let sample_area = supersample * supersample;

    for y in rect.y..rect.y + rect.height {
        let row = dab.row_mut(y);
        for x in rect.x..rect.x + rect.width {
            let mut value: u32 = 0;
            for sy in 0..supersample {
                for sx in 0..supersample {
                    let x_ = f64::from(x) + f64::from(sx) * invss - data.center_x;
                    let y_ = f64::from(y) + f64::from(sy) * invss - data.center_y;
                    let mask_x = data.cosa * x_ - data.sina * y_;
                    let mask_y = data.sina * x_ + data.cosa * y_;
                    value += u32::from(generator.value_at(mask_x, mask_y));
                }
            }
            let value = u8::try_from(value / sample_area).unwrap_or(u8::MAX);
            row[x as usize] = u8::MAX - value;
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn process_vectorized(
    generator: &MaskGenerator,
    data: &MaskProcessingData,
    rect: DabRect,
    dab: &mut AlphaDab,
) {
    let empty = generator.base().is_empty();

    for y in rect.y..rect.y + rect.height {
        let row = dab.row_mut(y);
        let end = rect.x + rect.width;

        if empty {
            row[rect.x as usize..end as usize].fill(0);
            continue;
        }

        let y_ = f64::from(y) - data.center_y;
        let sinay = data.sina * y_;
        let cosay = data.cosa * y_;

        let mut x = rect.x;
        while x < end {
            let mut xr = [0.0; LANES];
            let mut yr = [0.0; LANES];
            for (lane, (xl, yl)) in xr.iter_mut().zip(yr.iter_mut()).enumerate() {
                let x_ = f64::from(x + lane as u32) - data.center_x;
                *xl = data.cosa * x_ - sinay;
                *yl = data.sina * x_ + cosay;
            }

            let mut values = [0u8; LANES];
            generator.value_lanes(&xr, &yr, &mut values);

            let count = (end - x).min(LANES as u32) as usize;
            let start = x as usize;
            for (dst, &value) in row[start..start + count].iter_mut().zip(&values) {
                *dst = u8::MAX - value;
            }
            x += LANES as u32;
        }
    }
}
