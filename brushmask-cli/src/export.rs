//! Dab export: grayscale PNG and plain-text value tables.

use std::fmt::Write;
use std::path::Path;

use brushmask_core::{AlphaDab, MaskGenerator};
use image::ImageEncoder;

use crate::error::{PreviewError, PreviewResult};

/// Encode the dab's coverage as an 8-bit grayscale PNG.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_png(dab: &AlphaDab) -> PreviewResult<Vec<u8>> {
    let mut buf = std::io::Cursor::new(Vec::new());
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    encoder.write_image(
        dab.data(),
        dab.width(),
        dab.height(),
        image::ColorType::L8.into(),
    )?;
    Ok(buf.into_inner())
}

/// Encode the dab and write it to `path`.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_png(dab: &AlphaDab, path: &Path) -> PreviewResult<()> {
    let png = encode_png(dab)?;
    std::fs::write(path, &png).map_err(|source| PreviewError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Wrote {} bytes to {}", png.len(), path.display());
    Ok(())
}

/// Mask values along the horizontal line through the center, one
/// `offset<TAB>value` line per pixel from `-reach` to `reach`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn value_table(generator: &MaskGenerator, reach: u32) -> String {
    let reach = i64::from(reach);
    let mut out = String::new();
    for offset in -reach..=reach {
        let value = generator.value_at(offset as f64, 0.0);
        let _ = writeln!(out, "{offset}\t{value}");
    }
    out
}

/// Table reach that includes the first pixel past the outline.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn default_reach(generator: &MaskGenerator) -> u32 {
    let radius = generator.base().effective_src_width() / 2.0;
    if radius.is_finite() && radius > 0.0 {
        radius.ceil() as u32 + 1
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brushmask_core::{CubicCurve, CurveCircleMaskGenerator, MaskParams};

    fn soft(diameter: f64) -> MaskGenerator {
        CurveCircleMaskGenerator::new(MaskParams::new(diameter), &CubicCurve::default()).into()
    }

    #[test]
    fn test_value_table_golden_row() {
        let mask = soft(64.0);
        assert_eq!(default_reach(&mask), 33);

        let table = value_table(&mask, default_reach(&mask));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 67);
        assert_eq!(lines[0], "-33\t255");
        assert!(lines.contains(&"0\t0"));
        assert!(lines.contains(&"16\t63"));
        assert!(lines.contains(&"-16\t63"));
    }

    #[test]
    fn test_png_signature() {
        let png = encode_png(&AlphaDab::new(4, 3)).expect("encodes");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
