//! Building the generator and rendering the dab.

use std::ffi::OsStr;
use std::path::Path;

use brushmask_core::{AlphaDab, MaskDocument, MaskGenerator, MaskProcessingData};

use crate::error::{PreviewError, PreviewResult};
use crate::{MaskSource, PreviewConfig};

/// Largest dab edge the preview will render.
pub const MAX_DAB_SIZE: u32 = 8192;

/// Read a mask description file, choosing the format by extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unknown extension or
/// does not describe a valid mask.
pub fn read_document(path: &Path) -> PreviewResult<MaskDocument> {
    let contents = std::fs::read_to_string(path).map_err(|source| PreviewError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    let document = match extension.as_deref() {
        Some("json") => MaskDocument::from_json(&contents)?,
        Some("xml") => MaskDocument::from_xml(&contents)?,
        _ => return Err(PreviewError::UnsupportedConfig(path.to_path_buf())),
    };

    tracing::debug!("Loaded {} mask from {}", document.id, path.display());
    Ok(document)
}

/// Build the generator and apply the per-dab scale, softness and
/// applicator preference.
///
/// # Errors
///
/// Returns an error if the description cannot be loaded.
pub fn load_generator(config: &PreviewConfig) -> PreviewResult<MaskGenerator> {
    let document = match &config.source {
        MaskSource::File(path) => read_document(path)?,
        MaskSource::Inline(document) => document.clone(),
    };

    let mut generator = document.into_generator()?;
    generator.set_scale(config.scale, config.scale);
    generator.set_softness(config.softness);
    if config.force_scalar {
        generator.set_scalar_applicator();
    }
    Ok(generator)
}

/// Edge length of a square dab that holds the mask at any rotation.
///
/// # Errors
///
/// Returns [`PreviewError::DabTooLarge`] past [`MAX_DAB_SIZE`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn dab_size(generator: &MaskGenerator) -> PreviewResult<u32> {
    let base = generator.base();
    let extent = base
        .effective_src_width()
        .max(base.effective_src_height())
        .max(0.0);
    let size = extent.ceil() + 2.0;

    if size.is_finite() && size <= f64::from(MAX_DAB_SIZE) {
        Ok(size as u32)
    } else {
        Err(PreviewError::DabTooLarge {
            size,
            max: MAX_DAB_SIZE,
        })
    }
}

/// Render one dab centered in a square of [`dab_size`] pixels.
///
/// # Errors
///
/// Returns an error if the dab would be too large.
pub fn render(generator: &MaskGenerator, config: &PreviewConfig) -> PreviewResult<AlphaDab> {
    let size = dab_size(generator)?;
    let data = MaskProcessingData::centered(size, size, config.angle);

    tracing::info!(
        "Rendering {} mask as {size}x{size} dab with {:?} applicator",
        generator.id(),
        generator.applicator()
    );
    Ok(generator.render_dab(&data, size, size))
}
