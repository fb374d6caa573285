//! Preview error types.

use std::path::PathBuf;

use brushmask_core::MaskError;
use thiserror::Error;

/// Result type for preview operations.
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Errors that can occur while previewing a mask.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The description file has an extension other than `.json` or `.xml`.
    #[error("Unsupported config format: {}", .0.display())]
    UnsupportedConfig(PathBuf),

    /// The mask description is invalid.
    #[error(transparent)]
    Mask(#[from] MaskError),

    /// The dab would exceed the preview size limit.
    #[error("Dab of {size} px is larger than the {max} px preview limit")]
    DabTooLarge {
        /// Requested dab size.
        size: f64,
        /// Largest supported dab size.
        max: u32,
    },

    /// PNG encoding failed.
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}
