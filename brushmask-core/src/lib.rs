//! # Brushmask Core
//!
//! Brush mask generators for dab-based painting engines.
//! A generator maps a brush-local point to a mask value (0 paints fully,
//! 255 not at all); an applicator fills a whole dab with coverage.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                MaskGenerator                │
//! │   Circle   │   CurveCircle   │  GaussCircle │
//! ├─────────────────────────────────────────────┤
//! │  MaskBase          │  Falloff               │
//! │  - Size / ratio    │  - Transfer table      │
//! │  - Scale           │  - Softness transform  │
//! │  - Spike folding   │  - erf profile         │
//! │                    │  - Antialiasing band   │
//! ├─────────────────────────────────────────────┤
//! │  MaskApplicator    │  Serialization         │
//! │  - Vectorized      │  - XML fragments       │
//! │  - Scalar          │  - JSON documents      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use brushmask_core::{CubicCurve, CurveCircleMaskGenerator, MaskGenerator, MaskParams};
//!
//! let mask: MaskGenerator =
//!     CurveCircleMaskGenerator::new(MaskParams::new(64.0), &CubicCurve::default()).into();
//! assert_eq!(mask.value_at(0.0, 0.0), 0);
//! assert_eq!(mask.value_at(40.0, 0.0), 255);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod applicator;
pub mod codec;
pub mod curve;
pub mod document;
pub mod error;
pub mod fade;
pub mod generator;
pub mod geometry;
pub mod softness;
pub mod xml;

pub use applicator::{AlphaDab, DabRect, MaskApplicator, MaskProcessingData, LANES};
pub use codec::{CurveCodec, PointListCodec};
pub use curve::{CubicCurve, CurvePoint};
pub use document::MaskDocument;
pub use error::{MaskError, MaskResult};
pub use fade::AntialiasingFadeMaker;
pub use generator::{
    CircleMaskGenerator, CurveCircleMaskGenerator, GaussCircleMaskGenerator, MaskGenerator,
    MaskId, MaskShape, MAX_CURVE_RESOLUTION, OVERSAMPLING,
};
pub use geometry::{MaskBase, MaskParams, MAX_DIAMETER};
pub use softness::transform_curve_for_softness;

/// Brushmask core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
