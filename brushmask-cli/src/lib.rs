//! # Brushmask Preview
//!
//! Renders a single brush dab from a mask description and writes it out as
//! a grayscale PNG, a value table or an XML fragment.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p brushmask-cli -- --shape soft --diameter 64 --table
//! ```
//!
//! ## From a saved description:
//!
//! ```bash
//! cargo run -p brushmask-cli -- --config brush.xml --angle 30 --output dab.png
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `PreviewConfig` - Mask source plus per-dab scale, rotation and softness
//! - `preview` - Builds the generator and renders the dab
//! - `export` - PNG encoding and value tables

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod error;
pub mod export;
pub mod preview;

pub use error::{PreviewError, PreviewResult};

use std::path::PathBuf;

use brushmask_core::{MaskDocument, MaskId, MaskParams};
use clap::{Parser, ValueEnum};

/// Falloff family selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShapeArg {
    /// Linear fade band.
    Default,
    /// Curve-driven falloff.
    Soft,
    /// Gaussian falloff.
    Gauss,
}

impl From<ShapeArg> for MaskId {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Default => Self::Default,
            ShapeArg::Soft => Self::Soft,
            ShapeArg::Gauss => Self::Gauss,
        }
    }
}

/// Command-line arguments for brushmask-preview.
#[derive(Debug, Clone, Parser)]
#[command(name = "brushmask-preview")]
#[command(about = "Render a brush mask dab")]
#[command(version)]
pub struct CliArgs {
    /// Mask description file (.json document or .xml fragment); overrides the shape flags
    #[arg(long, env = "BRUSHMASK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Falloff family
    #[arg(long, value_enum, default_value = "soft")]
    pub shape: ShapeArg,

    /// Brush diameter in pixels
    #[arg(long, default_value = "64")]
    pub diameter: f64,

    /// Height / width aspect ratio
    #[arg(long, default_value = "1")]
    pub ratio: f64,

    /// Horizontal fade fraction
    #[arg(long, default_value = "0")]
    pub hfade: f64,

    /// Vertical fade fraction
    #[arg(long, default_value = "0")]
    pub vfade: f64,

    /// Number of spikes (2 is a plain ellipse)
    #[arg(long, default_value = "2")]
    pub spikes: u32,

    /// Antialias the outline
    #[arg(long)]
    pub antialias: bool,

    /// Falloff curve for the soft shape, e.g. "0,1;0.5,0.8;1,0;"
    #[arg(long)]
    pub curve: Option<String>,

    /// Uniform dab scale
    #[arg(long, default_value = "1")]
    pub scale: f64,

    /// Dab rotation in degrees
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub angle: f64,

    /// Softness factor
    #[arg(long, default_value = "1")]
    pub softness: f64,

    /// Always use the scalar applicator
    #[arg(long)]
    pub scalar: bool,

    /// Write the dab as a grayscale PNG
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print the mask values through the center row
    #[arg(long)]
    pub table: bool,

    /// Print the generator's XML fragment
    #[arg(long)]
    pub export_xml: bool,
}

/// Where the mask description comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskSource {
    /// A `.json` or `.xml` file.
    File(PathBuf),
    /// Parameters given on the command line.
    Inline(MaskDocument),
}

/// Preview configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewConfig {
    /// Mask description.
    pub source: MaskSource,
    /// Uniform dab scale.
    pub scale: f64,
    /// Dab rotation in radians.
    pub angle: f64,
    /// Softness factor.
    pub softness: f64,
    /// Force the scalar applicator.
    pub force_scalar: bool,
    /// PNG output path.
    pub output: Option<PathBuf>,
    /// Print the value table.
    pub table: bool,
    /// Print the XML fragment.
    pub export_xml: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewConfig {
    /// A 64 px soft brush at unit scale, printing its value table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: MaskSource::Inline(MaskDocument::from_params(
                MaskId::Soft,
                MaskParams::new(64.0),
            )),
            scale: 1.0,
            angle: 0.0,
            softness: 1.0,
            force_scalar: false,
            output: None,
            table: true,
            export_xml: false,
        }
    }

    /// Whether any output was requested.
    #[must_use]
    pub const fn has_output(&self) -> bool {
        self.output.is_some() || self.table || self.export_xml
    }
}

impl From<CliArgs> for PreviewConfig {
    fn from(args: CliArgs) -> Self {
        let source = if let Some(path) = args.config {
            MaskSource::File(path)
        } else {
            let params = MaskParams::new(args.diameter)
                .with_ratio(args.ratio)
                .with_fades(args.hfade, args.vfade)
                .with_spikes(args.spikes)
                .with_antialias_edges(args.antialias);
            let document = MaskDocument::from_params(args.shape.into(), params);
            MaskSource::Inline(match args.curve {
                Some(curve) if args.shape == ShapeArg::Soft => document.with_softness_curve(curve),
                _ => document,
            })
        };

        Self {
            source,
            scale: args.scale,
            angle: args.angle.to_radians(),
            softness: args.softness,
            force_scalar: args.scalar,
            output: args.output,
            table: args.table,
            export_xml: args.export_xml,
        }
    }
}
