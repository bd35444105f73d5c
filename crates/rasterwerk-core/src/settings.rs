// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster settings and the per-format save-parameter policy.

use serde::{Deserialize, Serialize};

use crate::error::{RasterwerkError, Result};

/// Resolution used when no DPI is supplied.
pub const DEFAULT_DPI: u32 = 300;

/// PDF user space is 72 points per inch; zoom factors are derived against it.
pub const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Supported raster output formats.
///
/// `JPG` is accepted as an alias for JPEG when parsing; everything else is a
/// configuration error raised at parse time, before any file is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Tiff,
    Bmp,
}

impl OutputFormat {
    /// File extension (lowercase, without the dot) used for output filenames.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Tiff => "tiff",
            Self::Bmp => "bmp",
        }
    }

    /// Codec parameters to use when saving in this format.
    ///
    /// Total over all variants: every accepted format has a parameter set.
    pub fn save_params(&self) -> SaveParams {
        match self {
            Self::Jpeg => SaveParams::Jpeg { quality: 95 },
            Self::Png => SaveParams::Png {
                compression: PngCompression::Default,
                filter: PngFilter::Adaptive,
            },
            Self::Tiff => SaveParams::Tiff {
                compression: TiffCompression::Lzw,
            },
            Self::Bmp => SaveParams::Bmp,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = RasterwerkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PNG" => Ok(Self::Png),
            "JPEG" | "JPG" => Ok(Self::Jpeg),
            "TIFF" => Ok(Self::Tiff),
            "BMP" => Ok(Self::Bmp),
            other => Err(RasterwerkError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Tiff => "TIFF",
            Self::Bmp => "BMP",
        };
        write!(f, "{}", name)
    }
}

/// Closed save-parameter set, tagged by format.
///
/// Enumerates exactly the options the codec stack recognizes; there is no
/// open-ended parameter bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveParams {
    /// Baseline JPEG at the given quality (1-100).
    Jpeg { quality: u8 },
    /// PNG with a zlib compression class and a row-filter strategy.
    Png {
        compression: PngCompression,
        filter: PngFilter,
    },
    /// TIFF with the given compression scheme.
    Tiff { compression: TiffCompression },
    /// BMP takes no parameters.
    Bmp,
}

/// zlib compression classes exposed by the PNG encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngCompression {
    Fast,
    /// The standard level-6 zlib setting.
    Default,
    Best,
}

/// PNG row-filter strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngFilter {
    NoFilter,
    /// Horizontal differencing against the previous pixel.
    Sub,
    /// Pick the best filter per row.
    Adaptive,
}

/// TIFF compression schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    Uncompressed,
    Lzw,
    Deflate,
}

/// Settings for a rasterization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterSettings {
    /// Resolution in dots per inch.
    pub dpi: u32,
    /// Output image format.
    pub format: OutputFormat,
    /// Apply the contrast/sharpness enhancement to each rendered page.
    pub enhance: bool,
}

impl RasterSettings {
    /// Create settings with the given DPI and format, enhancement on.
    ///
    /// A zero DPI is rejected here rather than producing a zero zoom factor
    /// downstream.
    pub fn new(dpi: u32, format: OutputFormat) -> Result<Self> {
        if dpi == 0 {
            return Err(RasterwerkError::InvalidSettings(
                "dpi must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            dpi,
            format,
            enhance: true,
        })
    }

    /// Zoom factor relative to PDF user space (72 points per inch).
    pub fn zoom_factor(&self) -> f32 {
        self.dpi as f32 / PDF_POINTS_PER_INCH
    }
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            format: OutputFormat::Png,
            enhance: true,
        }
    }
}

// -- Tests --------------------------------------------------------------------
