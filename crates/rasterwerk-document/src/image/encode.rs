// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format-specific image encoding — applies the save-parameter policy from
// rasterwerk-core to the actual codec calls.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};
use rasterwerk_core::error::{RasterwerkError, Result};
use rasterwerk_core::settings::{
    OutputFormat, PngCompression, PngFilter, SaveParams, TiffCompression,
};
use tiff::encoder::colortype::RGB8;
use tiff::encoder::compression::{Deflate, Lzw, Uncompressed};
use tiff::encoder::TiffEncoder;
use tracing::debug;

/// Encode an image into the given format, honouring the format's save
/// parameters, and return the raw bytes.
pub fn encode_image(image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut buffer = Vec::new();

    match format.save_params() {
        SaveParams::Jpeg { quality } => {
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            rgb.write_with_encoder(encoder).map_err(|err| {
                RasterwerkError::ImageError(format!("JPEG encoding failed: {}", err))
            })?;
        }
        SaveParams::Png {
            compression,
            filter,
        } => {
            let encoder = PngEncoder::new_with_quality(
                &mut buffer,
                png_compression(compression),
                png_filter(filter),
            );
            rgb.write_with_encoder(encoder).map_err(|err| {
                RasterwerkError::ImageError(format!("PNG encoding failed: {}", err))
            })?;
        }
        SaveParams::Tiff { compression } => {
            let mut cursor = Cursor::new(&mut buffer);
            let mut encoder = TiffEncoder::new(&mut cursor).map_err(|err| {
                RasterwerkError::ImageError(format!("TIFF encoder setup failed: {}", err))
            })?;
            let (width, height) = rgb.dimensions();
            let result = match compression {
                TiffCompression::Lzw => encoder
                    .write_image_with_compression::<RGB8, _>(width, height, Lzw, rgb.as_raw()),
                TiffCompression::Deflate => encoder.write_image_with_compression::<RGB8, _>(
                    width,
                    height,
                    Deflate::default(),
                    rgb.as_raw(),
                ),
                TiffCompression::Uncompressed => encoder
                    .write_image_with_compression::<RGB8, _>(
                        width,
                        height,
                        Uncompressed,
                        rgb.as_raw(),
                    ),
            };
            result.map_err(|err| {
                RasterwerkError::ImageError(format!("TIFF encoding failed: {}", err))
            })?;
        }
        SaveParams::Bmp => {
            let mut cursor = Cursor::new(&mut buffer);
            rgb.write_to(&mut cursor, ImageFormat::Bmp).map_err(|err| {
                RasterwerkError::ImageError(format!("BMP encoding failed: {}", err))
            })?;
        }
    }

    debug!(format = %format, bytes = buffer.len(), "Image encoded");
    Ok(buffer)
}

/// Encode and write an image to `path` in one step.
pub fn save_image(image: &DynamicImage, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
    let bytes = encode_image(image, format)?;
    std::fs::write(path.as_ref(), &bytes)?;
    Ok(())
}

fn png_compression(compression: PngCompression) -> CompressionType {
    match compression {
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Default => CompressionType::Default,
        PngCompression::Best => CompressionType::Best,
    }
}

fn png_filter(filter: PngFilter) -> FilterType {
    match filter {
        PngFilter::NoFilter => FilterType::NoFilter,
        PngFilter::Sub => FilterType::Sub,
        PngFilter::Adaptive => FilterType::Adaptive,
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn test_image() -> DynamicImage {
        let mut img = RgbImage::from_pixel(20, 10, Rgb([200, 120, 40]));
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(19, 9, Rgb([255, 255, 255]));
        DynamicImage::ImageRgb8(img)
    }

    /// Every accepted format round-trips through its encoder and decodes back
    /// to the original dimensions.
    #[test]
    fn encode_all_formats_decodable() {
        let img = test_image();
        for format in [
            OutputFormat::Png,
            OutputFormat::Jpeg,
            OutputFormat::Tiff,
            OutputFormat::Bmp,
        ] {
            let bytes = encode_image(&img, format).unwrap();
            assert!(!bytes.is_empty(), "{} produced no bytes", format);

            let decoded = image::load_from_memory(&bytes)
                .unwrap_or_else(|err| panic!("{} did not decode: {}", format, err));
            assert_eq!(decoded.width(), 20, "{} width", format);
            assert_eq!(decoded.height(), 10, "{} height", format);
        }
    }

    /// PNG and BMP are lossless: pixel data survives the round trip.
    #[test]
    fn lossless_formats_roundtrip_exactly() {
        let img = test_image();
        for format in [OutputFormat::Png, OutputFormat::Bmp] {
            let bytes = encode_image(&img, format).unwrap();
            let decoded = image::load_from_memory(&bytes).unwrap().into_rgb8();
            assert_eq!(decoded, img.to_rgb8(), "{} altered pixels", format);
        }
    }

    /// `save_image` writes the encoded bytes to disk.
    #[test]
    fn save_image_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");

        save_image(&test_image(), &path, OutputFormat::Png).unwrap();

        assert!(path.exists());
        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.width(), 20);
    }
}
