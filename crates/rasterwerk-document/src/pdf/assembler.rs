// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF assembler — composes an ordered list of page images into a single
// multi-page PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::{Path, PathBuf};

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use rasterwerk_core::error::{RasterwerkError, Result};
use tracing::{debug, info, instrument, warn};

/// Millimetres per inch, for sizing page boxes from pixel dimensions.
const MM_PER_INCH: f32 = 25.4;

/// Builds a multi-page PDF from rendered page images.
///
/// Page order matches input order. Each page box is sized so that the image
/// lands on it at exactly the configured DPI.
pub struct PdfAssembler {
    /// Resolution the images were rendered at.
    dpi: u32,
    /// Title metadata embedded in the output document.
    title: Option<String>,
}

impl PdfAssembler {
    /// Create an assembler for images rendered at `dpi`.
    pub fn new(dpi: u32) -> Self {
        Self { dpi, title: None }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Compose `image_paths` into a PDF written to `output_path`.
    ///
    /// Missing or undecodable images are skipped with a warning. An empty
    /// input list, or a list with no surviving images, is an assembly error.
    #[instrument(skip_all, fields(images = image_paths.len(), output = %output_path.as_ref().display()))]
    pub fn assemble(
        &self,
        image_paths: &[PathBuf],
        output_path: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        if image_paths.is_empty() {
            return Err(RasterwerkError::AssemblyError(
                "no image paths provided".to_string(),
            ));
        }

        let output_path = output_path.as_ref();
        let title = self.title.as_deref().unwrap_or("Rasterwerk Document");

        info!(images = image_paths.len(), "Creating PDF from page images");

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::new();

        for (index, img_path) in image_paths.iter().enumerate() {
            if !img_path.exists() {
                warn!(path = %img_path.display(), "image file not found; skipping");
                continue;
            }

            let decoded = match image::open(img_path) {
                Ok(img) => img,
                Err(err) => {
                    warn!(path = %img_path.display(), %err, "failed to decode image; skipping");
                    continue;
                }
            };

            // PDF embedding wants a single RGB layer.
            let rgb = decoded.to_rgb8();
            let (px_w, px_h) = rgb.dimensions();

            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: px_w as usize,
                height: px_h as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let page_w = Mm(px_w as f32 / self.dpi as f32 * MM_PER_INCH);
            let page_h = Mm(px_h as f32 / self.dpi as f32 * MM_PER_INCH);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(self.dpi as f32),
                    rotate: None,
                },
            }];

            pages.push(PdfPage::new(page_w, page_h, ops));
            debug!(page = index + 1, px_w, px_h, "Page image placed");
        }

        if pages.is_empty() {
            return Err(RasterwerkError::AssemblyError(
                "no valid images found to create PDF".to_string(),
            ));
        }

        let page_count = pages.len();
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        std::fs::write(output_path, &bytes)?;

        info!(
            pages = page_count,
            output = %output_path.display(),
            "PDF assembly complete"
        );

        Ok(output_path.to_path_buf())
    }
}

// -- Tests --------------------------------------------------------------------
