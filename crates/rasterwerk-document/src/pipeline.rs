// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flatten pipeline — rasterize a PDF to page images, rebuild them into a new
// image-only PDF, and optionally clean up the intermediates.

use std::path::{Path, PathBuf};

use rasterwerk_core::error::Result;
use rasterwerk_core::settings::RasterSettings;
use tracing::{debug, info, instrument, warn};

use crate::pdf::assembler::PdfAssembler;
use crate::pdf::renderer::{OutputOptions, PageRenderer, RasterRun};

/// Result of a flatten run.
///
/// `images` lists every page image the run produced, in page order — the
/// files may already be gone from disk when the run cleaned up after itself.
#[derive(Debug, Clone)]
pub struct FlattenOutcome {
    /// The rebuilt, image-only PDF.
    pub pdf: PathBuf,
    /// Page images produced along the way.
    pub images: Vec<PathBuf>,
    /// Per-page report from the rasterization step.
    pub run: RasterRun,
}

/// Composes the page rasterizer and the PDF assembler.
pub struct Flattener {
    renderer: PageRenderer,
}

impl Flattener {
    /// Create a flattener with the given settings.
    pub fn new(settings: RasterSettings) -> Result<Self> {
        Ok(Self {
            renderer: PageRenderer::new(settings)?,
        })
    }

    /// Rasterize `input` and rebuild the pages as `{prefix}_rasterized.pdf`
    /// in the output directory.
    ///
    /// With `keep_images` false, every page image is deleted after the PDF is
    /// written; deletion failures are warnings and never fail the run.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), keep_images))]
    pub fn flatten(
        &self,
        input: impl AsRef<Path>,
        options: &OutputOptions,
        keep_images: bool,
    ) -> Result<FlattenOutcome> {
        let input = input.as_ref();

        let run = self.renderer.rasterize(input, options)?;
        let images = run.output_files();

        let (output_dir, prefix) = options.resolve(input)?;
        let pdf_path = output_dir.join(format!("{}_rasterized.pdf", prefix));

        let mut assembler = PdfAssembler::new(self.renderer.settings().dpi);
        assembler.set_title(prefix.clone());
        let pdf = assembler.assemble(&images, &pdf_path)?;

        if !keep_images {
            info!("Cleaning up page images");
            let removed = remove_images(&images);
            debug!(removed, total = images.len(), "Cleanup finished");
        }

        Ok(FlattenOutcome { pdf, images, run })
    }
}

/// Best-effort deletion of intermediate images. Returns the number removed;
/// failures are logged and skipped.
fn remove_images(paths: &[PathBuf]) -> usize {
    let mut removed = 0;
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "Deleted");
                removed += 1;
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to delete page image");
            }
        }
    }
    removed
}

// -- Tests --------------------------------------------------------------------
