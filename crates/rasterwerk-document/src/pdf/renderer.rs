// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterizer — renders each page of a PDF to a raster image file at a
// configurable resolution using the PDFium engine.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use pdfium_render::prelude::*;
use rasterwerk_core::error::{RasterwerkError, Result};
use rasterwerk_core::settings::RasterSettings;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::image::encode::save_image;
use crate::image::enhance::enhance_page;

/// Where output files go and what they are called.
///
/// Both fields are optional: the directory defaults to the input file's
/// directory, the prefix to the input filename's stem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputOptions {
    /// Output directory, created recursively if absent.
    pub output_dir: Option<PathBuf>,
    /// Prefix for output filenames.
    pub prefix: Option<String>,
}

impl OutputOptions {
    /// Resolve the effective output directory and filename prefix for `input`.
    ///
    /// Creates the output directory if it does not exist yet; creation is
    /// idempotent.
    pub fn resolve(&self, input: &Path) -> Result<(PathBuf, String)> {
        let dir = match &self.output_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                dir.clone()
            }
            None => input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        let prefix = match &self.prefix {
            Some(prefix) => prefix.clone(),
            None => input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "page".to_string()),
        };

        Ok((dir, prefix))
    }
}

/// What happened to a single page during a rasterization run.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// The page was rendered and written to `path`.
    Rendered { page: u32, path: PathBuf },
    /// Rendering or saving failed; the page was skipped.
    Failed { page: u32, reason: String },
}

/// Per-page report of a rasterization run, in page order.
///
/// A run with zero rendered pages is a valid result, not an error.
#[derive(Debug, Clone, Default)]
pub struct RasterRun {
    pub pages: Vec<PageOutcome>,
}

impl RasterRun {
    /// Paths of the successfully written images, page 1 first.
    pub fn output_files(&self) -> Vec<PathBuf> {
        self.pages
            .iter()
            .filter_map(|outcome| match outcome {
                PageOutcome::Rendered { path, .. } => Some(path.clone()),
                PageOutcome::Failed { .. } => None,
            })
            .collect()
    }

    /// Number of pages that produced an output file.
    pub fn rendered_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|outcome| matches!(outcome, PageOutcome::Rendered { .. }))
            .count()
    }

    /// 1-based numbers of the pages that were skipped.
    pub fn failed_pages(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter_map(|outcome| match outcome {
                PageOutcome::Failed { page, .. } => Some(*page),
                PageOutcome::Rendered { .. } => None,
            })
            .collect()
    }
}

/// Renders PDF pages to image files.
///
/// Binds the PDFium library once at construction and reuses it for every
/// document. Each rasterization run owns its document handle exclusively;
/// the handle is released when the run returns, on success or error.
pub struct PageRenderer {
    pdfium: Pdfium,
    settings: RasterSettings,
}

impl PageRenderer {
    /// Create a renderer with the given settings.
    ///
    /// Looks for the PDFium library next to the executable first, then falls
    /// back to the system library path.
    pub fn new(settings: RasterSettings) -> Result<Self> {
        let bindings =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library())
                .map_err(|err| {
                    RasterwerkError::RenderEngine(format!(
                        "failed to bind PDFium library: {:?}",
                        err
                    ))
                })?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
            settings,
        })
    }

    /// The settings this renderer was built with.
    pub fn settings(&self) -> &RasterSettings {
        &self.settings
    }

    /// Rasterize every page of `input` into one image file per page.
    ///
    /// The open failure is fatal; failures on individual pages are recorded
    /// in the returned [`RasterRun`] and the run continues with the next
    /// page.
    #[instrument(skip_all, fields(input = %input.as_ref().display()))]
    pub fn rasterize(
        &self,
        input: impl AsRef<Path>,
        options: &OutputOptions,
    ) -> Result<RasterRun> {
        let input = input.as_ref();

        if !input.exists() {
            return Err(RasterwerkError::InputNotFound(input.display().to_string()));
        }

        let (output_dir, prefix) = options.resolve(input)?;

        info!(
            dpi = self.settings.dpi,
            format = %self.settings.format,
            output_dir = %output_dir.display(),
            "Starting rasterization"
        );

        let document = self
            .pdfium
            .load_pdf_from_file(input, None)
            .map_err(|err| {
                RasterwerkError::PdfError(format!("failed to open {}: {}", input.display(), err))
            })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        let number_width = page_number_width(total_pages);

        info!(total_pages, "Processing pages");

        let mut run = RasterRun::default();

        for (index, page) in pages.iter().enumerate() {
            let page_number = index as u32 + 1;
            match self.process_page(&page, page_number, number_width, &output_dir, &prefix) {
                Ok(path) => {
                    info!(
                        page = page_number,
                        total = total_pages,
                        file = %path.display(),
                        "Processed page"
                    );
                    run.pages.push(PageOutcome::Rendered {
                        page: page_number,
                        path,
                    });
                }
                Err(err) => {
                    error!(page = page_number, %err, "Failed to process page; skipping");
                    run.pages.push(PageOutcome::Failed {
                        page: page_number,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            generated = run.rendered_count(),
            skipped = run.failed_pages().len(),
            "Rasterization complete"
        );

        Ok(run)
    }

    /// Render one page, enhance it if requested, and write it to disk.
    fn process_page(
        &self,
        page: &PdfPage,
        page_number: u32,
        number_width: usize,
        output_dir: &Path,
        prefix: &str,
    ) -> Result<PathBuf> {
        let mut image = self.render_page(page)?;

        if self.settings.enhance {
            image = enhance_page(image);
        }

        let filename = format!(
            "{}_page_{:0width$}.{}",
            prefix,
            page_number,
            self.settings.format.extension(),
            width = number_width
        );
        let output_path = output_dir.join(filename);

        save_image(&image, &output_path, self.settings.format)?;
        Ok(output_path)
    }

    /// Render a page into an RGB image at the configured zoom factor.
    fn render_page(&self, page: &PdfPage) -> Result<DynamicImage> {
        let zoom = self.settings.zoom_factor();
        let pixel_width = (page.width().value * zoom).round() as i32;
        let pixel_height = (page.height().value * zoom).round() as i32;

        let config = PdfRenderConfig::new()
            .set_target_width(pixel_width)
            .set_target_height(pixel_height);

        let bitmap = page.render_with_config(&config).map_err(|err| {
            RasterwerkError::PdfError(format!("page render failed: {}", err))
        })?;

        // Drop the alpha channel; output pages are plain RGB.
        let rgb = bitmap.as_image().into_rgb8();
        debug!(
            width = rgb.width(),
            height = rgb.height(),
            "Page rendered"
        );

        Ok(DynamicImage::ImageRgb8(rgb))
    }
}

/// Zero-padding width for page numbers: the digit count of the total.
pub(crate) fn page_number_width(total_pages: usize) -> usize {
    total_pages.to_string().len()
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Padding width equals the number of digits in the page count.
    #[test]
    fn page_number_width_matches_digit_count() {
        assert_eq!(page_number_width(1), 1);
        assert_eq!(page_number_width(9), 1);
        assert_eq!(page_number_width(10), 2);
        assert_eq!(page_number_width(99), 2);
        assert_eq!(page_number_width(100), 3);
        assert_eq!(page_number_width(999), 3);
    }

    /// Filenames zero-pad the page number to the run's width.
    #[test]
    fn filename_padding_follows_total() {
        let width = page_number_width(120);
        let name = format!("{}_page_{:0w$}.{}", "doc", 7, "png", w = width);
        assert_eq!(name, "doc_page_007.png");
    }

    /// The output directory defaults to the input's parent, the prefix to the
    /// input stem.
    #[test]
    fn output_options_defaults_from_input() {
        let options = OutputOptions::default();
        let (dir, prefix) = options
            .resolve(Path::new("/data/reports/annual.pdf"))
            .unwrap();
        assert_eq!(dir, PathBuf::from("/data/reports"));
        assert_eq!(prefix, "annual");
    }

    /// An explicit output directory is created recursively.
    #[test]
    fn output_options_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");

        let options = OutputOptions {
            output_dir: Some(nested.clone()),
            prefix: Some("doc".to_string()),
        };
        let (dir, prefix) = options.resolve(Path::new("input.pdf")).unwrap();

        assert!(nested.is_dir());
        assert_eq!(dir, nested);
        assert_eq!(prefix, "doc");

        // Resolving again must not fail: creation is idempotent.
        options.resolve(Path::new("input.pdf")).unwrap();
    }

    /// A bare filename input resolves to the current directory.
    #[test]
    fn output_options_bare_filename() {
        let options = OutputOptions::default();
        let (dir, prefix) = options.resolve(Path::new("scan.pdf")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(prefix, "scan");
    }

    /// The run report separates rendered pages from skipped ones.
    #[test]
    fn raster_run_report_accessors() {
        let run = RasterRun {
            pages: vec![
                PageOutcome::Rendered {
                    page: 1,
                    path: PathBuf::from("doc_page_1.png"),
                },
                PageOutcome::Failed {
                    page: 2,
                    reason: "render failed".to_string(),
                },
                PageOutcome::Rendered {
                    page: 3,
                    path: PathBuf::from("doc_page_3.png"),
                },
            ],
        };

        assert_eq!(run.rendered_count(), 2);
        assert_eq!(run.failed_pages(), vec![2]);
        assert_eq!(
            run.output_files(),
            vec![
                PathBuf::from("doc_page_1.png"),
                PathBuf::from("doc_page_3.png")
            ]
        );
    }
}
