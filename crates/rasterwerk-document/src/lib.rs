// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rasterwerk-document — Document processing for the Rasterwerk rasterizer.
//
// Provides page rasterization (PDF pages to PNG/JPEG/TIFF/BMP via PDFium),
// metadata inspection (document info and per-page geometry, read without
// rendering), image enhancement, and reassembly of page images into a
// flattened multi-page PDF.

pub mod image;
pub mod pdf;
pub mod pipeline;

// Re-export the primary structs so callers can use `rasterwerk_document::PageRenderer` etc.
pub use image::enhance::enhance_page;
pub use pdf::assembler::PdfAssembler;
pub use pdf::inspector::{PageInfo, PdfInfo, PdfInspector};
pub use pdf::renderer::{OutputOptions, PageOutcome, PageRenderer, RasterRun};
pub use pipeline::{FlattenOutcome, Flattener};
