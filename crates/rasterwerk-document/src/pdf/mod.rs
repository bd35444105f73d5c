// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — rendering pages to raster images, reading document metadata,
// and assembling page images into a new PDF.

pub mod assembler;
pub mod inspector;
pub mod renderer;

pub use assembler::PdfAssembler;
pub use inspector::PdfInspector;
pub use renderer::PageRenderer;
