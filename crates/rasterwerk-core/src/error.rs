// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Rasterwerk.

use thiserror::Error;

/// Top-level error type for all Rasterwerk operations.
#[derive(Debug, Error)]
pub enum RasterwerkError {
    // -- Configuration errors --
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid raster settings: {0}")]
    InvalidSettings(String),

    // -- Document errors --
    #[error("input file not found: {0}")]
    InputNotFound(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("render engine unavailable: {0}")]
    RenderEngine(String),

    #[error("PDF assembly failed: {0}")]
    AssemblyError(String),

    // -- I/O / serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RasterwerkError>;
