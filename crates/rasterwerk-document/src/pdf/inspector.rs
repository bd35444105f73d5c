// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF inspector — document metadata and per-page geometry, read from the PDF
// structure with `lopdf`. No page is ever rendered on this path.

use std::path::Path;

use lopdf::{Document, Object, ObjectId};
use rasterwerk_core::error::{RasterwerkError, Result};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Document-level metadata and per-page geometry.
#[derive(Debug, Clone, Serialize)]
pub struct PdfInfo {
    pub page_count: usize,
    /// /Title from the info dictionary, or "Unknown".
    pub title: String,
    /// /Author from the info dictionary, or "Unknown".
    pub author: String,
    /// /Subject from the info dictionary, or "None".
    pub subject: String,
    /// One entry per page, in page order.
    pub pages: Vec<PageInfo>,
}

/// Geometry of a single page.
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    /// 1-based page number.
    pub page: u32,
    /// MediaBox width in points.
    pub width: f32,
    /// MediaBox height in points.
    pub height: f32,
    /// Clockwise /Rotate angle in degrees, normalized to [0, 360).
    pub rotation: i32,
}

/// Reads metadata from an existing PDF file.
///
/// The underlying document is dropped with the inspector, releasing its
/// resources on every exit path.
#[derive(Debug)]
pub struct PdfInspector {
    document: Document,
}

impl PdfInspector {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(RasterwerkError::InputNotFound(
                path_ref.display().to_string(),
            ));
        }

        let document = Document::load(path_ref).map_err(|err| {
            RasterwerkError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Build the full info record.
    ///
    /// Missing info-dictionary entries fall back to "Unknown" (title,
    /// author) and "None" (subject). Page attributes are resolved through
    /// the page tree, so inherited MediaBox and /Rotate values are honoured.
    pub fn info(&self) -> PdfInfo {
        let title = self
            .info_string(b"Title")
            .unwrap_or_else(|| "Unknown".to_string());
        let author = self
            .info_string(b"Author")
            .unwrap_or_else(|| "Unknown".to_string());
        let subject = self
            .info_string(b"Subject")
            .unwrap_or_else(|| "None".to_string());

        let page_map = self.document.get_pages();
        let mut pages = Vec::with_capacity(page_map.len());

        for (page_number, page_id) in &page_map {
            let (width, height) = self.page_dimensions(*page_id);
            pages.push(PageInfo {
                page: *page_number,
                width,
                height,
                rotation: self.page_rotation(*page_id),
            });
        }

        PdfInfo {
            page_count: pages.len(),
            title,
            author,
            subject,
            pages,
        }
    }

    // -- Helpers --------------------------------------------------------------

    /// Read a text entry from the document's /Info dictionary.
    fn info_string(&self, key: &[u8]) -> Option<String> {
        let info = match self.document.trailer.get(b"Info").ok()? {
            Object::Reference(id) => self.document.get_object(*id).ok()?.as_dict().ok()?,
            Object::Dictionary(dict) => dict,
            _ => return None,
        };

        match info.get(key).ok()? {
            Object::String(bytes, _) => Some(decode_text_string(bytes)),
            _ => None,
        }
    }

    /// MediaBox width and height in points.
    fn page_dimensions(&self, page_id: ObjectId) -> (f32, f32) {
        let media_box = match self.inherited_attr(page_id, b"MediaBox") {
            Some(Object::Array(values)) => values,
            _ => {
                warn!(?page_id, "page has no MediaBox");
                return (0.0, 0.0);
            }
        };

        let coords: Vec<f32> = media_box.iter().filter_map(object_to_f32).collect();
        if coords.len() != 4 {
            warn!(?page_id, entries = coords.len(), "malformed MediaBox");
            return (0.0, 0.0);
        }

        ((coords[2] - coords[0]).abs(), (coords[3] - coords[1]).abs())
    }

    /// /Rotate angle, normalized to [0, 360). Absent means 0.
    fn page_rotation(&self, page_id: ObjectId) -> i32 {
        self.inherited_attr(page_id, b"Rotate")
            .and_then(|obj| obj.as_i64().ok())
            .map(|degrees| (degrees as i32).rem_euclid(360))
            .unwrap_or(0)
    }

    /// Look up an inheritable page attribute, walking /Parent links.
    ///
    /// The walk is bounded so a cyclic /Parent chain cannot loop forever.
    fn inherited_attr(&self, page_id: ObjectId, key: &[u8]) -> Option<Object> {
        let mut current = page_id;

        for _ in 0..64 {
            let dict = self.document.get_object(current).ok()?.as_dict().ok()?;

            if let Ok(value) = dict.get(key) {
                return match value {
                    Object::Reference(id) => self.document.get_object(*id).ok().cloned(),
                    other => Some(other.clone()),
                };
            }

            current = match dict.get(b"Parent") {
                Ok(Object::Reference(id)) => *id,
                _ => return None,
            };
        }

        None
    }
}

/// Decode a PDF text string: UTF-16BE when BOM-prefixed, byte-per-character
/// otherwise.
fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&utf16)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

fn object_to_f32(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(v) => Some(*v as f32),
        Object::Real(v) => Some(*v as f32),
        _ => None,
    }
}

// -- Tests --------------------------------------------------------------------
