// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — page enhancement and format-specific encoding.

pub mod encode;
pub mod enhance;

pub use enhance::enhance_page;
