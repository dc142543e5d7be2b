// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

pub const ZOOM_STEP: f64 = 1.2;
pub const ZOOM_MIN: f64 = 0.3;
pub const ZOOM_MAX: f64 = 3.0;

/// Diagram scale factor, always within `[ZOOM_MIN, ZOOM_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Zoom(f64);

impl Default for Zoom {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Zoom {
    /// Clamps into range; non-finite or non-positive inputs fall back to 1.0.
    pub fn new(factor: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return Self::default();
        }
        Self(factor.clamp(ZOOM_MIN, ZOOM_MAX))
    }

    pub fn factor(self) -> f64 {
        self.0
    }

    pub fn zoomed_in(self) -> Self {
        Self((self.0 * ZOOM_STEP).min(ZOOM_MAX))
    }

    pub fn zoomed_out(self) -> Self {
        Self((self.0 / ZOOM_STEP).max(ZOOM_MIN))
    }

    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl fmt::Display for Zoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}
