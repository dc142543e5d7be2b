// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Navigation engine: selection, history, zoom and the address fragment.

pub mod effects;
pub mod history;
pub mod location;
pub mod navigator;
pub mod zoom;

pub use effects::{
    Breadcrumb, CallRelations, CalleeLink, Effect, InfoPanel, LabelLink, Notice, RenderRequest,
    RenderTicket, Severity,
};
pub use history::{History, NavigationEntry};
pub use location::{
    decode_fragment, encode_fragment, fragment_link, FragmentChannel, FragmentTarget,
    LocationSync, MemoryFragment,
};
pub use navigator::{NavError, NavState, Navigator};
pub use zoom::{Zoom, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};

#[cfg(test)]
mod tests;
