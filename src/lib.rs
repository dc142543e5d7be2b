// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Callnav: a terminal navigator for function call-flow catalogues.
//!
//! A catalogue maps function keys to Mermaid flowcharts. [`nav::Navigator`] owns the
//! selection, history and `#fragment` state; [`tui`] draws it.

pub mod config;
pub mod logging;
pub mod model;
pub mod nav;
pub mod query;
pub mod render;
pub mod store;
pub mod tui;
