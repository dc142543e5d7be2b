// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over the dataset.
//!
//! Queries are pure functions of the dataset and their input; they never touch navigation state.

pub mod links;
pub mod search;

pub use links::{LinkResolver, UnresolvedLink};
pub use search::{is_visible, visible_keys};
