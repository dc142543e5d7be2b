// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A dataset is an immutable, insertion-ordered catalogue of function records keyed by
//! canonical function keys.

pub mod dataset;
pub mod fixtures;
pub mod ids;
pub mod record;

pub use dataset::{Dataset, DuplicateKey, PackageGroup};
pub use ids::{FunctionKey, IdError};
pub use record::FunctionRecord;
