// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Loading function catalogues from disk.
//!
//! The catalogue builder emits either a plain JSON object or a JavaScript bundle
//! (`const functionsData = {...};`); both are accepted.

pub mod dataset_file;

pub use dataset_file::{parse_dataset, DatasetFile, StoreError};
