// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Dataset, FunctionKey, FunctionRecord};

/// Case-insensitive substring match against the display name or the doc comment.
///
/// An empty query matches everything.
pub fn is_visible(record: &FunctionRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    record.display_name().to_lowercase().contains(&needle)
        || record.doc_comment().is_some_and(|comment| comment.to_lowercase().contains(&needle))
}

/// Keys of the visible records, in dataset order.
pub fn visible_keys<'a>(dataset: &'a Dataset, query: &str) -> Vec<&'a FunctionKey> {
    dataset
        .iter()
        .filter(|record| is_visible(record, query))
        .map(FunctionRecord::key)
        .collect()
}
