// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::zoom::Zoom;
use crate::model::FunctionKey;

/// One visited function together with the view state it was left in.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationEntry {
    key: FunctionKey,
    scroll_offset: u32,
    zoom: Zoom,
}

impl NavigationEntry {
    pub fn new(key: FunctionKey, zoom: Zoom) -> Self {
        Self { key, scroll_offset: 0, zoom }
    }

    pub fn key(&self) -> &FunctionKey {
        &self.key
    }

    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }
}

/// Back stack, oldest first. Popped entries are discarded; there is no forward stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<NavigationEntry>,
}

impl History {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    pub fn top(&self) -> Option<&NavigationEntry> {
        self.entries.last()
    }

    pub(crate) fn push(&mut self, entry: NavigationEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn pop(&mut self) -> Option<NavigationEntry> {
        self.entries.pop()
    }

    /// Records view state into the top frame, but only when it belongs to `current`.
    pub(crate) fn save_view_state(
        &mut self,
        current: &FunctionKey,
        scroll_offset: u32,
        zoom: Zoom,
    ) {
        let Some(top) = self.entries.last_mut() else {
            return;
        };
        if &top.key != current {
            return;
        }
        top.scroll_offset = scroll_offset;
        top.zoom = zoom;
    }
}
