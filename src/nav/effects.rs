// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Outputs the navigator hands to its host after each transition.

use std::fmt;

use super::zoom::Zoom;
use crate::model::{FunctionKey, FunctionRecord};

/// Identifies one render request. Only the most recently issued ticket is honoured.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderTicket {
    key: FunctionKey,
    seq: u64,
}

impl RenderTicket {
    pub(crate) fn new(key: FunctionKey, seq: u64) -> Self {
        Self { key, seq }
    }

    pub fn key(&self) -> &FunctionKey {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub ticket: RenderTicket,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPanel {
    pub title: String,
    pub description: Option<String>,
    pub package_name: String,
    pub file_name: String,
}

impl InfoPanel {
    pub fn for_record(record: &FunctionRecord) -> Self {
        Self {
            title: record.display_name(),
            description: record.doc_comment().map(str::to_owned),
            package_name: record.package_name().to_owned(),
            file_name: record.file_name().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Breadcrumb {
    Welcome,
    Function { package_name: String, display_name: String },
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welcome => f.write_str("Home"),
            Self::Function { package_name, display_name } => {
                write!(f, "Home › {package_name} › {display_name}")
            }
        }
    }
}

/// One entry of a record's call list with its forward resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalleeLink {
    pub expression: String,
    pub resolved: Option<FunctionKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRelations {
    pub callees: Vec<CalleeLink>,
    pub callers: Vec<FunctionKey>,
}

/// A rendered label that navigates to `target` when activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelLink {
    pub label: String,
    pub target: FunctionKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self { message: message.into(), severity }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RenderRequested(RenderRequest),
    /// Re-layout of the current diagram at a new zoom; no new render.
    Rescale(Zoom),
    InfoPanel(InfoPanel),
    Breadcrumb(Breadcrumb),
    /// Highlight for the function list; `None` clears it.
    ActiveItem(Option<FunctionKey>),
    CallRelations(CallRelations),
    LinksWired(Vec<LabelLink>),
    RestoreScroll(u32),
    RenderFailed { key: FunctionKey, message: String },
    Notice(Notice),
    ShowWelcome,
}
