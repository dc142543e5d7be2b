// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::model::{Dataset, DuplicateKey, FunctionKey, FunctionRecord, IdError};

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    Bundle { path: PathBuf },
    InvalidKey { path: PathBuf, value: String, source: IdError },
    DuplicateKey { path: PathBuf, key: FunctionKey },
    Empty { path: PathBuf },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::Bundle { path } => write!(
                f,
                "cannot find a JSON object in script bundle {path:?} (expected `const <name> = {{...}};`)"
            ),
            Self::InvalidKey { path, value, source } => {
                write!(f, "invalid function key {value:?} in {path:?}: {source}")
            }
            Self::DuplicateKey { path, key } => {
                write!(f, "duplicate function key {key} in {path:?}")
            }
            Self::Empty { path } => write!(f, "dataset {path:?} contains no functions"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidKey { source, .. } => Some(source),
            Self::Bundle { .. } | Self::DuplicateKey { .. } | Self::Empty { .. } => None,
        }
    }
}

/// A catalogue file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFile {
    path: PathBuf,
}

impl DatasetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Dataset, StoreError> {
        let source = fs::read_to_string(&self.path)
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        let dataset = parse_dataset(&source, &self.path)?;
        tracing::info!(path = %self.path.display(), functions = dataset.len(), "loaded dataset");
        Ok(dataset)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    package_name: String,
    file_name: String,
    function_name: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    receiver_type: Option<String>,
    #[serde(default)]
    mermaid_code: Option<String>,
    #[serde(default)]
    called_functions: Option<Vec<String>>,
    #[serde(default)]
    comments: Option<String>,
}

/// Object entries in document order.
struct OrderedEntries(Vec<(String, RawRecord)>);

impl<'de> Deserialize<'de> for OrderedEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OrderedEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping function keys to function records")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, record)) = map.next_entry::<String, RawRecord>()? {
                    entries.push((key, record));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Parses a catalogue from either raw JSON or a `const x = {...};` script bundle.
///
/// `path` is only used for error reporting.
pub fn parse_dataset(source: &str, path: &Path) -> Result<Dataset, StoreError> {
    let json = json_payload(source).ok_or_else(|| StoreError::Bundle { path: path.to_owned() })?;
    let OrderedEntries(entries) = serde_json::from_str(json)
        .map_err(|source| StoreError::Json { path: path.to_owned(), source })?;

    if entries.is_empty() {
        return Err(StoreError::Empty { path: path.to_owned() });
    }

    let mut records = Vec::with_capacity(entries.len());
    for (raw_key, raw) in entries {
        let key = FunctionKey::new(raw_key.clone()).map_err(|source| StoreError::InvalidKey {
            path: path.to_owned(),
            value: raw_key,
            source,
        })?;
        if let Some(full_name) = raw.full_name.as_deref() {
            if full_name != key.as_str() {
                tracing::debug!(%key, full_name, "fullName differs from map key; using the key");
            }
        }

        records.push(
            FunctionRecord::new(key, raw.function_name, raw.package_name, raw.file_name)
                .with_receiver_type(raw.receiver_type)
                .with_doc_comment(raw.comments)
                .with_called_functions(raw.called_functions.unwrap_or_default())
                .with_diagram_description(raw.mermaid_code.unwrap_or_default()),
        );
    }

    Dataset::from_records(records)
        .map_err(|DuplicateKey(key)| StoreError::DuplicateKey { path: path.to_owned(), key })
}

fn json_payload(source: &str) -> Option<&str> {
    let trimmed = source.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('{') {
        return Some(trimmed);
    }

    let (_, rhs) = trimmed.split_once('=')?;
    let payload = rhs.trim().trim_end_matches(';').trim_end();
    payload.starts_with('{').then_some(payload)
}
