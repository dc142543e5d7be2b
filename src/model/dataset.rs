// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::ids::FunctionKey;
use super::record::FunctionRecord;

/// Read-only index over the function catalogue.
///
/// Iteration follows insertion order (the order of the source file), which is also the
/// tie-break order for link resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<FunctionRecord>,
    index: HashMap<FunctionKey, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey(pub FunctionKey);

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate function key: {}", self.0)
    }
}

impl std::error::Error for DuplicateKey {}

/// One package with its records, for the grouped function list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageGroup<'a> {
    pub package_name: &'a str,
    pub records: Vec<&'a FunctionRecord>,
}

impl Dataset {
    pub fn from_records(
        records: impl IntoIterator<Item = FunctionRecord>,
    ) -> Result<Self, DuplicateKey> {
        let mut dataset = Self::default();
        for record in records {
            if dataset.index.contains_key(record.key()) {
                return Err(DuplicateKey(record.key().clone()));
            }
            dataset.index.insert(record.key().clone(), dataset.records.len());
            dataset.records.push(record);
        }
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FunctionRecord> {
        self.index.get(key).map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// The stored key equal to `key`, so callers can keep a `FunctionKey` without revalidating.
    pub fn key(&self, key: &str) -> Option<&FunctionKey> {
        self.get(key).map(FunctionRecord::key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionRecord> + '_ {
        self.records.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FunctionKey> + '_ {
        self.records.iter().map(FunctionRecord::key)
    }

    /// Packages sorted by name; records inside a package sorted by key.
    pub fn packages(&self) -> Vec<PackageGroup<'_>> {
        let mut groups = BTreeMap::<&str, Vec<&FunctionRecord>>::new();
        for record in &self.records {
            groups.entry(record.package_name()).or_default().push(record);
        }

        groups
            .into_iter()
            .map(|(package_name, mut records)| {
                records.sort_by(|a, b| a.key().cmp(b.key()));
                PackageGroup { package_name, records }
            })
            .collect()
    }
}
