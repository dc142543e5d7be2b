// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shareable address fragment (`#service.CartService.GetCart`) bound to the current selection.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::model::FunctionKey;

/// Bytes left unescaped, matching what browsers leave alone in `encodeURIComponent`.
const FRAGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Where the fragment lives (browser location, clipboard link, in-memory cell).
///
/// Values are stored without the leading `#`.
pub trait FragmentChannel {
    fn read(&self) -> String;
    fn write(&mut self, fragment: &str);
}

/// In-process fragment cell. Counts the writes made through [`FragmentChannel::write`], i.e.
/// the entries the navigator would add to an external history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFragment {
    value: String,
    writes: u64,
}

impl MemoryFragment {
    pub fn new(initial: impl Into<String>) -> Self {
        Self { value: strip_hash(&initial.into()).to_owned(), writes: 0 }
    }

    /// Replaces the value as an outside party would; not counted as a navigator write.
    pub fn set_external(&mut self, raw: &str) {
        self.value = strip_hash(raw).to_owned();
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl FragmentChannel for MemoryFragment {
    fn read(&self) -> String {
        self.value.clone()
    }

    fn write(&mut self, fragment: &str) {
        self.value = fragment.to_owned();
        self.writes = self.writes.saturating_add(1);
    }
}

/// Decoded view of a fragment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentTarget {
    Empty,
    Key(String),
    /// Percent-escapes that do not decode to UTF-8.
    Malformed,
}

pub fn encode_fragment(key: &str) -> String {
    utf8_percent_encode(key, FRAGMENT_ENCODE_SET).to_string()
}

pub fn decode_fragment(raw: &str) -> FragmentTarget {
    let raw = strip_hash(raw);
    if raw.is_empty() {
        return FragmentTarget::Empty;
    }
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) if decoded.is_empty() => FragmentTarget::Empty,
        Ok(decoded) => FragmentTarget::Key(decoded.into_owned()),
        Err(_) => FragmentTarget::Malformed,
    }
}

/// `#<encoded key>`, the form handed out as a deep link.
pub fn fragment_link(key: &FunctionKey) -> String {
    format!("#{}", encode_fragment(key.as_str()))
}

fn strip_hash(raw: &str) -> &str {
    raw.strip_prefix('#').unwrap_or(raw)
}

/// Guarded two-way binding between the current key and a [`FragmentChannel`].
#[derive(Debug, Clone, Default)]
pub struct LocationSync<C> {
    channel: C,
}

impl<C: FragmentChannel> LocationSync<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn target(&self) -> FragmentTarget {
        decode_fragment(&self.channel.read())
    }

    /// Writes `key` unless the fragment already names it. Returns whether a write happened.
    pub fn publish(&mut self, key: &FunctionKey) -> bool {
        if matches!(self.target(), FragmentTarget::Key(current) if current == key.as_str()) {
            return false;
        }
        self.channel.write(&encode_fragment(key.as_str()));
        true
    }

    /// Empties the fragment unless it already is.
    pub fn clear(&mut self) -> bool {
        if self.channel.read().is_empty() {
            return false;
        }
        self.channel.write("");
        true
    }
}
