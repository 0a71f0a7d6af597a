//
// Copyright 2020 GTO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The GTO string table.
//!
//! Every name, protocol and interpretation string in a GTO document is
//! interned once into a single append-only pool and referenced everywhere
//! else by a 32-bit id. The table never deduplicates on its own except
//! through [`StringTable::intern`]; [`StringTable::add`] always appends.

use std::collections::HashMap;

use crate::error::{Error, Location, Result};

/// An append-only, order-preserving table of interned UTF-8 strings.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct StringTable {
    strings: Vec<String>,
    index: HashMap<String, u32>,
}

impl StringTable {
    /// Creates an empty string table.
    pub fn new() -> Self {
        StringTable {
            strings: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of strings currently interned.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// True if no strings have been interned yet.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Unconditionally appends `s`, returning its newly assigned id.
    ///
    /// Unlike [`StringTable::intern`], this never returns an existing id,
    /// even if `s` is already present.
    pub fn add<S: Into<String>>(&mut self, s: S) -> u32 {
        let s = s.into();
        let id = self.strings.len() as u32;
        // Only remember the first occurrence in the lookup index so that
        // a later `intern` of the same text returns the earliest id.
        self.index.entry(s.clone()).or_insert(id);
        self.strings.push(s);
        id
    }

    /// Returns the id of `s`, interning it if it is not already present.
    pub fn intern<S: AsRef<str> + Into<String>>(&mut self, s: S) -> u32 {
        if let Some(&id) = self.index.get(s.as_ref()) {
            id
        } else {
            self.add(s.into())
        }
    }

    /// Returns the id `s` was interned under, if it has been interned.
    pub fn id_of(&self, s: &str) -> Option<u32> {
        self.index.get(s).copied()
    }

    /// Resolves `id` to its string, failing if it is out of range.
    pub fn resolve(&self, id: u32) -> Result<&str> {
        self.strings
            .get(id as usize)
            .map(|s| s.as_str())
            .ok_or(Error::StringIdOutOfRange {
                id,
                size: self.strings.len() as u32,
            })
    }

    /// Iterates the strings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(|s| s.as_str())
    }

    /// Concatenates the UTF-8 encoding of each interned string, each followed
    /// by a single `0x00` terminator, in insertion order.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.strings.iter().map(|s| s.len() + 1).sum());
        for s in &self.strings {
            out.extend_from_slice(s.as_bytes());
            out.push(0x00);
        }
        out
    }

    /// Reads exactly `count` null-terminated UTF-8 strings from `input` in
    /// order, returning the populated table and the number of bytes consumed.
    pub fn deserialize(input: &[u8], count: u32) -> Result<(StringTable, usize)> {
        let mut table = StringTable::new();
        let mut offset = 0usize;
        for _ in 0..count {
            let start = offset;
            let terminator = input[offset..]
                .iter()
                .position(|&b| b == 0x00)
                .ok_or(Error::Truncated {
                    location: Location::Offset(start),
                })?;
            let slice = &input[start..start + terminator];
            let s = std::str::from_utf8(slice).map_err(|_| Error::Truncated {
                location: Location::Offset(start),
            })?;
            table.add(s);
            offset = start + terminator + 1;
        }
        Ok((table, offset))
    }
}
