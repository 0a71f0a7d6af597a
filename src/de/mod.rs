//
// Copyright 2020 GTO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The binary GTO reader.
//!
//! Parses the five sections of a v4 binary document (file header, string
//! pool, object headers, component headers, property headers and their
//! payloads) into a [`crate::model::File`]. Endianness is detected from the
//! magic number and every multi-byte field downstream is parsed through the
//! endian-aware combinators in `parser::utils`.

pub mod parser;

use std::convert::TryFrom;

use parser::header::{component_header, file_header, object_header, property_header};
use parser::utils::Endian;

use crate::document::{self, DataType};
use crate::error::{Error, Location, Result};
use crate::model::{Component, File, Object, Property, Value};
use crate::string_table::StringTable;

/// Parses a complete binary GTO document from `input`.
pub fn read_binary(input: &[u8]) -> Result<File> {
    Reader::from_bytes(input).read()
}

/// Stateless wrapper over a binary input buffer.
///
/// A fresh `Reader` is cheap to construct; all state lives in `read()`'s
/// local variables, matching the single-shot, synchronous nature of the
/// codec (see the concurrency & resource model).
pub struct Reader<'a> {
    input: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn from_bytes(input: &'a [u8]) -> Self {
        Reader { input }
    }

    pub fn read(&self) -> Result<File> {
        let input = self.input;

        if input.len() < 4 {
            return Err(Error::Truncated {
                location: Location::Offset(0),
            });
        }

        let magic_bytes = [input[0], input[1], input[2], input[3]];
        let magic_as_le = u32::from_le_bytes(magic_bytes);
        let endian = if magic_as_le == document::MAGIC {
            Endian::Little
        } else if magic_as_le == document::MAGIC_SWAPPED {
            Endian::Big
        } else {
            return Err(Error::BadMagic);
        };

        if input.len() < document::HEADER_SIZE {
            return Err(Error::Truncated {
                location: Location::Offset(input.len()),
            });
        }

        let (_, header) = file_header(endian)(&input[4..document::HEADER_SIZE]).map_err(|_| Error::Truncated {
            location: Location::Offset(4),
        })?;

        if header.version != document::CURRENT_VERSION {
            return Err(Error::UnsupportedVersion { found: header.version });
        }

        let mut offset = document::HEADER_SIZE;

        // String pool.
        let string_pool_bytes = &input[offset..];
        let (string_table, consumed) = StringTable::deserialize(string_pool_bytes, header.num_strings)?;
        offset += consumed;

        // Object headers.
        let mut object_headers = Vec::with_capacity(header.num_objects as usize);
        for _ in 0..header.num_objects {
            let slice = self.slice_at(offset, document::OBJECT_HEADER_SIZE)?;
            let (_, oh) = object_header(endian)(slice).map_err(|_| self.truncated(offset))?;
            object_headers.push(oh);
            offset += document::OBJECT_HEADER_SIZE;
        }

        // Component headers, grouped per object in object-iteration order.
        let mut component_headers = Vec::new();
        for oh in &object_headers {
            for _ in 0..oh.num_components {
                let slice = self.slice_at(offset, document::COMPONENT_HEADER_SIZE)?;
                let (_, ch) = component_header(endian)(slice).map_err(|_| self.truncated(offset))?;
                component_headers.push(ch);
                offset += document::COMPONENT_HEADER_SIZE;
            }
        }

        // Property headers, grouped per component in component-iteration order.
        let mut property_headers = Vec::new();
        for ch in &component_headers {
            for _ in 0..ch.num_properties {
                let slice = self.slice_at(offset, document::PROPERTY_HEADER_SIZE)?;
                let (_, ph) = property_header(endian)(slice).map_err(|_| self.truncated(offset))?;
                property_headers.push(ph);
                offset += document::PROPERTY_HEADER_SIZE;
            }
        }

        // Payloads, one per property header, in the same order.
        let mut values = Vec::with_capacity(property_headers.len());
        for ph in &property_headers {
            let kind = DataType::try_from(ph.kind).map_err(|_| Error::UnknownKind { ordinal: ph.kind })?;
            let dims_product = ph
                .dims
                .iter()
                .try_fold(1u64, |acc, &d| acc.checked_mul(d.max(1) as u64))
                .ok_or_else(|| self.truncated(offset))?;
            let total = (ph.size as u64)
                .checked_mul(ph.width.max(1) as u64)
                .and_then(|v| v.checked_mul(dims_product))
                .ok_or_else(|| self.truncated(offset))?;
            let total = usize::try_from(total).map_err(|_| self.truncated(offset))?;
            let byte_len = total.checked_mul(kind.element_bytes()).ok_or_else(|| self.truncated(offset))?;
            let slice = self.slice_at(offset, byte_len)?;
            let (_, value) = parser::payload::payload(slice, kind, endian, total, &string_table, offset)?;
            values.push(value);
            offset += byte_len;
        }

        self.assemble(header.flags, &string_table, &object_headers, &component_headers, &property_headers, values)
    }

    fn slice_at(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let end = offset.checked_add(len).ok_or_else(|| self.truncated(offset))?;
        if end > self.input.len() {
            return Err(self.truncated(offset));
        }
        Ok(&self.input[offset..end])
    }

    fn truncated(&self, offset: usize) -> Error {
        Error::Truncated {
            location: Location::Offset(offset),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        &self,
        flags: u32,
        table: &StringTable,
        object_headers: &[parser::header::ObjectHeader],
        component_headers: &[parser::header::ComponentHeader],
        property_headers: &[parser::header::PropertyHeader],
        values: Vec<Value>,
    ) -> Result<File> {
        let mut flat_properties = property_headers
            .iter()
            .zip(values.into_iter())
            .map(|(ph, value)| {
                Ok(Property {
                    name: table.resolve(ph.name_id)?.to_string(),
                    interpretation: table.resolve(ph.interpretation_id)?.to_string(),
                    width: ph.width,
                    size: ph.size,
                    dims: ph.dims,
                    value,
                })
            })
            .collect::<Result<std::collections::VecDeque<_>>>()?;

        let mut flat_components = component_headers
            .iter()
            .map(|ch| {
                let properties = flat_properties.drain(..ch.num_properties as usize).collect();
                Ok((ch, properties))
            })
            .collect::<Result<std::collections::VecDeque<(_, Vec<Property>)>>>()?;

        let mut objects = Vec::with_capacity(object_headers.len());
        for oh in object_headers {
            let mut components = Vec::with_capacity(oh.num_components as usize);
            for (ch, properties) in flat_components.drain(..oh.num_components as usize) {
                components.push(Component {
                    name: table.resolve(ch.name_id)?.to_string(),
                    interpretation: table.resolve(ch.interpretation_id)?.to_string(),
                    child_level: ch.child_level,
                    properties,
                });
            }
            objects.push(Object {
                name: table.resolve(oh.name_id)?.to_string(),
                protocol: table.resolve(oh.protocol_id)?.to_string(),
                protocol_version: oh.protocol_version,
                components,
            });
        }

        Ok(File {
            version: document::CURRENT_VERSION,
            flags,
            objects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_round_trips_from_literal_bytes() {
        let bytes: [u8; 20] = [
            0x9F, 0x02, 0x00, 0x00, // magic
            0x00, 0x00, 0x00, 0x00, // num_strings
            0x00, 0x00, 0x00, 0x00, // num_objects
            0x04, 0x00, 0x00, 0x00, // version
            0x00, 0x00, 0x00, 0x00, // flags
        ];
        let file = read_binary(&bytes).unwrap();
        assert_eq!(file.version, 4);
        assert!(file.objects.is_empty());
    }

    #[test]
    fn test_bad_magic() {
        let bytes = [0u8; 20];
        assert_eq!(read_binary(&bytes), Err(Error::BadMagic));
    }

    #[test]
    fn test_truncated_header() {
        let bytes = [0x9F, 0x02, 0x00, 0x00];
        assert!(matches!(read_binary(&bytes), Err(Error::Truncated { .. })));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes: [u8; 20] = [
            0x9F, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00,
        ];
        bytes[12] = 5;
        assert_eq!(read_binary(&bytes), Err(Error::UnsupportedVersion { found: 5 }));
    }
}
