//
// Copyright 2020 GTO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! nom parsers for the fixed-size binary GTO header records (file, object,
//! component and property headers), per `crate::document`.

use nom::combinator::map;
use nom::sequence::tuple;
use nom::IResult;

use crate::de::parser::utils::{u32, u8, Endian};

/// Parsed file header (20 bytes): everything except the magic, which the
/// caller inspects separately to determine `Endian`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct FileHeader {
    pub num_strings: u32,
    pub num_objects: u32,
    pub version: u32,
    pub flags: u32,
}

/// Parses the file header fields following the 4-byte magic.
pub fn file_header(endian: Endian) -> impl Fn(&[u8]) -> IResult<&[u8], FileHeader> {
    move |input: &[u8]| {
        map(
            tuple((u32(endian), u32(endian), u32(endian), u32(endian))),
            |(num_strings, num_objects, version, flags)| FileHeader {
                num_strings,
                num_objects,
                version,
                flags,
            },
        )(input)
    }
}

/// Parsed object header (20 bytes).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ObjectHeader {
    pub name_id: u32,
    pub protocol_id: u32,
    pub protocol_version: u32,
    pub num_components: u32,
}

/// Parses a single object header, discarding the trailing pad word.
pub fn object_header(endian: Endian) -> impl Fn(&[u8]) -> IResult<&[u8], ObjectHeader> {
    move |input: &[u8]| {
        map(
            tuple((u32(endian), u32(endian), u32(endian), u32(endian), u32(endian))),
            |(name_id, protocol_id, protocol_version, num_components, _pad)| ObjectHeader {
                name_id,
                protocol_id,
                protocol_version,
                num_components,
            },
        )(input)
    }
}

/// Parsed component header (20 bytes).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ComponentHeader {
    pub name_id: u32,
    pub interpretation_id: u32,
    pub num_properties: u32,
    pub flags: u32,
    pub child_level: u32,
}

/// Parses a single component header.
pub fn component_header(endian: Endian) -> impl Fn(&[u8]) -> IResult<&[u8], ComponentHeader> {
    move |input: &[u8]| {
        map(
            tuple((u32(endian), u32(endian), u32(endian), u32(endian), u32(endian))),
            |(name_id, interpretation_id, num_properties, flags, child_level)| ComponentHeader {
                name_id,
                interpretation_id,
                num_properties,
                flags,
                child_level,
            },
        )(input)
    }
}

/// Parsed property header (36 bytes in v4).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PropertyHeader {
    pub name_id: u32,
    pub interpretation_id: u32,
    pub kind: u8,
    pub size: u32,
    pub width: u32,
    pub dims: [u32; 4],
}

/// Parses a single property header, skipping the 3 pad bytes after `kind`.
pub fn property_header(endian: Endian) -> impl Fn(&[u8]) -> IResult<&[u8], PropertyHeader> {
    move |input: &[u8]| {
        map(
            tuple((
                u32(endian),
                u32(endian),
                u8,
                nom::bytes::complete::take(3usize),
                u32(endian),
                u32(endian),
                u32(endian),
                u32(endian),
                u32(endian),
                u32(endian),
            )),
            |(name_id, interpretation_id, kind, _pad, size, width, d0, d1, d2, d3)| PropertyHeader {
                name_id,
                interpretation_id,
                kind,
                size,
                width,
                dims: [d0, d1, d2, d3],
            },
        )(input)
    }
}
