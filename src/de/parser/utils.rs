//
// Copyright 2020 GTO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Endian-aware primitive parsers shared by the header and payload parsers.
//!
//! The binary GTO format detects its endianness from the magic number (see
//! `crate::document::MAGIC` / `MAGIC_SWAPPED`) rather than trusting the host
//! platform, so every multi-byte field is parsed through one of these
//! runtime-dispatched combinators instead of a fixed-endian one.

use nom::number::complete as num;
use nom::IResult;

/// Byte order detected from a document's magic number.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Endian {
    Little,
    Big,
}

/// Returns a parser recognizing an unsigned 32-bit integer in `endian` order.
pub fn u32(endian: Endian) -> impl Fn(&[u8]) -> IResult<&[u8], u32> {
    move |input: &[u8]| match endian {
        Endian::Little => num::le_u32(input),
        Endian::Big => num::be_u32(input),
    }
}

/// Returns a parser recognizing a signed 32-bit integer in `endian` order.
pub fn i32(endian: Endian) -> impl Fn(&[u8]) -> IResult<&[u8], i32> {
    move |input: &[u8]| match endian {
        Endian::Little => num::le_i32(input),
        Endian::Big => num::be_i32(input),
    }
}

/// Returns a parser recognizing a signed 64-bit integer in `endian` order.
pub fn i64(endian: Endian) -> impl Fn(&[u8]) -> IResult<&[u8], i64> {
    move |input: &[u8]| match endian {
        Endian::Little => num::le_i64(input),
        Endian::Big => num::be_i64(input),
    }
}

/// Returns a parser recognizing an unsigned 16-bit integer in `endian` order.
pub fn u16(endian: Endian) -> impl Fn(&[u8]) -> IResult<&[u8], u16> {
    move |input: &[u8]| match endian {
        Endian::Little => num::le_u16(input),
        Endian::Big => num::be_u16(input),
    }
}

/// Returns a parser recognizing an IEEE-754 binary32 value in `endian` order.
pub fn f32(endian: Endian) -> impl Fn(&[u8]) -> IResult<&[u8], f32> {
    move |input: &[u8]| match endian {
        Endian::Little => num::le_f32(input),
        Endian::Big => num::be_f32(input),
    }
}

/// Returns a parser recognizing an IEEE-754 binary64 value in `endian` order.
pub fn f64(endian: Endian) -> impl Fn(&[u8]) -> IResult<&[u8], f64> {
    move |input: &[u8]| match endian {
        Endian::Little => num::le_f64(input),
        Endian::Big => num::be_f64(input),
    }
}

/// Parses a single unsigned byte, independent of endianness.
pub fn u8(input: &[u8]) -> IResult<&[u8], u8> {
    num::le_u8(input)
}
