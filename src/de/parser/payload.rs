//
// Copyright 2020 GTO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Parses a property's raw payload bytes into a [`Value`], dispatching on
//! the property's primitive kind. The string table is already fully
//! populated by the time payloads are reached (it precedes every header
//! section in the binary layout), so `string`-kind payloads resolve to
//! owned `String`s directly rather than requiring a second pass of ids.

use crate::de::parser::utils::{f32, f64, i32, i64, u16, u32, u8, Endian};
use crate::document::DataType;
use crate::error::{Error, Location, Result};
use crate::model::Value;
use crate::string_table::StringTable;

/// Parses `total` elements of `kind` out of `input`, returning the unconsumed
/// remainder and the decoded value. `offset` is the absolute byte offset of
/// `input`'s start, for `Truncated` diagnostics.
pub fn payload<'a>(
    input: &'a [u8],
    kind: DataType,
    endian: Endian,
    total: usize,
    table: &StringTable,
    offset: usize,
) -> Result<(&'a [u8], Value)> {
    macro_rules! collect {
        ($parser:expr, $variant:ident) => {{
            let mut rest = input;
            let mut values = Vec::with_capacity(total);
            for _ in 0..total {
                let consumed = input.len() - rest.len();
                let (next, value) = $parser(rest).map_err(|_| Error::Truncated {
                    location: Location::Offset(offset + consumed),
                })?;
                values.push(value);
                rest = next;
            }
            (rest, Value::$variant(values))
        }};
    }

    Ok(match kind {
        DataType::Int => collect!(i32(endian), Int),
        DataType::Float => collect!(f32(endian), Float),
        DataType::Double => collect!(f64(endian), Double),
        DataType::Half => collect!(u16(endian), Half),
        DataType::Bool => collect!(|i: &'a [u8]| u8(i).map(|(r, v)| (r, v != 0)), Bool),
        DataType::Short => collect!(u16(endian), Short),
        DataType::Byte => collect!(u8, Byte),
        DataType::Int64 => collect!(i64(endian), Int64),
        DataType::String => {
            let mut rest = input;
            let mut strings = Vec::with_capacity(total);
            for _ in 0..total {
                let consumed = input.len() - rest.len();
                let (next, id) = u32(endian)(rest).map_err(|_| Error::Truncated {
                    location: Location::Offset(offset + consumed),
                })?;
                strings.push(table.resolve(id)?.to_string());
                rest = next;
            }
            (rest, Value::String(strings))
        }
    })
}
