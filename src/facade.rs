//
// Copyright 2020 GTO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # High-level reader/writer façade.
//!
//! Mirrors the ergonomics most GTO tooling expects: `open` reports success as
//! a `bool` and leaves either a populated model or a human-readable
//! diagnostic behind, rather than forcing every call site to match on
//! [`crate::error::Error`] directly.

use crate::document::{MAGIC, MAGIC_SWAPPED};
use crate::de::read_binary;
use crate::error::Error;
use crate::model::File;
use crate::ser;
use crate::text::read_text;

/// Reads either encoding, auto-detected from the input's leading bytes.
#[derive(Default)]
pub struct SimpleReader {
    /// The decoded document, set on success.
    pub result: Option<File>,
    /// A human-readable description of the failure, set on error.
    pub diagnostic: Option<String>,
}

impl SimpleReader {
    pub fn new() -> Self {
        SimpleReader { result: None, diagnostic: None }
    }

    /// Decodes `input` as binary if its first four bytes match either form
    /// of the magic number, otherwise as UTF-8 GTOa text. Returns whether
    /// decoding succeeded; on success `result` is populated, on failure
    /// `diagnostic` is.
    pub fn open(&mut self, input: &[u8]) -> bool {
        let outcome = if starts_with_binary_magic(input) {
            read_binary(input)
        } else {
            std::str::from_utf8(input).map_err(|_| Error::BadMagic).and_then(|text| read_text(text))
        };
        self.apply(outcome)
    }

    /// Decodes `input` as GTOa text directly, without magic-number sniffing.
    pub fn open_text(&mut self, input: &str) -> bool {
        self.apply(read_text(input))
    }

    fn apply(&mut self, outcome: Result<File, Error>) -> bool {
        match outcome {
            Ok(file) => {
                self.result = Some(file);
                self.diagnostic = None;
                true
            }
            Err(error) => {
                self.result = None;
                self.diagnostic = Some(format!("{}", error));
                false
            }
        }
    }
}

fn starts_with_binary_magic(input: &[u8]) -> bool {
    if input.len() < 4 {
        return false;
    }
    let magic = u32::from_le_bytes([input[0], input[1], input[2], input[3]]);
    magic == MAGIC || magic == MAGIC_SWAPPED
}

/// The result of [`write`]: either encoding the caller asked for.
pub enum Encoded {
    Binary(Vec<u8>),
    Text(String),
}

/// Writes `file` in the requested encoding.
pub fn write(file: &File, binary: bool) -> Encoded {
    if binary {
        Encoded::Binary(ser::binary::write(file))
    } else {
        Encoded::Text(ser::text::write(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, Object, Property, Value};

    fn sample_file() -> File {
        let mut file = File::new();
        let mut object = Object::new("cube", "polygon", 1);
        let mut component = Component::new("points");
        component.properties.push(Property::scalar("count", Value::Int(vec![8])));
        object.components.push(component);
        file.objects.push(object);
        file
    }

    #[test]
    fn test_open_detects_binary() {
        let bytes = ser::binary::write(&sample_file());
        let mut reader = SimpleReader::new();
        assert!(reader.open(&bytes));
        assert_eq!(reader.result.unwrap(), sample_file());
        assert!(reader.diagnostic.is_none());
    }

    #[test]
    fn test_open_detects_text() {
        let text = ser::text::write(&sample_file());
        let mut reader = SimpleReader::new();
        assert!(reader.open(text.as_bytes()));
        assert_eq!(reader.result.unwrap(), sample_file());
    }

    #[test]
    fn test_open_reports_diagnostic_on_failure() {
        let mut reader = SimpleReader::new();
        assert!(!reader.open(b"not a gto file at all {"));
        assert!(reader.result.is_none());
        assert!(reader.diagnostic.is_some());
    }

    #[test]
    fn test_write_selects_encoding() {
        let file = sample_file();
        match write(&file, true) {
            Encoded::Binary(bytes) => assert_eq!(bytes, ser::binary::write(&file)),
            Encoded::Text(_) => panic!("expected binary"),
        }
        match write(&file, false) {
            Encoded::Text(text) => assert_eq!(text, ser::text::write(&file)),
            Encoded::Binary(_) => panic!("expected text"),
        }
    }
}
