//
// Copyright 2020 GTO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The GTOa text reader.
//!
//! Tokenizes and parses the human-editable GTOa encoding into a
//! [`crate::model::File`]. Tokenization (`lexer`) and grammar (`parser`) are
//! kept separate so each can be tested in isolation, the way the binary
//! reader's header and payload concerns are.

pub mod lexer;
pub mod parser;

use crate::error::Result;
use crate::model::File;

/// Parses a complete GTOa document from `input`.
pub fn read_text(input: &str) -> Result<File> {
    let tokens = lexer::tokenize(input)?;
    parser::parse(&tokens)
}
