//
// Copyright 2020 GTO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # gto
//!
//! A native Rust codec for the GTO (Graph Topology Object) file format: a
//! hierarchical, self-describing container of named objects composed of
//! components and typed properties. Reads and writes both the compact v4
//! binary encoding and the human-editable GTOa text encoding.
//!
//! ```
//! use gto::model::{Component, File, Object, Property, Value};
//!
//! let mut file = File::new();
//! let mut object = Object::new("cube", "polygon", 1);
//! let mut points = Component::new("points");
//! points.properties.push(Property::scalar("count", Value::Int(vec![8])));
//! object.components.push(points);
//! file.objects.push(object);
//!
//! let bytes = gto::ser::binary::write(&file);
//! let decoded = gto::de::read_binary(&bytes).unwrap();
//! assert_eq!(decoded, file);
//! ```

pub mod de;
pub mod document;
pub mod error;
pub mod facade;
pub mod half_float;
pub mod model;
pub mod ser;
pub mod string_table;
pub mod text;

pub use de::read_binary;
pub use document::{DataType, FileType};
pub use error::{Error, Location, Result};
pub use facade::{Encoded, SimpleReader};
pub use model::{Component, File, Object, Property, Value};
pub use text::read_text;
