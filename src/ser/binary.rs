//
// Copyright 2020 GTO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Binary GTO writer.
//!
//! `write` lays out a whole [`File`] in one pass: intern every string, size
//! the output buffer exactly, then emit the five sections back to back with
//! no reallocation. [`Writer`] is the incremental counterpart, a state
//! machine a caller drives object-by-object and component-by-component,
//! rejecting out-of-phase calls with `StateViolation`; its `finish` defers to
//! the same structural `write`, so both APIs always produce identical bytes.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::document;
use crate::error::{Error, Result};
use crate::model::{Component, File, Object, Property, Value};
use crate::string_table::StringTable;

/// Lays out `file` as a complete binary v4 document. Always little-endian;
/// this codec never writes the byte-swapped form.
pub fn write(file: &File) -> Vec<u8> {
    let table = file.intern_all_strings();

    let components: Vec<&Component> = file.objects.iter().flat_map(|o| o.components.iter()).collect();
    let properties: Vec<&Property> = components.iter().flat_map(|c| c.properties.iter()).collect();

    let string_pool = table.serialize();
    let payload_len: usize = properties.iter().map(|p| payload_byte_len(p)).sum();

    let total_len = document::HEADER_SIZE
        + string_pool.len()
        + file.objects.len() * document::OBJECT_HEADER_SIZE
        + components.len() * document::COMPONENT_HEADER_SIZE
        + properties.len() * document::PROPERTY_HEADER_SIZE
        + payload_len;

    let mut out = Vec::with_capacity(total_len);

    out.write_u32::<LittleEndian>(document::MAGIC).unwrap();
    out.write_u32::<LittleEndian>(table.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(file.objects.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(document::CURRENT_VERSION).unwrap();
    out.write_u32::<LittleEndian>(file.flags).unwrap();

    out.extend_from_slice(&string_pool);

    for object in &file.objects {
        write_object_header(&mut out, &table, object);
    }
    for component in &components {
        write_component_header(&mut out, &table, component);
    }
    for property in &properties {
        write_property_header(&mut out, &table, property);
    }
    for property in &properties {
        write_payload(&mut out, &table, &property.value);
    }

    debug_assert_eq!(out.len(), total_len);
    out
}

fn id_of(table: &StringTable, s: &str) -> u32 {
    table.id_of(s).expect("every name was interned by File::intern_all_strings before layout")
}

fn write_object_header(out: &mut Vec<u8>, table: &StringTable, object: &Object) {
    out.write_u32::<LittleEndian>(id_of(table, &object.name)).unwrap();
    out.write_u32::<LittleEndian>(id_of(table, &object.protocol)).unwrap();
    out.write_u32::<LittleEndian>(object.protocol_version).unwrap();
    out.write_u32::<LittleEndian>(object.components.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap(); // pad
}

fn write_component_header(out: &mut Vec<u8>, table: &StringTable, component: &Component) {
    out.write_u32::<LittleEndian>(id_of(table, &component.name)).unwrap();
    out.write_u32::<LittleEndian>(id_of(table, &component.interpretation)).unwrap();
    out.write_u32::<LittleEndian>(component.properties.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap(); // flags; unused by this codec
    out.write_u32::<LittleEndian>(component.child_level).unwrap();
}

fn write_property_header(out: &mut Vec<u8>, table: &StringTable, property: &Property) {
    out.write_u32::<LittleEndian>(id_of(table, &property.name)).unwrap();
    out.write_u32::<LittleEndian>(id_of(table, &property.interpretation)).unwrap();
    out.write_u8(property.value.data_type() as u8).unwrap();
    out.extend_from_slice(&[0u8; 3]); // pad
    out.write_u32::<LittleEndian>(property.size).unwrap();
    out.write_u32::<LittleEndian>(property.width).unwrap();
    for d in &property.dims {
        out.write_u32::<LittleEndian>(*d).unwrap();
    }
}

fn payload_byte_len(property: &Property) -> usize {
    property.value.scalar_count() * property.value.data_type().element_bytes()
}

fn write_payload(out: &mut Vec<u8>, table: &StringTable, value: &Value) {
    match value {
        Value::Int(v) => v.iter().for_each(|x| out.write_i32::<LittleEndian>(*x).unwrap()),
        Value::Float(v) => v.iter().for_each(|x| out.write_f32::<LittleEndian>(*x).unwrap()),
        Value::Double(v) => v.iter().for_each(|x| out.write_f64::<LittleEndian>(*x).unwrap()),
        Value::Half(v) => v.iter().for_each(|x| out.write_u16::<LittleEndian>(*x).unwrap()),
        Value::Bool(v) => v.iter().for_each(|x| out.write_u8(if *x { 1 } else { 0 }).unwrap()),
        Value::Short(v) => v.iter().for_each(|x| out.write_u16::<LittleEndian>(*x).unwrap()),
        Value::Byte(v) => v.iter().for_each(|x| out.write_u8(*x).unwrap()),
        Value::Int64(v) => v.iter().for_each(|x| out.write_i64::<LittleEndian>(*x).unwrap()),
        Value::String(v) => v.iter().for_each(|s| out.write_u32::<LittleEndian>(id_of(table, s)).unwrap()),
    }
}

/// The writer's phase, mirroring `Initial -> Object -> Component -> Object
/// -> ... -> Closed` from the incremental layout algorithm.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum State {
    Initial,
    InObject,
    InComponent,
    Closed,
}

impl State {
    fn label(self) -> &'static str {
        match self {
            State::Initial => "initial",
            State::InObject => "object",
            State::InComponent => "component",
            State::Closed => "closed",
        }
    }
}

/// Incrementally builds a [`File`] via state-checked calls, then lays it out
/// with [`write`] on `finish`.
pub struct Writer {
    state: State,
    file: File,
    current_object: Option<Object>,
    current_component: Option<Component>,
}

impl Writer {
    pub fn new() -> Self {
        Writer {
            state: State::Initial,
            file: File::new(),
            current_object: None,
            current_component: None,
        }
    }

    fn violation(&self, attempted: &'static str) -> Error {
        Error::StateViolation { attempted, state: self.state.label() }
    }

    pub fn begin_object(&mut self, name: impl Into<String>, protocol: impl Into<String>, protocol_version: u32) -> Result<()> {
        if self.state != State::Initial {
            return Err(self.violation("begin_object"));
        }
        self.current_object = Some(Object::new(name, protocol, protocol_version));
        self.state = State::InObject;
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<()> {
        if self.state != State::InObject {
            return Err(self.violation("end_object"));
        }
        let object = self.current_object.take().expect("InObject implies a current object");
        self.file.objects.push(object);
        self.state = State::Initial;
        Ok(())
    }

    pub fn begin_component(&mut self, name: impl Into<String>) -> Result<()> {
        if self.state != State::InObject {
            return Err(self.violation("begin_component"));
        }
        self.current_component = Some(Component::new(name));
        self.state = State::InComponent;
        Ok(())
    }

    pub fn end_component(&mut self) -> Result<()> {
        if self.state != State::InComponent {
            return Err(self.violation("end_component"));
        }
        let component = self.current_component.take().expect("InComponent implies a current component");
        self.current_object
            .as_mut()
            .expect("InComponent implies a current object")
            .components
            .push(component);
        self.state = State::InObject;
        Ok(())
    }

    pub fn declare_property(&mut self, property: Property) -> Result<()> {
        if self.state != State::InComponent {
            return Err(self.violation("declare_property"));
        }
        self.current_component
            .as_mut()
            .expect("InComponent implies a current component")
            .properties
            .push(property);
        Ok(())
    }

    /// Lays out every object declared so far. Fails if an object or
    /// component is still open.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if self.state != State::Initial {
            return Err(self.violation("finish"));
        }
        self.state = State::Closed;
        Ok(write(&self.file))
    }
}

impl Default for Writer {
    fn default() -> Self {
        Writer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::read_binary;

    #[test]
    fn test_empty_file_matches_literal_bytes() {
        let bytes = write(&File::new());
        let expected: [u8; 20] = [
            0x9F, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00,
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_round_trips_through_reader() {
        let mut file = File::new();
        let mut object = Object::new("cube", "polygon", 1);
        let mut component = Component::new("points");
        component.properties.push(Property::scalar("count", Value::Int(vec![8])));
        object.components.push(component);
        file.objects.push(object);

        let bytes = write(&file);
        let decoded = read_binary(&bytes).unwrap();
        assert_eq!(decoded, file);
    }

    #[test]
    fn test_vector_property_round_trips() {
        let mut file = File::new();
        let mut object = Object::new("cube", "polygon", 1);
        let mut component = Component::new("points");
        component
            .properties
            .push(Property::with_width("position", 3, Value::Float(vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0])));
        object.components.push(component);
        file.objects.push(object);

        let bytes = write(&file);
        let decoded = read_binary(&bytes).unwrap();
        assert_eq!(decoded, file);
    }

    #[test]
    fn test_shared_interpretation_strings_share_one_id() {
        let mut file = File::new();
        for name in ["a", "b"] {
            let mut object = Object::new(name, "polygon", 1);
            let mut component = Component::new("meta");
            component.interpretation = "coordinate".to_string();
            object.components.push(component);
            file.objects.push(object);
        }

        let bytes = write(&file);
        let decoded = read_binary(&bytes).unwrap();
        assert_eq!(decoded, file);
    }

    #[test]
    fn test_incremental_writer_happy_path() {
        let mut writer = Writer::new();
        writer.begin_object("cube", "polygon", 1).unwrap();
        writer.begin_component("points").unwrap();
        writer.declare_property(Property::scalar("count", Value::Int(vec![8]))).unwrap();
        writer.end_component().unwrap();
        writer.end_object().unwrap();
        let bytes = writer.finish().unwrap();

        let decoded = read_binary(&bytes).unwrap();
        assert_eq!(decoded.objects[0].name, "cube");
        assert_eq!(decoded.objects[0].components[0].properties[0].value, Value::Int(vec![8]));
    }

    #[test]
    fn test_declare_property_outside_component_fails() {
        let mut writer = Writer::new();
        writer.begin_object("cube", "polygon", 1).unwrap();
        let result = writer.declare_property(Property::scalar("count", Value::Int(vec![1])));
        assert_eq!(
            result,
            Err(Error::StateViolation { attempted: "declare_property", state: "object" })
        );
    }

    #[test]
    fn test_finish_with_open_object_fails() {
        let mut writer = Writer::new();
        writer.begin_object("cube", "polygon", 1).unwrap();
        let result = writer.finish();
        assert_eq!(result, Err(Error::StateViolation { attempted: "finish", state: "object" }));
    }

    #[test]
    fn test_begin_component_outside_object_fails() {
        let mut writer = Writer::new();
        let result = writer.begin_component("points");
        assert_eq!(
            result,
            Err(Error::StateViolation { attempted: "begin_component", state: "initial" })
        );
    }
}
