//
// Copyright 2020 GTO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! GTOa text writer.
//!
//! Renders a [`File`] with 4-space indentation: the signature line, then
//! each object followed by a blank line, each component followed by a blank
//! line within its object, one property per line.

use crate::half_float::half_to_float;
use crate::model::{Component, File, Object, Property, Value};

const INDENT: &str = "    ";

/// Renders `file` as a complete GTOa document.
pub fn write(file: &File) -> String {
    let mut out = format!("GTOa ({})\n\n", file.version);
    for object in &file.objects {
        write_object(&mut out, object);
        out.push('\n');
    }
    out
}

fn write_object(out: &mut String, object: &Object) {
    out.push_str(&format_name(&object.name));
    out.push_str(" : ");
    out.push_str(&format_name(&object.protocol));
    if object.protocol_version != 1 {
        out.push_str(&format!(" ({})", object.protocol_version));
    }
    out.push_str(" {\n");
    for component in &object.components {
        write_component(out, component, 1);
        out.push('\n');
    }
    out.push_str("}\n");
}

fn write_component(out: &mut String, component: &Component, indent_level: usize) {
    let indent = INDENT.repeat(indent_level);
    out.push_str(&indent);
    out.push_str(&format_name(&component.name));
    if !component.interpretation.is_empty() {
        out.push_str(" as ");
        out.push_str(&format_name(&component.interpretation));
    }
    out.push_str(" {\n");
    for property in &component.properties {
        write_property(out, property, indent_level + 1);
    }
    out.push_str(&indent);
    out.push_str("}\n");
}

fn write_property(out: &mut String, property: &Property, indent_level: usize) {
    let indent = INDENT.repeat(indent_level);
    out.push_str(&indent);
    out.push_str(property.value.data_type().keyword());
    if property.width > 1 {
        out.push_str(&format!("[{}]", property.width));
    }
    out.push(' ');
    out.push_str(&format_name(&property.name));
    if !property.interpretation.is_empty() {
        out.push_str(" as ");
        out.push_str(&format_name(&property.interpretation));
    }
    out.push_str(" = ");
    out.push_str(&format_value(property, indent_level));
    out.push('\n');
}

fn format_value(property: &Property, indent_level: usize) -> String {
    let total = property.value.scalar_count();
    let width = property.width.max(1) as usize;

    if property.size == 1 && width == 1 {
        return format_scalar(&property.value, 0);
    }

    if width <= 1 || total <= width {
        let scalars: Vec<String> = (0..total).map(|i| format_scalar(&property.value, i)).collect();
        return format!("[ {} ]", scalars.join(" "));
    }

    let groups = total / width;
    let group_text = |g: usize| {
        let scalars: Vec<String> = (g * width..g * width + width).map(|i| format_scalar(&property.value, i)).collect();
        format!("[{}]", scalars.join(" "))
    };

    if groups <= 4 {
        let rendered: Vec<String> = (0..groups).map(group_text).collect();
        format!("[ {} ]", rendered.join(" "))
    } else {
        let indent = INDENT.repeat(indent_level + 1);
        let closing_indent = INDENT.repeat(indent_level);
        let mut out = String::from("[\n");
        for g in 0..groups {
            out.push_str(&indent);
            out.push_str(&group_text(g));
            out.push('\n');
        }
        out.push_str(&closing_indent);
        out.push(']');
        out
    }
}

fn format_scalar(value: &Value, index: usize) -> String {
    match value {
        Value::Int(v) => v[index].to_string(),
        Value::Float(v) => format_f32(v[index]),
        Value::Double(v) => format_f64(v[index]),
        Value::Half(v) => format_f32(half_to_float(v[index])),
        Value::String(v) => quote_string(&v[index]),
        Value::Bool(v) => if v[index] { "1" } else { "0" }.to_string(),
        Value::Short(v) => v[index].to_string(),
        Value::Byte(v) => v[index].to_string(),
        Value::Int64(v) => v[index].to_string(),
    }
}

fn format_f32(value: f32) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn format_f64(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn is_bare_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

fn format_name(name: &str) -> String {
    if is_bare_name(name) {
        name.to_string()
    } else {
        quote_string(name)
    }
}

fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
