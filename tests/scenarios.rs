use gto::model::{Component, File, Object, Property, Value};
use gto::{read_binary, read_text};

/// Scenario: empty file. `GTOa (4)` with no objects round-trips through both
/// encodings and decodes to a `File` with zero objects.
#[test]
fn test_scenario_empty_file() {
    let file = File::new();
    assert_eq!(read_text("GTOa (4)\n").unwrap(), file);
    assert_eq!(read_binary(&gto::ser::binary::write(&file)).unwrap(), file);
}

/// Scenario: one object, one component, one int property, explicit protocol version 2.
#[test]
fn test_scenario_single_object_explicit_protocol_version() {
    let text = "GTOa (4)\n\ncube : polygon (2) {\n    points {\n        int count = 8\n    }\n}\n";
    let file = read_text(text).unwrap();

    assert_eq!(file.objects.len(), 1);
    assert_eq!(file.objects[0].name, "cube");
    assert_eq!(file.objects[0].protocol, "polygon");
    assert_eq!(file.objects[0].protocol_version, 2);
    assert_eq!(file.objects[0].components[0].properties[0].value, Value::Int(vec![8]));

    let rendered = gto::ser::text::write(&file);
    assert!(rendered.contains("cube : polygon (2) {"));
    assert_eq!(read_text(&rendered).unwrap(), file);
}

/// Scenario: a width-3 vector property written both grouped (`[x y z]` per
/// element) and flat (one bracket whose length is a multiple of the width).
#[test]
fn test_scenario_vector_property_grouped_and_flat_forms() {
    let grouped = "GTOa (4)\n\ncube : polygon {\n    points {\n        float[3] position = [ [0.0 0.0 0.0] [1.0 2.0 3.0] ]\n    }\n}\n";
    let flat = "GTOa (4)\n\ncube : polygon {\n    points {\n        float[3] position = [ 0.0 0.0 0.0 1.0 2.0 3.0 ]\n    }\n}\n";

    let from_grouped = read_text(grouped).unwrap();
    let from_flat = read_text(flat).unwrap();

    assert_eq!(from_grouped, from_flat);
    match &from_grouped.objects[0].components[0].properties[0].value {
        Value::Float(v) => assert_eq!(v, &vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0]),
        _ => panic!("expected Float"),
    }
}

/// Scenario: two objects sharing one interpretation string intern it once.
#[test]
fn test_scenario_shared_interpretation_string_interned_once() {
    let mut file = File::new();
    for name in ["left", "right"] {
        let mut object = Object::new(name, "locator", 1);
        let mut component = Component::new("xform");
        component.interpretation = "transform".to_string();
        object.components.push(component);
        file.objects.push(object);
    }

    let table = file.intern_all_strings();
    assert_eq!(table.iter().filter(|&s| s == "transform").count(), 1);

    let bytes = gto::ser::binary::write(&file);
    assert_eq!(read_binary(&bytes).unwrap(), file);
}

/// Scenario: a half-precision property carrying the literal sequence
/// `1.0 nan inf -inf 0.0` preserves every special value through both
/// encodings.
#[test]
fn test_scenario_half_float_specials_preserved() {
    let text = "GTOa (4)\n\nlight : half_test {\n    data {\n        half values = [ 1.0 nan inf -inf 0.0 ]\n    }\n}\n";
    let file = read_text(text).unwrap();

    let floats = file.objects[0].components[0].properties[0].value.as_half_floats();
    assert_eq!(floats[0], 1.0);
    assert!(floats[1].is_nan());
    assert_eq!(floats[2], f32::INFINITY);
    assert_eq!(floats[3], f32::NEG_INFINITY);
    assert_eq!(floats[4], 0.0);

    let bytes = gto::ser::binary::write(&file);
    let decoded = read_binary(&bytes).unwrap();
    let roundtripped = decoded.objects[0].components[0].properties[0].value.as_half_floats();
    assert_eq!(roundtripped[0], 1.0);
    assert!(roundtripped[1].is_nan());
    assert_eq!(roundtripped[2], f32::INFINITY);
    assert_eq!(roundtripped[3], f32::NEG_INFINITY);
    assert_eq!(roundtripped[4], 0.0);
}

/// Scenario: a dynamically generated component name containing colons, as
/// paint-style tools produce (`"pen:42:7:user"`), round-trips as a quoted
/// name through both encodings.
#[test]
fn test_scenario_colon_bearing_component_name() {
    let mut file = File::new();
    let mut object = Object::new("canvas", "paint", 1);
    let mut component = Component::new("pen:42:7:user");
    component.properties.push(Property::scalar("pressure", Value::Float(vec![0.5])));
    object.components.push(component);
    file.objects.push(object);

    let text = gto::ser::text::write(&file);
    assert!(text.contains("\"pen:42:7:user\""));
    assert_eq!(read_text(&text).unwrap(), file);

    let bytes = gto::ser::binary::write(&file);
    assert_eq!(read_binary(&bytes).unwrap(), file);
}
