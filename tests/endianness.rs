use gto::document;
use gto::model::{Component, File, Object, Property, Value};
use gto::read_binary;

fn swap_range(out: &mut [u8], offset: usize, len: usize) {
    out[offset..offset + len].reverse();
}

/// Rewrites a little-endian document (as produced by `ser::binary::write`)
/// into its big-endian form: every multi-byte header and payload field is
/// byte-swapped, while the string pool's raw UTF-8 bytes are left alone.
fn swap_to_big_endian(file: &File, little_endian: &[u8]) -> Vec<u8> {
    let mut out = little_endian.to_vec();

    for i in 0..5 {
        swap_range(&mut out, i * 4, 4);
    }

    let table = file.intern_all_strings();
    let mut offset = document::HEADER_SIZE + table.serialize().len();

    for _ in &file.objects {
        for i in 0..5 {
            swap_range(&mut out, offset + i * 4, 4);
        }
        offset += document::OBJECT_HEADER_SIZE;
    }

    for object in &file.objects {
        for _ in &object.components {
            for i in 0..5 {
                swap_range(&mut out, offset + i * 4, 4);
            }
            offset += document::COMPONENT_HEADER_SIZE;
        }
    }

    for object in &file.objects {
        for component in &object.components {
            for _ in &component.properties {
                swap_range(&mut out, offset, 4); // name_id
                swap_range(&mut out, offset + 4, 4); // interpretation_id
                // kind byte (offset + 8) and its 3 pad bytes are single-byte, untouched
                swap_range(&mut out, offset + 12, 4); // size
                swap_range(&mut out, offset + 16, 4); // width
                for d in 0..4 {
                    swap_range(&mut out, offset + 20 + d * 4, 4);
                }
                offset += document::PROPERTY_HEADER_SIZE;
            }
        }
    }

    for object in &file.objects {
        for component in &object.components {
            for property in &component.properties {
                let element_bytes = property.value.data_type().element_bytes();
                let count = property.value.scalar_count();
                if element_bytes > 1 {
                    for i in 0..count {
                        swap_range(&mut out, offset + i * element_bytes, element_bytes);
                    }
                }
                offset += count * element_bytes;
            }
        }
    }

    out
}

fn sample_file() -> File {
    let mut file = File::new();
    let mut object = Object::new("cube", "polygon", 1);
    let mut component = Component::new("attributes");
    component.properties.push(Property::scalar("count", Value::Int(vec![8, -3])));
    component.properties.push(Property::scalar("radius", Value::Float(vec![1.5])));
    component.properties.push(Property::scalar("precise", Value::Double(vec![2.25, -9.5])));
    component.properties.push(Property::scalar("flags", Value::Bool(vec![true, false])));
    component.properties.push(Property::scalar("rank", Value::Short(vec![100, 200])));
    component.properties.push(Property::scalar("tag", Value::Byte(vec![7])));
    component.properties.push(Property::scalar("id", Value::Int64(vec![-1, 42])));
    component.properties.push(Property::scalar("label", Value::String(vec!["north".to_string()])));
    object.components.push(component);
    file.objects.push(object);
    file
}

#[test]
fn test_big_endian_document_decodes_identically_to_little_endian() {
    let file = sample_file();
    let little_endian = gto::ser::binary::write(&file);
    let big_endian = swap_to_big_endian(&file, &little_endian);

    assert_ne!(little_endian, big_endian);
    assert_eq!(
        u32::from_le_bytes([big_endian[0], big_endian[1], big_endian[2], big_endian[3]]),
        document::MAGIC_SWAPPED
    );

    let decoded = read_binary(&big_endian).unwrap();
    assert_eq!(decoded, file);
    assert_eq!(decoded, read_binary(&little_endian).unwrap());
}
