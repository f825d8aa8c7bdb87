use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value, json};

/// Serialize as JSON indented with four spaces.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Render the example payload of a resolved tree. Arrays are shown as a
/// single-element list holding the element example, or the element type name
/// when the elements have no members.
pub fn render_example(
    example: &Map<String, Value>,
    primary_type: &str,
    element_type: Option<&str>,
) -> Result<String, serde_json::Error> {
    match primary_type {
        "array" | "map" => to_json_pretty(&shape_example(
            example.clone(),
            primary_type,
            element_type,
        )),
        _ => to_json_pretty(example),
    }
}

/// Example value of a node with the given types, built from the example map of its members.
pub fn shape_example(
    nested: Map<String, Value>,
    primary_type: &str,
    element_type: Option<&str>,
) -> Value {
    match primary_type {
        "object" => Value::Object(nested),
        "array" => {
            if !nested.is_empty() {
                json!([nested])
            } else if let Some(inner) = element_type {
                json!([inner])
            } else {
                json!([{}])
            }
        }
        "map" => match element_type {
            None | Some("object") => Value::Object(nested),
            Some(inner) => Value::String(inner.to_string()),
        },
        other => Value::String(other.to_string()),
    }
}

/// Display form of an `enum` member: strings as-is, anything else as JSON.
pub fn enum_member_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
