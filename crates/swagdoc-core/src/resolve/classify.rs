use std::borrow::Cow;

use crate::parse::schema::{Schema, SchemaOrRef, SchemaType, TypeSet};

/// Shape category of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Primitive,
    Object,
    Map,
    ArrayOfPrimitives,
    ArrayOfObjects,
    /// `items` declared on something that is not an array.
    Unknown,
}

/// A schema node as the resolver sees it.
///
/// `original` is the node as written; `effective` is the node whose properties,
/// title and example describe the value (the `items` schema for arrays). The
/// input graph is never modified: type defaulting, array unwrapping and format
/// overrides only live in `types`.
#[derive(Debug, Clone)]
pub struct Classified<'a> {
    pub original: &'a Schema,
    pub effective: Cow<'a, Schema>,
    pub types: Vec<String>,
    pub shape: Shape,
}

/// Classify a schema node.
pub fn classify(schema: &Schema) -> Classified<'_> {
    let outer_types = declared_types(schema);

    let Some(items) = schema.items.as_ref().and_then(|items| items.first()) else {
        let shape = if outer_types.iter().any(|t| t == "object") {
            Shape::Object
        } else {
            Shape::Primitive
        };
        return finish(schema, Cow::Borrowed(schema), outer_types, shape);
    };

    let inner: Cow<'_, Schema> = match items {
        SchemaOrRef::Schema(s) => Cow::Borrowed(s.as_ref()),
        SchemaOrRef::Ref { ref_path } => Cow::Owned(Schema::opaque(ref_path)),
    };

    if !outer_types.iter().any(|t| t == "array") {
        let types = match inner.schema_type {
            Some(ref t) => t.names(),
            None => outer_types,
        };
        return finish(schema, inner, types, Shape::Unknown);
    }

    let (types, shape) = match inner.schema_type {
        Some(ref t) if t.contains(SchemaType::Array) => (
            vec!["array".to_string(), "array".to_string()],
            Shape::ArrayOfPrimitives,
        ),
        _ if is_object_like(&inner) => (vec!["array".to_string()], Shape::ArrayOfObjects),
        Some(ref t) => (
            vec!["array".to_string(), first_name(t)],
            Shape::ArrayOfPrimitives,
        ),
        None => (
            vec!["array".to_string(), "object".to_string()],
            Shape::ArrayOfPrimitives,
        ),
    };
    finish(schema, inner, types, shape)
}

/// Classify the value schema of an open `additionalProperties` as a map of that value type.
pub fn classify_map_value(value: &Schema) -> Classified<'_> {
    let value_type = value
        .schema_type
        .as_ref()
        .map(first_name)
        .unwrap_or_else(|| "object".to_string());
    finish(
        value,
        Cow::Borrowed(value),
        vec!["map".to_string(), value_type],
        Shape::Map,
    )
}

/// Shape category only.
pub fn shape_of(schema: &Schema) -> Shape {
    classify(schema).shape
}

fn finish<'a>(
    original: &'a Schema,
    effective: Cow<'a, Schema>,
    mut types: Vec<String>,
    shape: Shape,
) -> Classified<'a> {
    if let Some(format) = effective.format.as_deref().filter(|f| !f.is_empty()) {
        if let Some(last) = types.last_mut() {
            *last = format.to_string();
        }
    }
    Classified {
        original,
        effective,
        types,
        shape,
    }
}

/// Declared type names; an untyped node is an object.
fn declared_types(schema: &Schema) -> Vec<String> {
    match schema.schema_type {
        Some(ref t) => t.names(),
        None => vec!["object".to_string()],
    }
}

fn first_name(types: &TypeSet) -> String {
    types
        .names()
        .into_iter()
        .next()
        .unwrap_or_else(|| "object".to_string())
}

/// Array elements are documented as objects only when they have members to list.
fn is_object_like(schema: &Schema) -> bool {
    !schema.properties.is_empty()
        || !schema.all_of.is_empty()
        || schema.additional_properties.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(yaml: &str) -> Schema {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn test_untyped_is_object() {
        let s = schema("properties:\n  a:\n    type: string\n");
        let view = classify(&s);
        assert_eq!(view.shape, Shape::Object);
        assert_eq!(view.types, vec!["object"]);
    }

    #[test]
    fn test_primitive_with_format_override() {
        let s = schema("type: integer\nformat: int64\n");
        let view = classify(&s);
        assert_eq!(view.shape, Shape::Primitive);
        assert_eq!(view.types, vec!["int64"]);
        // The input is untouched.
        assert_eq!(s.schema_type, Some(TypeSet::Single(SchemaType::Integer)));
    }

    #[test]
    fn test_array_of_primitives_records_inner_type() {
        let s = schema("type: array\nitems:\n  type: string\n  format: date-time\n");
        let view = classify(&s);
        assert_eq!(view.shape, Shape::ArrayOfPrimitives);
        assert_eq!(view.types, vec!["array", "date-time"]);
    }

    #[test]
    fn test_array_of_objects_keeps_outer_array() {
        let s = schema(
            "type: array\ndescription: all widgets\nitems:\n  title: Widget\n  type: object\n  properties:\n    id:\n      type: integer\n",
        );
        let view = classify(&s);
        assert_eq!(view.shape, Shape::ArrayOfObjects);
        assert_eq!(view.types, vec!["array"]);
        assert_eq!(view.effective.title.as_deref(), Some("Widget"));
        assert_eq!(view.original.description.as_deref(), Some("all widgets"));
    }

    #[test]
    fn test_nested_array_stops_at_first_level() {
        let s = schema(
            "type: array\nitems:\n  type: array\n  items:\n    title: Cell\n    properties:\n      v:\n        type: string\n",
        );
        let view = classify(&s);
        assert_eq!(view.shape, Shape::ArrayOfPrimitives);
        assert_eq!(view.types, vec!["array", "array"]);
        // The effective node is the inner array; its own items are not unwrapped.
        assert!(view.effective.properties.is_empty());
        assert!(view.effective.items.is_some());
    }

    #[test]
    fn test_array_of_untyped_empty_items_is_primitive() {
        let s = schema("type: array\nitems: {}\n");
        let view = classify(&s);
        assert_eq!(view.shape, Shape::ArrayOfPrimitives);
        assert_eq!(view.types, vec!["array", "object"]);
    }

    #[test]
    fn test_array_of_memberless_object_is_primitive() {
        let s = schema("type: array\nitems:\n  type: object\n");
        let view = classify(&s);
        assert_eq!(view.shape, Shape::ArrayOfPrimitives);
        assert_eq!(view.types, vec!["array", "object"]);
    }

    #[test]
    fn test_array_of_circular_reference_keeps_title() {
        let s = schema("type: array\nitems:\n  $ref: \"#/definitions/Node\"\n");
        let view = classify(&s);
        assert_eq!(view.types, vec!["array", "object"]);
        assert_eq!(view.effective.title.as_deref(), Some("Node"));
    }

    #[test]
    fn test_items_on_non_array_is_unknown() {
        let s = schema("type: object\nitems:\n  type: string\n");
        assert_eq!(shape_of(&s), Shape::Unknown);
    }

    #[test]
    fn test_map_value() {
        let s = schema("type: integer\nformat: int32\n");
        let view = classify_map_value(&s);
        assert_eq!(view.shape, Shape::Map);
        assert_eq!(view.types, vec!["map", "int32"]);

        let open = Schema::default();
        assert_eq!(classify_map_value(&open).types, vec!["map", "object"]);
    }

    #[test]
    fn test_classification_is_repeatable() {
        let s = schema("type: array\nitems:\n  type: integer\n  format: int64\n");
        let first = classify(&s).types;
        let second = classify(&s).types;
        assert_eq!(first, second);
    }
}
