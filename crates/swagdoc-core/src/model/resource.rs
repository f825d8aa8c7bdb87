use indexmap::IndexMap;
use serde::Serialize;

use super::method::MethodRef;

/// A resolved, documentation-ready node of a schema tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Resource {
    /// Kebab-case identifier from the schema title, or the trailing namespace segment.
    pub id: String,
    /// Position from the tree root; array members appear as `name[]`.
    pub fqns: Vec<String>,
    pub title: String,
    pub description: String,
    /// Serialized `example` declared on the schema, if any.
    pub example: String,
    /// Rendered example payload for the whole subtree.
    pub schema: String,
    /// Index 0 is the primary kind (`object`, `array`, `map` or a primitive/format
    /// name); index 1 is the element kind of an `array` or `map`.
    #[serde(rename = "type")]
    pub types: Vec<String>,
    pub properties: IndexMap<String, Resource>,
    pub required: bool,
    pub read_only: bool,
    pub exclude_from_operations: Vec<String>,
    /// Every method that produces or consumes this resource.
    pub methods: Vec<MethodRef>,
    #[serde(rename = "enum")]
    pub enum_values: Vec<String>,
}

impl Resource {
    pub fn primary_type(&self) -> &str {
        self.types.first().map(String::as_str).unwrap_or("object")
    }

    pub fn element_type(&self) -> Option<&str> {
        self.types.get(1).map(String::as_str)
    }

    pub fn is_array(&self) -> bool {
        self.primary_type().eq_ignore_ascii_case("array")
    }

    /// Whether a request body for `operation_name` must leave this property out.
    pub fn is_excluded_from(&self, operation_name: &str) -> bool {
        self.exclude_from_operations
            .iter()
            .any(|op| op == operation_name)
    }
}

/// Key of a shared resource in `ApiSpecification::resource_list`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceKey {
    pub version: String,
    pub id: String,
}
