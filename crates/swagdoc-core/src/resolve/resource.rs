use std::collections::HashSet;

use indexmap::IndexMap;
use log::{trace, warn};
use serde_json::{Map, Value};

use super::classify::{Classified, classify, classify_map_value};
use super::example::{enum_member_to_string, shape_example, to_json_pretty};
use super::namespace::prepare_namespace;
use super::naming::title_to_kebab;
use crate::error::BuildError;
use crate::markdown::DescriptionRenderer;
use crate::model::{HttpMethod, Resource};
use crate::parse::extensions::{VendorExtensions, X_EXCLUDE_FROM_OPERATIONS};
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef};

/// Name of the synthetic property documenting an open `additionalProperties` map.
pub const MAP_KEY: &str = "<key>";

/// A resolved tree and its parallel example values.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub resource: Resource,
    pub example: Map<String, Value>,
}

/// Converts schema trees into resources on behalf of one operation.
pub struct ResourceResolver<'a> {
    verb: HttpMethod,
    path: &'a str,
    operation_name: &'a str,
    renderer: &'a dyn DescriptionRenderer,
}

/// Where the properties of one node are being compiled.
struct Frame<'f> {
    namespace: &'f [String],
    parent_id: &'f str,
    chopped: bool,
    required: &'f HashSet<String>,
    only_writable: bool,
}

impl Frame<'_> {
    fn child_namespace(&self, property: &str) -> Vec<String> {
        prepare_namespace(self.namespace, self.parent_id, property, self.chopped)
    }
}

#[derive(Default)]
struct Collected {
    properties: IndexMap<String, Resource>,
    example: Map<String, Value>,
    seen: HashSet<String>,
}

impl<'a> ResourceResolver<'a> {
    pub fn new(
        verb: HttpMethod,
        path: &'a str,
        operation_name: &'a str,
        renderer: &'a dyn DescriptionRenderer,
    ) -> Self {
        Self {
            verb,
            path,
            operation_name,
            renderer,
        }
    }

    /// Resolve a request or response schema. `only_writable` drops read-only
    /// properties, for request bodies.
    pub fn resolve(
        &self,
        schema: Option<&SchemaOrRef>,
        only_writable: bool,
    ) -> Result<Option<Resolved>, BuildError> {
        match schema {
            None => Ok(None),
            Some(schema) => {
                with_schema(schema, |s| self.resolve_node(classify(s), &[], only_writable))
                    .map(Some)
            }
        }
    }

    fn resolve_node(
        &self,
        view: Classified<'_>,
        fqns: &[String],
        only_writable: bool,
    ) -> Result<Resolved, BuildError> {
        let Classified {
            original,
            effective,
            types,
            ..
        } = view;

        let title = effective
            .title
            .as_deref()
            .or(original.title.as_deref())
            .unwrap_or_default();
        let mut id = title_to_kebab(title);
        if fqns.is_empty() && id.is_empty() {
            return Err(BuildError::UntitledModel {
                verb: self.verb.to_string(),
                path: self.path.to_string(),
            });
        }

        let mut namespace = fqns.to_vec();
        if !namespace.is_empty() && types.iter().any(|t| t == "array") {
            id.clear();
        }
        if types.first().is_some_and(|t| t == "array") {
            if let Some(last) = namespace.last_mut() {
                last.push_str("[]");
            }
        }

        let mut chopped = false;
        if id.is_empty() {
            if let Some(tail) = namespace.pop() {
                id = tail;
                chopped = true;
            }
        }
        let mut resource_fqns = namespace.clone();
        if !chopped && types.iter().any(|t| t == "object") {
            resource_fqns.pop();
        }
        trace!("resolving {id} at {namespace:?} as {types:?}");

        let description = match original.description.as_deref().filter(|d| !d.is_empty()) {
            Some(text) => self.renderer.render(text),
            None => original.title.clone().unwrap_or_default(),
        };
        let example = match original.example.as_ref().or(effective.example.as_ref()) {
            Some(value) => to_json_pretty(value).map_err(|source| BuildError::Example {
                id: id.clone(),
                source,
            })?,
            None => String::new(),
        };

        let mut resource = Resource {
            id,
            fqns: resource_fqns,
            title: title.to_string(),
            description,
            example,
            schema: String::new(),
            types,
            properties: IndexMap::new(),
            required: false,
            read_only: original.is_read_only(),
            exclude_from_operations: original.extensions.ext_str_list(X_EXCLUDE_FROM_OPERATIONS),
            methods: Vec::new(),
            enum_values: effective
                .enum_values
                .iter()
                .map(enum_member_to_string)
                .collect(),
        };

        let required = required_names(&effective);
        let frame = Frame {
            namespace: &namespace,
            parent_id: &resource.id,
            chopped,
            required: &required,
            only_writable,
        };
        let mut out = Collected::default();
        self.compile_properties(&effective, &frame, &mut out)?;

        resource.properties = out.properties;
        Ok(Resolved {
            resource,
            example: out.example,
        })
    }

    /// Own properties, then the open map entry, then every `allOf` member. The
    /// first declaration of a name wins.
    fn compile_properties(
        &self,
        schema: &Schema,
        frame: &Frame<'_>,
        out: &mut Collected,
    ) -> Result<(), BuildError> {
        for (name, property) in &schema.properties {
            if !out.seen.insert(name.clone()) {
                warn!(
                    "property {name} of {} is declared more than once, keeping the first",
                    frame.parent_id
                );
                continue;
            }
            let namespace = frame.child_namespace(name);
            let resolved = with_schema(property, |s| {
                self.resolve_node(classify(s), &namespace, frame.only_writable)
            })?;
            self.attach(name, resolved, frame, out);
        }

        match &schema.additional_properties {
            Some(AdditionalProperties::Schema(value)) => {
                with_schema(value, |s| self.compile_map_entry(s, frame, out))?;
            }
            Some(AdditionalProperties::Bool(true)) => {
                self.compile_map_entry(&Schema::default(), frame, out)?;
            }
            _ => {}
        }

        for member in &schema.all_of {
            match member {
                SchemaOrRef::Schema(member) => self.compile_properties(member, frame, out)?,
                SchemaOrRef::Ref { ref_path } => {
                    trace!("allOf member {ref_path} of {} was not expanded", frame.parent_id)
                }
            }
        }
        Ok(())
    }

    fn compile_map_entry(
        &self,
        value: &Schema,
        frame: &Frame<'_>,
        out: &mut Collected,
    ) -> Result<(), BuildError> {
        if !out.seen.insert(MAP_KEY.to_string()) {
            return Ok(());
        }
        let namespace = frame.child_namespace(MAP_KEY);
        let resolved = self.resolve_node(classify_map_value(value), &namespace, frame.only_writable)?;
        self.attach(MAP_KEY, resolved, frame, out);
        Ok(())
    }

    fn attach(&self, name: &str, resolved: Resolved, frame: &Frame<'_>, out: &mut Collected) {
        let Resolved {
            resource: mut child,
            example,
        } = resolved;

        if frame.only_writable && child.read_only {
            trace!("{}: leaving out read-only {name}", frame.parent_id);
            return;
        }
        if child.is_excluded_from(self.operation_name) {
            trace!(
                "{}: {name} is excluded from {}",
                frame.parent_id, self.operation_name
            );
            return;
        }

        child.required = frame.required.contains(name);
        let value = shape_example(example, child.primary_type(), child.element_type());
        out.example.insert(name.to_string(), value);
        out.properties.insert(name.to_string(), child);
    }
}

/// Run `f` on the schema, or on an opaque stand-in for a reference that was left
/// unexpanded because it is circular.
fn with_schema<R>(schema: &SchemaOrRef, f: impl FnOnce(&Schema) -> R) -> R {
    match schema {
        SchemaOrRef::Schema(s) => f(s),
        SchemaOrRef::Ref { ref_path } => f(&Schema::opaque(ref_path)),
    }
}

fn required_names(schema: &Schema) -> HashSet<String> {
    let mut names: HashSet<String> = schema.required.iter().cloned().collect();
    for member in &schema.all_of {
        if let Some(member) = member.as_schema() {
            names.extend(required_names(member));
        }
    }
    names
}
