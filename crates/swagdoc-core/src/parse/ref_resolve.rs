use std::collections::HashSet;

use super::operation::{Operation, PathItem};
use super::parameter::{Parameter, ParameterOrRef};
use super::response::{Response, ResponseOrRef};
use super::schema::{AdditionalProperties, Items, Schema, SchemaOrRef};
use super::spec::SwaggerSpec;
use crate::error::ResolveError;

/// Expands every local `$ref` in a Swagger 2.0 document, producing a document
/// whose schemas, parameters and responses are all inline.
///
/// A reference back into a definition that is still being expanded is left as
/// a `$ref` node so that self-referential models terminate.
pub struct RefResolver<'a> {
    spec: &'a SwaggerSpec,
    visited: HashSet<String>,
}

impl<'a> RefResolver<'a> {
    pub fn new(spec: &'a SwaggerSpec) -> Self {
        Self {
            spec,
            visited: HashSet::new(),
        }
    }

    /// Resolve the entire spec, returning a copy with no expandable `$ref` nodes.
    pub fn resolve_spec(&mut self) -> Result<SwaggerSpec, ResolveError> {
        let mut resolved = self.spec.clone();

        for item in resolved.paths.values_mut() {
            self.resolve_path_item(item)?;
        }

        let names: Vec<String> = resolved.definitions.keys().cloned().collect();
        for name in names {
            let key = format!("#/definitions/{name}");
            self.visited.insert(key.clone());
            let expanded = self.resolve_schema_or_ref(&resolved.definitions[&name])?;
            self.visited.remove(&key);
            resolved.definitions.insert(name, expanded);
        }

        Ok(resolved)
    }

    fn resolve_path_item(&mut self, item: &mut PathItem) -> Result<(), ResolveError> {
        item.parameters = self.resolve_parameters(&item.parameters)?;

        macro_rules! resolve_op {
            ($op:expr) => {
                if let Some(ref mut op) = $op {
                    self.resolve_operation(op)?;
                }
            };
        }
        resolve_op!(item.get);
        resolve_op!(item.put);
        resolve_op!(item.post);
        resolve_op!(item.delete);
        resolve_op!(item.options);
        resolve_op!(item.head);
        resolve_op!(item.patch);
        Ok(())
    }

    fn resolve_operation(&mut self, op: &mut Operation) -> Result<(), ResolveError> {
        op.parameters = self.resolve_parameters(&op.parameters)?;

        let statuses: Vec<String> = op.responses.keys().cloned().collect();
        for status in statuses {
            let resolved = self.resolve_response_or_ref(&op.responses[&status])?;
            op.responses.insert(status, resolved);
        }
        Ok(())
    }

    fn resolve_parameters(
        &mut self,
        params: &[ParameterOrRef],
    ) -> Result<Vec<ParameterOrRef>, ResolveError> {
        params
            .iter()
            .map(|p| self.resolve_parameter_or_ref(p))
            .collect()
    }

    pub fn resolve_schema_or_ref(
        &mut self,
        schema_or_ref: &SchemaOrRef,
    ) -> Result<SchemaOrRef, ResolveError> {
        match schema_or_ref {
            SchemaOrRef::Ref { ref_path } => {
                if self.visited.contains(ref_path) {
                    // Circular reference: keep the $ref, the resolver treats it as opaque.
                    return Ok(schema_or_ref.clone());
                }
                let target = self.lookup_schema(ref_path)?;
                self.visited.insert(ref_path.clone());
                let result = self.resolve_schema_or_ref(&target);
                self.visited.remove(ref_path);
                result
            }
            SchemaOrRef::Schema(schema) => {
                let resolved = self.resolve_schema(schema)?;
                Ok(SchemaOrRef::Schema(Box::new(resolved)))
            }
        }
    }

    fn resolve_schema(&mut self, schema: &Schema) -> Result<Schema, ResolveError> {
        let mut resolved = schema.clone();

        for (name, prop) in &schema.properties {
            resolved
                .properties
                .insert(name.clone(), self.resolve_schema_or_ref(prop)?);
        }

        resolved.items = match &schema.items {
            Some(Items::Single(item)) => {
                Some(Items::Single(Box::new(self.resolve_schema_or_ref(item)?)))
            }
            Some(Items::Tuple(list)) => Some(Items::Tuple(
                list.iter()
                    .map(|s| self.resolve_schema_or_ref(s))
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            None => None,
        };

        resolved.all_of = schema
            .all_of
            .iter()
            .map(|s| self.resolve_schema_or_ref(s))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(AdditionalProperties::Schema(ref s)) = schema.additional_properties {
            resolved.additional_properties = Some(AdditionalProperties::Schema(Box::new(
                self.resolve_schema_or_ref(s)?,
            )));
        }

        Ok(resolved)
    }

    fn resolve_parameter_or_ref(
        &mut self,
        param: &ParameterOrRef,
    ) -> Result<ParameterOrRef, ResolveError> {
        let param = match param {
            ParameterOrRef::Ref { ref_path } => self.lookup_parameter(ref_path)?,
            ParameterOrRef::Parameter(p) => p.clone(),
        };
        let mut resolved = param.clone();
        if let Some(ref s) = param.schema {
            resolved.schema = Some(self.resolve_schema_or_ref(s)?);
        }
        if let Some(ref items) = param.items {
            resolved.items = Some(Box::new(self.resolve_schema_or_ref(items)?));
        }
        Ok(ParameterOrRef::Parameter(resolved))
    }

    fn resolve_response_or_ref(
        &mut self,
        resp: &ResponseOrRef,
    ) -> Result<ResponseOrRef, ResolveError> {
        let response = match resp {
            ResponseOrRef::Ref { ref_path } => self.lookup_response(ref_path)?,
            ResponseOrRef::Response(r) => r.clone(),
        };
        let mut resolved = response.clone();
        if let Some(ref s) = response.schema {
            resolved.schema = Some(self.resolve_schema_or_ref(s)?);
        }
        Ok(ResponseOrRef::Response(resolved))
    }

    // Lookup helpers

    fn lookup_schema(&self, ref_path: &str) -> Result<SchemaOrRef, ResolveError> {
        let name = parse_ref_name(ref_path, "definitions")?;
        self.spec
            .definitions
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))
    }

    fn lookup_parameter(&self, ref_path: &str) -> Result<Parameter, ResolveError> {
        let name = parse_ref_name(ref_path, "parameters")?;
        self.spec
            .parameters
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))
    }

    fn lookup_response(&self, ref_path: &str) -> Result<Response, ResolveError> {
        let name = parse_ref_name(ref_path, "responses")?;
        self.spec
            .responses
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))
    }
}

/// Expand all local references of a parsed document.
pub fn expand(spec: &SwaggerSpec) -> Result<SwaggerSpec, ResolveError> {
    RefResolver::new(spec).resolve_spec()
}

/// Parse a `$ref` path like `#/definitions/Foo` and extract the name.
fn parse_ref_name<'a>(ref_path: &'a str, expected_section: &str) -> Result<&'a str, ResolveError> {
    if !ref_path.starts_with('#') {
        return Err(ResolveError::UnresolvedRef(ref_path.to_string()));
    }
    let stripped = ref_path
        .strip_prefix("#/")
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    let (section, name) = stripped
        .split_once('/')
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    if section != expected_section {
        return Err(ResolveError::InvalidRefFormat(format!(
            "expected section '{}', got '{}' in {}",
            expected_section, section, ref_path
        )));
    }
    Ok(name)
}
