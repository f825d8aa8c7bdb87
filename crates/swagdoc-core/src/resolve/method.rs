use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::{debug, warn};

use super::example::{enum_member_to_string, render_example};
use super::naming::{camel_to_kebab, title_to_kebab};
use super::resource::{Resolved, ResourceResolver};
use super::security::process_security;
use crate::error::BuildError;
use crate::markdown::DescriptionRenderer;
use crate::model::{
    ApiGroup, HttpMethod, Method, MethodRef, Parameter, Resource, ResourceKey, Response, Security,
    SecurityScheme,
};
use crate::parse::extensions::{VendorExtensions, X_OPERATION_NAME, X_PATH_NAME};
use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::{Parameter as ParameterDefinition, ParameterLocation, ParameterOrRef};
use crate::parse::response::ResponseOrRef;

/// One operation of a path item, with the path and version it is documented under.
#[derive(Debug, Clone, Copy)]
pub struct OperationSite<'o> {
    /// Index the group will take in the specification's group list.
    pub group: usize,
    pub path: &'o str,
    pub version: &'o str,
    pub verb: HttpMethod,
    pub item: &'o PathItem,
    pub operation: &'o Operation,
}

/// The operation a path item declares for a verb.
pub fn operation_for(item: &PathItem, verb: HttpMethod) -> Option<&Operation> {
    match verb {
        HttpMethod::Get => item.get.as_ref(),
        HttpMethod::Post => item.post.as_ref(),
        HttpMethod::Put => item.put.as_ref(),
        HttpMethod::Delete => item.delete.as_ref(),
        HttpMethod::Head => item.head.as_ref(),
        HttpMethod::Options => item.options.as_ref(),
        HttpMethod::Patch => item.patch.as_ref(),
    }
}

/// Builds methods and registers their response resources in the per-version
/// resource table.
pub struct MethodCompiler<'a> {
    resources: &'a mut IndexMap<String, IndexMap<String, Resource>>,
    security_definitions: &'a IndexMap<String, SecurityScheme>,
    default_security: &'a IndexMap<String, Security>,
    renderer: &'a dyn DescriptionRenderer,
}

impl<'a> MethodCompiler<'a> {
    pub fn new(
        resources: &'a mut IndexMap<String, IndexMap<String, Resource>>,
        security_definitions: &'a IndexMap<String, SecurityScheme>,
        default_security: &'a IndexMap<String, Security>,
        renderer: &'a dyn DescriptionRenderer,
    ) -> Self {
        Self {
            resources,
            security_definitions,
            default_security,
            renderer,
        }
    }

    /// Compile one operation for `group`. The group takes its name from
    /// `x-pathName`, or from the summary or operation ID when it has none yet.
    pub fn compile(
        &mut self,
        group: &mut ApiGroup,
        site: OperationSite<'_>,
    ) -> Result<Method, BuildError> {
        let op = site.operation;
        let summary = op.summary.as_deref().unwrap_or_default();
        let extension_name = op.extensions.ext_str(X_OPERATION_NAME);

        let mut id = match op.operation_id.as_deref().filter(|id| !id.is_empty()) {
            Some(operation_id) => operation_id.to_string(),
            None => title_to_kebab(extension_name.unwrap_or(summary)),
        };
        if id.is_empty() {
            id = site.verb.as_str().to_string();
        }
        let id = camel_to_kebab(&id);

        let operation_name = extension_name.unwrap_or(site.verb.as_str()).to_string();
        let navigation_name = if group.method_navigation_by_name {
            summary.to_string()
        } else {
            operation_name.clone()
        };

        if let Some(path_name) = site.item.extensions.ext_str(X_PATH_NAME) {
            group.rename(path_name);
        }
        if group.name.is_empty() {
            let fallback = if summary.is_empty() {
                op.operation_id.as_deref().unwrap_or_default()
            } else {
                summary
            };
            if fallback.is_empty() {
                return Err(BuildError::MissingOperationName {
                    verb: site.verb.to_string(),
                    path: site.path.to_string(),
                });
            }
            group.rename(fallback);
        }

        let mut method = Method {
            id,
            name: summary.to_string(),
            description: self.render(op.description.as_deref()),
            verb: site.verb,
            operation_name,
            navigation_name,
            path: site.path.to_string(),
            version: site.version.to_string(),
            deprecated: op.deprecated.unwrap_or(false),
            path_params: Vec::new(),
            query_params: Vec::new(),
            header_params: Vec::new(),
            form_params: Vec::new(),
            body_param: None,
            responses: BTreeMap::new(),
            default_response: None,
            resources: Vec::new(),
            security: IndexMap::new(),
            group_id: group.id.clone(),
        };
        let method_ref = method.method_ref(site.group);
        let resolver =
            ResourceResolver::new(site.verb, site.path, &method.operation_name, self.renderer);

        for definition in merged_parameters(site.item, op) {
            let mut parameter = Parameter {
                name: definition.name.clone(),
                description: self.render(definition.description.as_deref()),
                location: definition.location,
                required: definition.required,
                param_type: definition
                    .param_type
                    .map(|t| t.as_str().to_string())
                    .unwrap_or_default(),
                format: definition.format.clone(),
                enum_values: definition
                    .enum_values
                    .iter()
                    .map(enum_member_to_string)
                    .collect(),
                resource: None,
            };
            match definition.location {
                ParameterLocation::Path => method.path_params.push(parameter),
                ParameterLocation::Query => method.query_params.push(parameter),
                ParameterLocation::Header => method.header_params.push(parameter),
                ParameterLocation::FormData => method.form_params.push(parameter),
                ParameterLocation::Body => {
                    if let Some(Resolved { mut resource, example }) =
                        resolver.resolve(definition.schema.as_ref(), true)?
                    {
                        resource.schema = render_schema(&resource, &example)?;
                        parameter.resource = Some(resource);
                    }
                    method.body_param = Some(parameter);
                }
            }
        }

        let mut responses = BTreeMap::new();
        let mut used = Vec::new();
        for (status, response) in op.status_responses() {
            let Some(response) = declared(response) else {
                continue;
            };
            let resolved = resolver.resolve(response.schema.as_ref(), false)?;
            let key = self.register(resolved, &method_ref, site.version)?;
            used.extend(key.clone());
            responses.insert(
                status,
                Response {
                    description: self.render(Some(&response.description)),
                    resource: key,
                },
            );
        }
        let default_response = match op.default_response().and_then(declared) {
            Some(response) => {
                let resolved = resolver.resolve(response.schema.as_ref(), false)?;
                let key = self.register(resolved, &method_ref, site.version)?;
                used.extend(key.clone());
                Some(Response {
                    description: self.render(Some(&response.description)),
                    resource: key,
                })
            }
            None => None,
        };
        method.responses = responses;
        method.default_response = default_response;
        method.resources = used;

        let security = op
            .security
            .as_deref()
            .map(|requirements| process_security(requirements, self.security_definitions))
            .unwrap_or_default();
        method.security = if security.is_empty() {
            self.default_security.clone()
        } else {
            security
        };

        Ok(method)
    }

    /// Record a response resource under its version. The first resolution of an
    /// ID is kept; every method using it is appended to that entry.
    fn register(
        &mut self,
        resolved: Option<Resolved>,
        method: &MethodRef,
        version: &str,
    ) -> Result<Option<ResourceKey>, BuildError> {
        let Some(Resolved {
            mut resource,
            example,
        }) = resolved
        else {
            return Ok(None);
        };

        let id = resource.id.clone();
        let by_id = self.resources.entry(version.to_string()).or_default();
        let shared = match by_id.entry(id.clone()) {
            indexmap::map::Entry::Occupied(entry) => {
                debug!("reusing resource {id} ({version}) for {} {}", method.verb, method.path);
                entry.into_mut()
            }
            indexmap::map::Entry::Vacant(entry) => {
                debug!("creating resource {id} ({version})");
                resource.schema = render_schema(&resource, &example)?;
                entry.insert(resource)
            }
        };
        shared.methods.push(method.clone());

        Ok(Some(ResourceKey {
            version: version.to_string(),
            id,
        }))
    }

    fn render(&self, text: Option<&str>) -> String {
        text.map(|t| self.renderer.render(t)).unwrap_or_default()
    }
}

fn render_schema(
    resource: &Resource,
    example: &serde_json::Map<String, serde_json::Value>,
) -> Result<String, BuildError> {
    render_example(example, resource.primary_type(), resource.element_type()).map_err(|source| {
        BuildError::Example {
            id: resource.id.clone(),
            source,
        }
    })
}

fn declared(response: &ResponseOrRef) -> Option<&crate::parse::response::Response> {
    let declared = response.as_response();
    if declared.is_none() {
        warn!("skipping unexpanded response reference");
    }
    declared
}

/// Path-level parameters followed by the operation's own. An operation
/// parameter replaces a path-level one with the same name and location.
fn merged_parameters<'p>(item: &'p PathItem, op: &'p Operation) -> Vec<&'p ParameterDefinition> {
    let mut merged: Vec<&ParameterDefinition> = Vec::new();
    for parameter in item.parameters.iter().chain(&op.parameters) {
        let ParameterOrRef::Parameter(parameter) = parameter else {
            warn!("skipping unexpanded parameter reference");
            continue;
        };
        match merged
            .iter_mut()
            .find(|m| m.name == parameter.name && m.location == parameter.location)
        {
            Some(slot) => *slot = parameter,
            None => merged.push(parameter),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::PlainText;
    use url::Url;

    fn item(yaml: &str) -> PathItem {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    fn group(name: &str) -> ApiGroup {
        ApiGroup::new(name, "", Url::parse("http://localhost").unwrap(), false)
    }

    #[test]
    fn test_method_id_candidates() {
        let path_item = item(
            r#"
get:
  operationId: listPets
  summary: List pets
post:
  summary: Create a Pet
  x-operationName: create
put:
  summary: Replace Everything
delete:
  responses: {}
"#,
        );
        let mut resources = IndexMap::new();
        let defs = IndexMap::new();
        let default_security = IndexMap::new();
        let mut compiler = MethodCompiler::new(&mut resources, &defs, &default_security, &PlainText);
        let mut g = group("Pets");

        let mut ids = Vec::new();
        for verb in HttpMethod::ALL {
            let Some(operation) = operation_for(&path_item, verb) else {
                continue;
            };
            let site = OperationSite {
                group: 0,
                path: "/pets",
                version: "latest",
                verb,
                item: &path_item,
                operation,
            };
            let method = compiler.compile(&mut g, site).unwrap();
            ids.push((method.id, method.operation_name));
        }
        assert_eq!(
            ids,
            vec![
                ("list-pets".to_string(), "get".to_string()),
                ("create".to_string(), "create".to_string()),
                ("replace-everything".to_string(), "put".to_string()),
                ("delete".to_string(), "delete".to_string()),
            ]
        );
    }

    #[test]
    fn test_parameters_bucketed_and_merged() {
        let path_item = item(
            r#"
parameters:
  - name: petId
    in: path
    required: true
    type: string
  - name: trace
    in: header
    type: string
get:
  summary: Get pet
  parameters:
    - name: petId
      in: path
      required: true
      type: integer
      format: int64
    - name: status
      in: query
      type: string
      enum: [available, sold]
    - name: photo
      in: formData
      type: file
"#,
        );
        let mut resources = IndexMap::new();
        let defs = IndexMap::new();
        let default_security = IndexMap::new();
        let mut compiler = MethodCompiler::new(&mut resources, &defs, &default_security, &PlainText);
        let mut g = group("Pets");
        let site = OperationSite {
            group: 0,
            path: "/pets/{petId}",
            version: "latest",
            verb: HttpMethod::Get,
            item: &path_item,
            operation: path_item.get.as_ref().unwrap(),
        };
        let method = compiler.compile(&mut g, site).unwrap();

        assert_eq!(method.path_params.len(), 1);
        assert_eq!(method.path_params[0].param_type, "integer");
        assert_eq!(method.path_params[0].format.as_deref(), Some("int64"));
        assert_eq!(method.header_params[0].name, "trace");
        assert_eq!(method.query_params[0].enum_values, vec!["available", "sold"]);
        assert_eq!(method.form_params[0].param_type, "file");
        assert!(method.body_param.is_none());
    }

    #[test]
    fn test_unnamed_group_without_summary_or_id_is_fatal() {
        let path_item = item("get:\n  description: Liveness check\n");
        let mut resources = IndexMap::new();
        let defs = IndexMap::new();
        let default_security = IndexMap::new();
        let mut compiler = MethodCompiler::new(&mut resources, &defs, &default_security, &PlainText);
        let mut g = group("");
        let site = OperationSite {
            group: 0,
            path: "/ping",
            version: "latest",
            verb: HttpMethod::Get,
            item: &path_item,
            operation: path_item.get.as_ref().unwrap(),
        };
        let err = compiler.compile(&mut g, site).unwrap_err();
        assert!(matches!(err, BuildError::MissingOperationName { ref path, .. } if path == "/ping"));
    }

    #[test]
    fn test_operation_id_names_group_without_summary() {
        let path_item = item("get:\n  operationId: ping\n");
        let mut resources = IndexMap::new();
        let defs = IndexMap::new();
        let default_security = IndexMap::new();
        let mut compiler = MethodCompiler::new(&mut resources, &defs, &default_security, &PlainText);
        let mut g = group("");
        let site = OperationSite {
            group: 0,
            path: "/ping",
            version: "latest",
            verb: HttpMethod::Get,
            item: &path_item,
            operation: path_item.get.as_ref().unwrap(),
        };
        let method = compiler.compile(&mut g, site).unwrap();
        assert_eq!(g.name, "ping");
        assert_eq!(method.id, "ping");
    }

    #[test]
    fn test_path_name_renames_group() {
        let path_item = item("x-pathName: Health Checks\nget:\n  summary: Ping\n");
        let mut resources = IndexMap::new();
        let defs = IndexMap::new();
        let default_security = IndexMap::new();
        let mut compiler = MethodCompiler::new(&mut resources, &defs, &default_security, &PlainText);
        let mut g = group("");
        let site = OperationSite {
            group: 0,
            path: "/ping",
            version: "latest",
            verb: HttpMethod::Get,
            item: &path_item,
            operation: path_item.get.as_ref().unwrap(),
        };
        compiler.compile(&mut g, site).unwrap();
        assert_eq!(g.name, "Health Checks");
        assert_eq!(g.id, "health-checks");
    }
}
