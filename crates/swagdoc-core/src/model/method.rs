use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use super::resource::{Resource, ResourceKey};
use super::security::Security;
use crate::parse::parameter::ParameterLocation;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl HttpMethod {
    /// Verbs in the order operations of a path are documented.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Patch => "patch",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Non-owning reference to a method, resolved through `ApiSpecification::methods_using`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MethodRef {
    /// Position of the owning group in `ApiSpecification::apis`.
    pub group: usize,
    pub id: String,
    pub verb: HttpMethod,
    pub path: String,
}

/// A documented operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    #[serde(rename = "type")]
    pub param_type: String,
    pub format: Option<String>,
    #[serde(rename = "enum")]
    pub enum_values: Vec<String>,
    /// Request body shape, only for `in: body`. Resolved without read-only properties.
    pub resource: Option<Resource>,
}

/// A documented response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub description: String,
    pub resource: Option<ResourceKey>,
}

/// One operation (path × verb) as documented under one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "method")]
    pub verb: HttpMethod,
    /// `x-operationName`, or the verb when absent.
    pub operation_name: String,
    pub navigation_name: String,
    pub path: String,
    pub version: String,
    pub deprecated: bool,
    pub path_params: Vec<Parameter>,
    pub query_params: Vec<Parameter>,
    pub header_params: Vec<Parameter>,
    pub form_params: Vec<Parameter>,
    pub body_param: Option<Parameter>,
    pub responses: BTreeMap<u16, Response>,
    pub default_response: Option<Response>,
    /// Shared response resources used by this method.
    pub resources: Vec<ResourceKey>,
    pub security: IndexMap<String, Security>,
    /// ID of the owning `ApiGroup`.
    pub group_id: String,
}

impl Method {
    pub fn method_ref(&self, group: usize) -> MethodRef {
        MethodRef {
            group,
            id: self.id.clone(),
            verb: self.verb,
            path: self.path.clone(),
        }
    }

    pub fn matches(&self, reference: &MethodRef) -> bool {
        self.verb == reference.verb && self.path == reference.path && self.id == reference.id
    }
}
