use indexmap::IndexMap;
use serde::Serialize;

use super::group::ApiGroup;
use super::method::Method;
use super::resource::{Resource, ResourceKey};
use super::security::{Security, SecurityScheme};

/// API metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Info {
    pub title: String,
    pub description: String,
}

/// The documentation model built from one (or, collapsed, several) Swagger documents.
///
/// The specification owns every group, method and resource; `Resource::methods`,
/// `Method::resources` and `Method::group_id` are keys into it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ApiSpecification {
    pub id: String,
    pub info: Info,
    pub apis: Vec<ApiGroup>,
    pub security_definitions: IndexMap<String, SecurityScheme>,
    pub default_security: IndexMap<String, Security>,
    /// Version → resource ID → resource. The first resolution of an ID wins.
    pub resource_list: IndexMap<String, IndexMap<String, Resource>>,
    /// Version → groups restricted to that version's methods.
    pub api_versions: IndexMap<String, Vec<ApiGroup>>,
}

impl ApiSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an API group by display name.
    pub fn get_by_name(&self, name: &str) -> Option<&ApiGroup> {
        self.apis.iter().find(|a| a.name == name)
    }

    /// Returns an API group by ID.
    pub fn get_by_id(&self, id: &str) -> Option<&ApiGroup> {
        self.apis.iter().find(|a| a.id == id)
    }

    pub fn resource(&self, key: &ResourceKey) -> Option<&Resource> {
        self.resource_list.get(&key.version)?.get(&key.id)
    }

    /// Every method recorded against a shared resource, in recording order.
    pub fn methods_using<'a>(&'a self, resource: &'a Resource) -> impl Iterator<Item = &'a Method> {
        resource.methods.iter().filter_map(move |reference| {
            self.apis
                .get(reference.group)?
                .methods
                .iter()
                .find(|m| m.matches(reference))
        })
    }

    /// Version strings of the version-partitioned view.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.api_versions.keys().map(String::as_str)
    }

    /// Number of methods across all groups.
    pub fn method_count(&self) -> usize {
        self.apis.iter().map(|g| g.methods.len()).sum()
    }
}
