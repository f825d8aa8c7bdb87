use indexmap::IndexMap;
use serde::Serialize;
use url::Url;

use super::method::Method;

/// Methods grouped for documentation, by tag when the document declares tags
/// and by path otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiGroup {
    pub id: String,
    pub name: String,
    /// Tag the group was built from; empty when grouping by path.
    pub tag: String,
    pub url: Url,
    pub method_navigation_by_name: bool,
    /// Methods keyed by the version they belong to.
    pub versions: IndexMap<String, Vec<Method>>,
    pub methods: Vec<Method>,
    pub current_version: String,
}

impl ApiGroup {
    pub fn new(name: &str, tag: &str, url: Url, method_navigation_by_name: bool) -> Self {
        Self {
            id: crate::resolve::naming::title_to_kebab(name),
            name: name.to_string(),
            tag: tag.to_string(),
            url,
            method_navigation_by_name,
            versions: IndexMap::new(),
            methods: Vec::new(),
            current_version: String::new(),
        }
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.to_string();
        self.id = crate::resolve::naming::title_to_kebab(name);
    }

    /// Copy of the group restricted to one version, as listed in
    /// `ApiSpecification::api_versions`.
    pub fn for_version(&self, version: &str) -> Option<ApiGroup> {
        let methods = self.versions.get(version)?.clone();
        Some(ApiGroup {
            methods,
            versions: IndexMap::new(),
            current_version: version.to_string(),
            ..self.clone()
        })
    }
}
