use log::debug;
use url::Url;

use super::method::{MethodCompiler, OperationSite, operation_for};
use super::naming::title_to_kebab;
use super::security::{process_security, security_definitions};
use crate::error::BuildError;
use crate::markdown::{DescriptionRenderer, PlainText};
use crate::model::{ApiGroup, ApiSpecification, HttpMethod, Info};
use crate::parse::extensions::{VendorExtensions, X_NAVIGATE_METHODS_BY_NAME, X_VERSION};
use crate::parse::operation::{Operation, PathItem};
use crate::parse::spec::{SwaggerSpec, Tag};

/// Version assumed for paths without `x-version`.
pub const DEFAULT_VERSION: &str = "latest";

/// Options for building a documentation model.
#[derive(Clone, Copy)]
pub struct BuildOptions<'a> {
    /// Host used when the document does not declare one.
    pub fallback_host: Option<&'a str>,
    pub renderer: &'a dyn DescriptionRenderer,
}

impl Default for BuildOptions<'_> {
    fn default() -> Self {
        Self {
            fallback_host: None,
            renderer: &PlainText,
        }
    }
}

/// Build the documentation model of one reference-expanded document.
pub fn build(doc: &SwaggerSpec, options: &BuildOptions<'_>) -> Result<ApiSpecification, BuildError> {
    let mut spec = ApiSpecification::new();
    build_into(&mut spec, doc, options)?;
    Ok(spec)
}

/// Add a document to `spec`. Groups, resources and security definitions
/// accumulate, so several documents can share one specification.
pub fn build_into(
    spec: &mut ApiSpecification,
    doc: &SwaggerSpec,
    options: &BuildOptions<'_>,
) -> Result<(), BuildError> {
    let renderer = options.renderer;
    let url = base_url(doc, options.fallback_host)?;
    let base_path = doc.base_path.as_deref().filter(|p| *p != "/").unwrap_or("");
    let navigate_by_name = doc
        .extensions
        .ext_bool(X_NAVIGATE_METHODS_BY_NAME)
        .unwrap_or(false);

    spec.id = title_to_kebab(&doc.info.title);
    spec.info = Info {
        title: doc.info.title.clone(),
        description: doc
            .info
            .description
            .as_deref()
            .map(|d| renderer.render(d))
            .unwrap_or_default(),
    };
    spec.security_definitions
        .extend(security_definitions(&doc.security_definitions, renderer));
    spec.default_security = doc
        .security
        .as_deref()
        .map(|requirements| process_security(requirements, &spec.security_definitions))
        .unwrap_or_default();

    let mut groups = Vec::new();
    {
        let mut compiler = MethodCompiler::new(
            &mut spec.resource_list,
            &spec.security_definitions,
            &spec.default_security,
            renderer,
        );

        for tag in active_tags(doc) {
            if tag.name.is_empty() {
                // One group per path.
                for (raw_path, item) in &doc.paths {
                    let path = format!("{base_path}{raw_path}");
                    let mut group = ApiGroup::new("", "", url.clone(), navigate_by_name);
                    let index = spec.apis.len() + groups.len();
                    collect_path(&mut compiler, &mut group, index, "", item, &path)?;
                    if !group.methods.is_empty() {
                        groups.push(finish(group));
                    }
                }
            } else {
                let name = tag
                    .description
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .unwrap_or(tag.name.as_str());
                let mut group = ApiGroup::new(name, &tag.name, url.clone(), navigate_by_name);
                let index = spec.apis.len() + groups.len();
                for (raw_path, item) in &doc.paths {
                    let path = format!("{base_path}{raw_path}");
                    collect_path(&mut compiler, &mut group, index, &tag.name, item, &path)?;
                }
                if !group.methods.is_empty() {
                    groups.push(finish(group));
                }
            }
        }
    }

    for group in &groups {
        for version in group.versions.keys() {
            if let Some(view) = group.for_version(version) {
                spec.api_versions
                    .entry(version.clone())
                    .or_default()
                    .push(view);
            }
        }
    }
    spec.apis.extend(groups);
    Ok(())
}

/// Whether an operation is documented under `active_tag`. Untagged operations
/// only appear when grouping by path.
pub fn operation_in_tag(active_tag: &str, operation: &Operation) -> bool {
    if operation.tags.is_empty() {
        return active_tag.is_empty();
    }
    active_tag.is_empty() || operation.tags.iter().any(|t| t == active_tag)
}

fn active_tags(doc: &SwaggerSpec) -> Vec<Tag> {
    if doc.tags.is_empty() {
        vec![Tag::default()]
    } else {
        doc.tags.clone()
    }
}

fn base_url(doc: &SwaggerSpec, fallback_host: Option<&str>) -> Result<Url, BuildError> {
    let scheme = doc.schemes.first().map(String::as_str).unwrap_or("http");
    let host = doc
        .host
        .as_deref()
        .filter(|h| !h.is_empty())
        .or(fallback_host)
        .unwrap_or("localhost");
    Ok(Url::parse(&format!("{scheme}://{host}"))?)
}

fn collect_path(
    compiler: &mut MethodCompiler<'_>,
    group: &mut ApiGroup,
    index: usize,
    active_tag: &str,
    item: &PathItem,
    path: &str,
) -> Result<(), BuildError> {
    let version = item.extensions.ext_str(X_VERSION).unwrap_or(DEFAULT_VERSION);
    group.current_version = version.to_string();

    for verb in HttpMethod::ALL {
        let Some(operation) = operation_for(item, verb) else {
            continue;
        };
        if !operation_in_tag(active_tag, operation) {
            continue;
        }
        let site = OperationSite {
            group: index,
            path,
            version,
            verb,
            item,
            operation,
        };
        let method = compiler.compile(group, site)?;
        group
            .versions
            .entry(version.to_string())
            .or_default()
            .push(method.clone());
        group.methods.push(method);
    }
    Ok(())
}

/// Point every method at the group's final ID; `x-pathName` may rename the
/// group after its first methods were compiled.
fn finish(mut group: ApiGroup) -> ApiGroup {
    let id = group.id.clone();
    for method in group
        .methods
        .iter_mut()
        .chain(group.versions.values_mut().flatten())
    {
        method.group_id = id.clone();
    }
    debug!(
        "group {} ({}) with {} methods",
        group.name,
        group.id,
        group.methods.len()
    );
    group
}
