use indexmap::IndexMap;
use log::info;

use crate::config::SwagdocConfig;
use crate::error::LoadError;
use crate::load::load_document;
use crate::markdown::DescriptionRenderer;
use crate::model::ApiSpecification;
use crate::resolve::{BuildOptions, build_into};

/// Every loaded specification, keyed by specification ID.
///
/// A collapsed suite holds a single specification under the empty ID.
#[derive(Debug, Clone, Default)]
pub struct ApiSuite {
    specs: IndexMap<String, ApiSpecification>,
}

impl ApiSuite {
    /// Load every configured specification file. The first failure aborts the load.
    pub fn load(
        config: &SwagdocConfig,
        renderer: &dyn DescriptionRenderer,
    ) -> Result<Self, LoadError> {
        let sources = config.spec_filenames.iter().map(|file| match &config.host {
            Some(host) => format!("http://{host}/{file}"),
            None => config.spec_dir.join(file).to_string_lossy().into_owned(),
        });
        let options = BuildOptions {
            fallback_host: config.host.as_deref(),
            renderer,
        };

        let mut suite = ApiSuite::default();
        let mut collapsed = ApiSpecification::new();
        for source in sources {
            info!("loading specification {source}");
            let doc = load_document(&source)?;
            if config.collapse {
                build_into(&mut collapsed, &doc, &options)?;
            } else {
                let mut spec = ApiSpecification::new();
                build_into(&mut spec, &doc, &options)?;
                suite.insert(spec);
            }
        }
        if config.collapse {
            collapsed.id = String::new();
            suite.specs.insert(String::new(), collapsed);
        }
        Ok(suite)
    }

    /// Add a specification under its own ID, replacing any with the same ID.
    pub fn insert(&mut self, spec: ApiSpecification) {
        self.specs.insert(spec.id.clone(), spec);
    }

    pub fn get(&self, id: &str) -> Option<&ApiSpecification> {
        self.specs.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ApiSpecification)> {
        self.specs.iter().map(|(id, spec)| (id.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
